//! HTML to Markdown conversion using `html-to-markdown-rs`.
//!
//! `<script>` and `<style>` elements are removed before conversion and, when
//! the document has a `<body>`, only its content is converted. Output uses
//! ATX headings, fenced code blocks and `-` bullets.
//!
//! # Example
//!
//! ```rust
//! use transmutation::extraction::html::convert_html_to_markdown;
//!
//! let markdown = convert_html_to_markdown("<h1>Title</h1><p>Some <strong>bold</strong> text.</p>")?;
//! assert!(markdown.contains("# Title"));
//! assert!(markdown.contains("**bold**"));
//! # Ok::<(), transmutation::TransmutationError>(())
//! ```
use crate::types::FormatTag;
use crate::{Result, TransmutationError};
use html_to_markdown_rs::{CodeBlockStyle, ConversionOptions, HeadingStyle, convert as convert_html};
use regex::Regex;
use std::any::Any;
use std::sync::LazyLock;
use std::thread;

const LARGE_HTML_STACK_THRESHOLD_BYTES: usize = 512 * 1024;
const HTML_CONVERSION_STACK_SIZE_BYTES: usize = 16 * 1024 * 1024;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Script regex pattern is valid and should compile")
});
static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("Style regex pattern is valid and should compile")
});
static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").expect("Body regex pattern is valid and should compile")
});
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>([^<]*)</title\s*>").expect("Title regex pattern is valid and should compile")
});

/// Converted HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlDocument {
    pub markdown: String,
    pub title: Option<String>,
}

fn conversion_options() -> ConversionOptions {
    ConversionOptions {
        heading_style: HeadingStyle::Atx,
        code_block_style: CodeBlockStyle::Backticks,
        bullets: "-".to_string(),
        extract_metadata: false,
        hocr_spatial_tables: false,
        ..Default::default()
    }
}

/// Text of the first `<title>` element, with basic entities decoded.
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|title| !title.is_empty())
}

/// Drop scripts and styles, then keep only the `<body>` content if present.
pub fn extract_body_content(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let content = STYLE_RE.replace_all(&without_scripts, "");

    match BODY_RE.captures(&content).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().to_string(),
        None => content.into_owned(),
    }
}

/// Convert an HTML fragment or document to Markdown.
pub fn convert_html_to_markdown(html: &str) -> Result<String> {
    let options = conversion_options();
    if html.len() >= LARGE_HTML_STACK_THRESHOLD_BYTES {
        let html = html.to_string();
        run_on_dedicated_stack(move || convert_with_options(&html, options))
    } else {
        convert_with_options(html, options)
    }
}

/// Decode, clean and convert an HTML document.
pub fn extract_html(content: &[u8]) -> Result<HtmlDocument> {
    let html = String::from_utf8_lossy(content);
    let title = extract_title(&html);
    let body = extract_body_content(&html);
    let markdown = convert_html_to_markdown(&body)?;

    Ok(HtmlDocument { markdown, title })
}

fn convert_with_options(html: &str, options: ConversionOptions) -> Result<String> {
    convert_html(html, Some(options)).map_err(|e| {
        TransmutationError::converter(FormatTag::Html, format!("failed to convert HTML to Markdown: {}", e))
    })
}

fn run_on_dedicated_stack<T, F>(job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("transmutation-html".to_string())
        .stack_size(HTML_CONVERSION_STACK_SIZE_BYTES)
        .spawn(job)
        .map_err(|e| TransmutationError::converter_with_source(FormatTag::Html, "failed to spawn conversion thread", e))?;

    match handle.join() {
        Ok(result) => result,
        Err(panic) => Err(TransmutationError::converter(
            FormatTag::Html,
            format!("conversion panicked: {}", panic_reason(&panic)),
        )),
    }
}

fn panic_reason(panic: &Box<dyn Any + Send + 'static>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
