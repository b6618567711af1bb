//! Plain text decoding and Markdown cleanup.
//!
//! [`normalize_markdown`] is the shared cleanup every converter applies when
//! `preserve_formatting` is set:
//!
//! - CRLF line endings become LF
//! - runs of three or more newlines collapse to a single blank line
//! - leading and trailing whitespace is trimmed
//!
//! # Example
//!
//! ```rust
//! use transmutation::extraction::text::normalize_markdown;
//!
//! let cleaned = normalize_markdown("  # Title\r\n\r\n\r\n\r\nBody\n\n\n");
//! assert_eq!(cleaned, "# Title\n\nBody");
//! ```
use regex::Regex;
use std::sync::LazyLock;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Newline run regex pattern is valid and should compile"));
static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("Whitespace regex pattern is valid and should compile"));

/// Decoded plain text plus simple statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    pub content: String,
    pub line_count: usize,
    pub word_count: usize,
}

/// Decode bytes as UTF-8, replacing invalid sequences.
pub fn decode_text(bytes: &[u8]) -> TextDocument {
    let content = String::from_utf8_lossy(bytes).into_owned();
    let line_count = content.lines().count();
    let word_count = content.split_whitespace().count();

    TextDocument {
        content,
        line_count,
        word_count,
    }
}

pub fn normalize_markdown(text: &str) -> String {
    let unix = text.replace("\r\n", "\n");
    EXCESS_NEWLINES.replace_all(&unix, "\n\n").trim().to_string()
}

/// Collapse runs of spaces and tabs to a single space on every line.
///
/// Used for extracted PDF text, where layout often leaves wide gaps.
pub fn collapse_horizontal_whitespace(text: &str) -> String {
    HORIZONTAL_WHITESPACE.replace_all(text, " ").into_owned()
}
