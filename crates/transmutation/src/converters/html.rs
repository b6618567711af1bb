//! HTML converter.

use crate::Result;
use crate::extraction::extract_html;
use crate::plugins::{FormatConverter, Plugin};
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag};
use async_trait::async_trait;
use std::time::Instant;

/// HTML to Markdown converter.
///
/// Scripts and styles are dropped and only `<body>` is converted; the
/// document title comes from `<title>`.
pub struct HtmlConverter;

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for HtmlConverter {
    fn name(&self) -> &str {
        "html-converter"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl FormatConverter for HtmlConverter {
    fn format(&self) -> FormatTag {
        FormatTag::Html
    }

    fn extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult> {
        let started = Instant::now();
        let doc = extract_html(content)?;

        let mut metadata = DocumentMetadata::new(FormatTag::Html, content.len());
        metadata.title = doc.title;
        metadata.extra.insert("encoding".to_string(), "utf-8".into());

        Ok(super::finish(doc.markdown, metadata, Vec::new(), options, started))
    }
}
