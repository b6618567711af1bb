//! Plain text converter.
//!
//! Text is already valid Markdown; the bytes are decoded as UTF-8 (invalid
//! sequences replaced) and passed through.

use crate::Result;
use crate::extraction::decode_text;
use crate::plugins::{FormatConverter, Plugin};
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag};
use async_trait::async_trait;
use std::time::Instant;

/// Plain text converter.
///
/// Handles `.txt`, `.text`, `.md` and `.markdown` files.
pub struct TxtConverter;

impl Default for TxtConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl TxtConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for TxtConverter {
    fn name(&self) -> &str {
        "txt-converter"
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

    fn description(&self) -> &str {
        "Passes UTF-8 plain text and Markdown through with line and word counts"
    }
}

#[async_trait]
impl FormatConverter for TxtConverter {
    fn format(&self) -> FormatTag {
        FormatTag::Txt
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text", "md", "markdown"]
    }

    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult> {
        let started = Instant::now();
        let doc = decode_text(content);

        let mut metadata = DocumentMetadata::new(FormatTag::Txt, content.len());
        metadata.extra.insert("encoding".to_string(), "utf-8".into());
        metadata.extra.insert("line_count".to_string(), doc.line_count.into());
        metadata.extra.insert("word_count".to_string(), doc.word_count.into());

        Ok(super::finish(doc.content, metadata, Vec::new(), options, started))
    }
}
