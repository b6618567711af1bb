//! PDF converter.
//!
//! Page text is extracted with `lopdf`, runs of spaces are collapsed and
//! pages are separated by a horizontal rule. `max_pages` stops extraction
//! early and records a warning.

use crate::Result;
use crate::extraction::extract_pdf;
use crate::extraction::text::collapse_horizontal_whitespace;
use crate::plugins::{FormatConverter, Plugin};
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag};
use async_trait::async_trait;
use std::time::Instant;

pub struct PdfConverter;

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for PdfConverter {
    fn name(&self) -> &str {
        "pdf-converter"
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
        "Extracts page text and document info from PDF files"
    }
}

#[async_trait]
impl FormatConverter for PdfConverter {
    fn format(&self) -> FormatTag {
        FormatTag::Pdf
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    #[tracing::instrument(skip(self, content, options), fields(content.size_bytes = content.len()))]
    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult> {
        let started = Instant::now();
        let limit = options.page_limit();
        let doc = super::parse_offloaded(FormatTag::Pdf, content, move |bytes| extract_pdf(bytes, limit)).await?;

        let mut warnings = doc.warnings;
        if let Some(warning) = super::truncation_warning(doc.pages.len(), doc.total_pages, "pages") {
            warnings.push(warning);
        }

        let markdown = doc
            .pages
            .iter()
            .map(|page| collapse_horizontal_whitespace(page).trim().to_string())
            .collect::<Vec<_>>()
            .join(super::SECTION_SEPARATOR);

        let mut metadata = DocumentMetadata::new(FormatTag::Pdf, content.len());
        metadata.page_count = Some(doc.total_pages);
        metadata.title = doc.info.title;
        metadata.author = doc.info.author;
        metadata.created_at = doc.info.created_at;
        if let Some(producer) = doc.info.producer {
            metadata.extra.insert("producer".to_string(), producer.into());
        }
        if let Some(creator) = doc.info.creator {
            metadata.extra.insert("creator".to_string(), creator.into());
        }

        Ok(super::finish(markdown, metadata, warnings, options, started))
    }
}
