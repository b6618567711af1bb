//! PPTX converter.
//!
//! Every slide with text becomes a `## Slide N` section; slides without text
//! are counted but produce no output.

use crate::Result;
use crate::extraction::extract_pptx;
use crate::plugins::{FormatConverter, Plugin};
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag};
use async_trait::async_trait;
use std::time::Instant;

pub struct PptxConverter;

impl Default for PptxConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PptxConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for PptxConverter {
    fn name(&self) -> &str {
        "pptx-converter"
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
impl FormatConverter for PptxConverter {
    fn format(&self) -> FormatTag {
        FormatTag::Pptx
    }

    fn extensions(&self) -> &[&str] {
        &["pptx", "ppt"]
    }

    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult> {
        let started = Instant::now();
        let limit = options.page_limit();
        let (doc, total_slides) =
            super::parse_offloaded(FormatTag::Pptx, content, move |bytes| extract_pptx(bytes, limit)).await?;

        let mut warnings = Vec::new();
        if let Some(warning) = super::truncation_warning(doc.slides.len(), total_slides, "slides") {
            warnings.push(warning);
        }

        let markdown = doc
            .slides
            .iter()
            .filter(|slide| slide.has_text())
            .map(|slide| slide.to_markdown())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut metadata = DocumentMetadata::new(FormatTag::Pptx, content.len());
        metadata.page_count = Some(total_slides);
        super::apply_core_properties(&mut metadata, &doc.properties);

        Ok(super::finish(markdown, metadata, warnings, options, started))
    }
}
