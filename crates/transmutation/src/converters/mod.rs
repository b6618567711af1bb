//! Built-in format converters.
//!
//! Each converter wraps one backend from [`crate::extraction`] and implements
//! [`FormatConverter`](crate::plugins::FormatConverter). Which converters exist
//! depends on the enabled cargo features:
//!
//! - `pdf`: [`PdfConverter`]
//! - `office`: [`DocxConverter`], [`PptxConverter`]
//! - `excel`: [`XlsxConverter`]
//! - `html`: [`HtmlConverter`]
//!
//! [`TxtConverter`] is always available.

#[cfg(feature = "office")]
pub mod docx;
#[cfg(feature = "html")]
pub mod html;
#[cfg(feature = "pdf")]
pub mod pdf;
#[cfg(feature = "office")]
pub mod pptx;
pub mod txt;
#[cfg(feature = "excel")]
pub mod xlsx;

#[cfg(feature = "office")]
pub use docx::DocxConverter;
#[cfg(feature = "html")]
pub use html::HtmlConverter;
#[cfg(feature = "pdf")]
pub use pdf::PdfConverter;
#[cfg(feature = "office")]
pub use pptx::PptxConverter;
pub use txt::TxtConverter;
#[cfg(feature = "excel")]
pub use xlsx::XlsxConverter;

use crate::Result;
use crate::extraction::normalize_markdown;
use crate::plugins::FormatRegistry;
use crate::types::{ConversionOptions, ConversionResult, DocumentMetadata};
use std::sync::Arc;
use std::time::Instant;

/// Separator placed between pages, sheets and slides.
pub(crate) const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Register every built-in converter enabled at compile time.
///
/// Order matters for extension lookups: PDF, DOCX, XLSX, PPTX, TXT, HTML.
pub fn register_defaults(registry: &mut FormatRegistry) -> Result<()> {
    #[cfg(feature = "pdf")]
    registry.register(Arc::new(PdfConverter::new()))?;

    #[cfg(feature = "office")]
    registry.register(Arc::new(DocxConverter::new()))?;

    #[cfg(feature = "excel")]
    registry.register(Arc::new(XlsxConverter::new()))?;

    #[cfg(feature = "office")]
    registry.register(Arc::new(PptxConverter::new()))?;

    registry.register(Arc::new(TxtConverter::new()))?;

    #[cfg(feature = "html")]
    registry.register(Arc::new(HtmlConverter::new()))?;

    Ok(())
}

/// Assemble a result, applying the shared Markdown cleanup when the caller
/// asked to preserve formatting.
pub(crate) fn finish(
    markdown: String,
    metadata: DocumentMetadata,
    warnings: Vec<String>,
    options: &ConversionOptions,
    started: Instant,
) -> ConversionResult {
    let markdown = if options.preserve_formatting {
        normalize_markdown(&markdown)
    } else {
        markdown
    };

    let result = ConversionResult {
        markdown,
        metadata,
        conversion_time: started.elapsed(),
        warnings,
    };

    if result.has_warnings() {
        for warning in &result.warnings {
            tracing::warn!(format = %result.metadata.format, warning = %warning, "Conversion warning");
        }
    }

    result
}

/// Run a parser over `content`, on the blocking pool when inside a batch.
///
/// Outside a batch the parser runs inline on the calling task.
#[cfg(any(feature = "pdf", feature = "office", feature = "excel"))]
pub(crate) async fn parse_offloaded<T, F>(format: crate::types::FormatTag, content: &[u8], parse: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&[u8]) -> Result<T> + Send + 'static,
{
    if !crate::core::batch_mode::is_batch_mode() {
        return parse(content);
    }

    let content_owned = content.to_vec();
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _guard = span.entered();
        parse(&content_owned)
    })
    .await
    .map_err(|e| crate::TransmutationError::converter_with_source(format, "parsing task failed", e))?
}

/// Warning raised when a page limit cut a document short.
pub(crate) fn truncation_warning(processed: usize, total: usize, unit: &str) -> Option<String> {
    (processed < total).then(|| format!("Only processed {} of {} {}", processed, total, unit))
}

/// Copy Office core properties into result metadata.
#[cfg(feature = "office")]
pub(crate) fn apply_core_properties(metadata: &mut DocumentMetadata, properties: &crate::extraction::CoreProperties) {
    metadata.title = properties.title.clone();
    metadata.author = properties.creator.clone();
    metadata.created_at = properties.created_at();

    let extras = [
        ("subject", &properties.subject),
        ("keywords", &properties.keywords),
        ("last_modified_by", &properties.last_modified_by),
        ("modified", &properties.modified),
    ];
    for (key, value) in extras {
        if let Some(value) = value {
            metadata.extra.insert(key.to_string(), value.clone().into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormatTag;

    #[test]
    fn test_register_defaults_is_ordered() {
        let mut registry = FormatRegistry::new();
        register_defaults(&mut registry).unwrap();

        let formats = registry.supported_formats();
        assert!(formats.contains(&FormatTag::Txt));

        let position = |tag: FormatTag| formats.iter().position(|f| *f == tag);
        if let (Some(pdf), Some(txt)) = (position(FormatTag::Pdf), position(FormatTag::Txt)) {
            assert!(pdf < txt);
        }
        if let (Some(txt), Some(html)) = (position(FormatTag::Txt), position(FormatTag::Html)) {
            assert!(txt < html);
        }
    }

    #[test]
    fn test_truncation_warning() {
        assert_eq!(
            truncation_warning(2, 5, "pages").as_deref(),
            Some("Only processed 2 of 5 pages")
        );
        assert!(truncation_warning(5, 5, "pages").is_none());
    }

    #[test]
    fn test_finish_respects_preserve_formatting() {
        let metadata = DocumentMetadata::new(FormatTag::Txt, 4);
        let raw = "a\r\n\r\n\r\n\r\nb  ".to_string();

        let result = finish(raw.clone(), metadata.clone(), Vec::new(), &ConversionOptions::default(), Instant::now());
        assert_eq!(result.markdown, "a\n\nb");

        let options = ConversionOptions {
            preserve_formatting: false,
            ..Default::default()
        };
        let result = finish(raw.clone(), metadata, Vec::new(), &options, Instant::now());
        assert_eq!(result.markdown, raw);
    }
}
