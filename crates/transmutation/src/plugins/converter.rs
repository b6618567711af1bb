//! Format converter plugin trait.
//!
//! A converter turns the bytes of one document format into Markdown. The
//! registry picks converters by file extension (`can_handle`) or by explicit
//! [`FormatTag`] (`format`).

use crate::Result;
use crate::plugins::Plugin;
use crate::types::{ConversionOptions, ConversionResult, FormatTag};
use async_trait::async_trait;

/// Trait for format converter plugins.
///
/// # Example
///
/// ```rust
/// use transmutation::plugins::{FormatConverter, Plugin};
/// use transmutation::{ConversionOptions, ConversionResult, DocumentMetadata, FormatTag, Result};
/// use async_trait::async_trait;
/// use std::time::Duration;
///
/// struct ShoutingText;
///
/// impl Plugin for ShoutingText {
///     fn name(&self) -> &str { "shouting-text" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// #[async_trait]
/// impl FormatConverter for ShoutingText {
///     fn format(&self) -> FormatTag { FormatTag::Txt }
///
///     fn extensions(&self) -> &[&str] { &["txt"] }
///
///     async fn convert(&self, content: &[u8], _options: &ConversionOptions) -> Result<ConversionResult> {
///         Ok(ConversionResult {
///             markdown: String::from_utf8_lossy(content).to_uppercase(),
///             metadata: DocumentMetadata::new(FormatTag::Txt, content.len()),
///             conversion_time: Duration::ZERO,
///             warnings: Vec::new(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait FormatConverter: Plugin {
    /// The format tag this converter produces results for.
    fn format(&self) -> FormatTag;

    /// Lower-case file extensions (without the dot) this converter accepts.
    fn extensions(&self) -> &[&str];

    /// Whether this converter accepts a file with `extension`.
    ///
    /// `extension` is already stripped of its leading dot and lower-cased by
    /// the registry.
    fn can_handle(&self, extension: &str) -> bool {
        self.extensions().contains(&extension)
    }

    /// Convert document bytes into Markdown.
    ///
    /// # Errors
    ///
    /// Implementations wrap parser failures in
    /// [`TransmutationError::Converter`](crate::TransmutationError::Converter)
    /// carrying [`Self::format`].
    async fn convert(&self, content: &[u8], options: &ConversionOptions) -> Result<ConversionResult>;
}
