use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, TransmutationError};

// ============================================================================
// Format tags
// ============================================================================

/// Closed set of document kinds the converter understands.
///
/// `Unknown` is the sentinel returned by extension detection when no
/// registered converter accepts a file; it is never a valid conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Txt,
    Html,
    Unknown,
}

impl FormatTag {
    /// Every member except the `Unknown` sentinel.
    pub const CONVERTIBLE: [FormatTag; 6] = [
        FormatTag::Pdf,
        FormatTag::Docx,
        FormatTag::Xlsx,
        FormatTag::Pptx,
        FormatTag::Txt,
        FormatTag::Html,
    ];

    /// Lower-case identifier used in cache keys and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Pdf => "pdf",
            FormatTag::Docx => "docx",
            FormatTag::Xlsx => "xlsx",
            FormatTag::Pptx => "pptx",
            FormatTag::Txt => "txt",
            FormatTag::Html => "html",
            FormatTag::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FormatTag::Unknown)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for FormatTag {
    type Err = TransmutationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(FormatTag::Pdf),
            "docx" => Ok(FormatTag::Docx),
            "xlsx" => Ok(FormatTag::Xlsx),
            "pptx" => Ok(FormatTag::Pptx),
            "txt" => Ok(FormatTag::Txt),
            "html" => Ok(FormatTag::Html),
            "unknown" => Ok(FormatTag::Unknown),
            other => Err(TransmutationError::invalid_format(format!(
                "\"{}\". Supported formats: {}",
                other,
                FormatTag::CONVERTIBLE.map(|f| f.as_str()).join(", ")
            ))),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Per-call conversion options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Normalize whitespace and blank lines in the produced Markdown.
    #[serde(default = "default_true")]
    pub preserve_formatting: bool,

    /// Maximum number of pages, sheets or slides to process (None = all).
    ///
    /// Must be positive when present; signed so out-of-range values coming
    /// from untyped sources can be rejected instead of wrapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<i64>,

    /// Accepted for interface compatibility; images are never extracted.
    #[serde(default)]
    pub extract_images: bool,

    /// Free-form, converter-specific options.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub format_options: HashMap<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            preserve_formatting: true,
            max_pages: None,
            extract_images: false,
            format_options: HashMap::new(),
        }
    }
}

impl ConversionOptions {
    /// Build options from an untyped JSON object.
    ///
    /// Accepts both `camelCase` and `snake_case` keys. Wrongly-typed values
    /// (a fractional `maxPages`, a string `preserveFormatting`, ...) are
    /// rejected with `InvalidOption` rather than coerced.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        crate::validation::validate_options_json(value)?;

        let mut options = Self::default();
        let Some(object) = value.as_object() else {
            return Ok(options);
        };

        for (key, val) in object {
            match key.as_str() {
                "preserveFormatting" | "preserve_formatting" => {
                    options.preserve_formatting = val.as_bool().unwrap_or(true);
                }
                "maxPages" | "max_pages" => {
                    options.max_pages = val.as_i64();
                }
                "extractImages" | "extract_images" => {
                    options.extract_images = val.as_bool().unwrap_or(false);
                }
                "formatOptions" | "format_options" => {
                    if let Some(map) = val.as_object() {
                        options
                            .format_options
                            .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
                    }
                }
                _ => {
                    options.format_options.insert(key.clone(), val.clone());
                }
            }
        }

        Ok(options)
    }

    /// Page limit as a count, ignoring non-positive values.
    pub fn page_limit(&self) -> Option<usize> {
        self.max_pages.filter(|n| *n > 0).map(|n| n as usize)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Metadata describing a converted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Source format.
    pub format: FormatTag,

    /// Input size in bytes.
    pub file_size: usize,

    /// Number of pages, sheets or slides, when the format has them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Format-specific extras (encoding, sheet names, producer, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn new(format: FormatTag, file_size: usize) -> Self {
        Self {
            format,
            file_size,
            page_count: None,
            title: None,
            author: None,
            created_at: None,
            extra: HashMap::new(),
        }
    }
}

/// Output of a single conversion.
///
/// Immutable once produced: the cache hands out clones, never references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Produced Markdown.
    pub markdown: String,

    pub metadata: DocumentMetadata,

    /// Time spent inside the converter.
    pub conversion_time: Duration,

    /// Non-fatal issues, in the order they were raised.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ConversionResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
