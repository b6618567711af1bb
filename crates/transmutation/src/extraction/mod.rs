//! Format-specific extraction backends.
//!
//! Each module parses one document format with its backing crate and returns
//! plain data; the converters in [`crate::converters`] turn that data into a
//! [`ConversionResult`](crate::ConversionResult).

pub mod text;

#[cfg(feature = "excel")]
pub mod excel;

#[cfg(feature = "html")]
pub mod html;

#[cfg(feature = "office")]
pub mod docx;

#[cfg(feature = "office")]
pub mod ooxml;

#[cfg(feature = "office")]
pub mod pptx;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(any(feature = "office", feature = "excel"))]
pub mod table;

pub use text::{TextDocument, decode_text, normalize_markdown};

#[cfg(feature = "excel")]
pub use excel::{Sheet, Workbook, read_workbook};

#[cfg(feature = "html")]
pub use html::{HtmlDocument, convert_html_to_markdown, extract_html};

#[cfg(feature = "office")]
pub use docx::{DocxDocument, extract_docx};

#[cfg(feature = "office")]
pub use ooxml::CoreProperties;

#[cfg(feature = "office")]
pub use pptx::{PptxDocument, Slide, extract_pptx};

#[cfg(feature = "pdf")]
pub use pdf::{PdfDocument, PdfInfo, extract_pdf};

#[cfg(any(feature = "office", feature = "excel"))]
pub use table::rows_to_markdown;
