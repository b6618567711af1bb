//! Plugin system for format converters.
//!
//! - [`Plugin`] - base lifecycle trait (`name`, `version`, `initialize`, `shutdown`)
//! - [`FormatConverter`] - converts one document format to Markdown
//! - [`FormatRegistry`] - ordered, first-match dispatch over converters
//!
//! Custom converters are registered on a [`FormatRegistry`] which is then
//! handed to [`Converter::builder`](crate::Converter::builder):
//!
//! ```rust
//! use transmutation::plugins::FormatRegistry;
//! use transmutation::converters::TxtConverter;
//! use transmutation::Converter;
//! use std::sync::Arc;
//!
//! let mut registry = FormatRegistry::new();
//! registry.register(Arc::new(TxtConverter::new()))?;
//!
//! let converter = Converter::builder().registry(registry).build()?;
//! assert!(converter.is_supported("notes.txt"));
//! assert!(!converter.is_supported("report.pdf"));
//! # Ok::<(), transmutation::TransmutationError>(())
//! ```

pub mod converter;
pub mod registry;
pub mod traits;

pub use converter::FormatConverter;
pub use registry::FormatRegistry;
pub use traits::Plugin;
