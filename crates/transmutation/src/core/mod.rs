//! Core conversion orchestration.
//!
//! - **Entry points**: [`Converter::convert_file`] and [`Converter::convert_bytes`],
//!   plus the one-shot [`convert_file`] / [`convert_bytes`] functions
//! - **Batch**: [`Converter::batch_convert_files`]
//! - **Configuration**: [`ConverterConfig`], loadable from TOML or JSON
//! - **I/O**: file reading with error translation
//!
//! # Example
//!
//! ```rust,no_run
//! use transmutation::core::converter::convert_file;
//! use transmutation::ConversionOptions;
//!
//! # async fn example() -> transmutation::Result<()> {
//! let result = convert_file("document.docx", &ConversionOptions::default()).await?;
//! println!("Markdown: {}", result.markdown);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub(crate) mod batch_mode;
pub mod config;
pub mod converter;
pub mod io;

pub use batch::{BatchItem, BatchReport, DEFAULT_PARALLELISM};
pub use config::ConverterConfig;
pub use converter::{Converter, ConverterBuilder, convert_bytes, convert_file};
