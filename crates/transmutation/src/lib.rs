//! Transmutation - Document to Markdown Conversion
//!
//! Transmutation converts PDF, DOCX, XLSX, PPTX, HTML and plain text documents
//! into Markdown. A [`Converter`] dispatches each document to a format plugin
//! and optionally caches results by content hash and records metrics.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use transmutation::{ConversionOptions, Converter, ConverterConfig};
//!
//! # async fn example() -> transmutation::Result<()> {
//! let converter = Converter::new(ConverterConfig::default())?;
//! let result = converter.convert_file("document.pdf", &ConversionOptions::default()).await?;
//! println!("{}", result.markdown);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): orchestration, batch conversion, config loading
//! - **Plugin System** (`plugins`): converter trait and ordered registry
//! - **Converters** (`converters`): built-in format plugins
//! - **Extraction** (`extraction`): format parsers backing the converters
//! - **Cache** (`cache`): content-addressed LRU with max age
//! - **Metrics** (`metrics`): conversion counters and derived rates
//!
//! # Features
//!
//! - `pdf`: PDF via `lopdf`
//! - `office`: DOCX and PPTX via `zip` + `roxmltree`
//! - `excel`: XLSX/XLS via `calamine`
//! - `html`: HTML via `html-to-markdown-rs`

#![deny(unsafe_code)]

pub mod cache;
pub mod converters;
pub mod core;
pub mod error;
pub mod extraction;
pub mod metrics;
pub mod plugins;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, Result, TransmutationError};
pub use types::*;

pub use cache::{CacheStats, ConversionCache};
pub use core::batch::{BatchItem, BatchReport, DEFAULT_PARALLELISM};
pub use core::config::ConverterConfig;
pub use core::converter::{Converter, ConverterBuilder, convert_bytes, convert_file};
pub use metrics::{ConversionMetrics, MetricsCollector, MetricsSummary};
