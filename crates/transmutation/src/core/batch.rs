//! Batch file conversion.
//!
//! Files are converted in consecutive groups of `parallel`. Each group runs
//! concurrently and completes before the next one starts. A failing file
//! never aborts the batch; its error is reported in its [`BatchItem`].
//!
//! Groups run in batch mode, so the PDF, Office and spreadsheet converters
//! parse on the blocking pool and a group's files are parsed in parallel.

use crate::Result;
use crate::core::batch_mode::with_batch_mode;
use crate::core::converter::Converter;
use crate::types::{ConversionOptions, ConversionResult};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Group size used when the caller does not choose one.
pub const DEFAULT_PARALLELISM: usize = 4;

/// Outcome for one input path.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<ConversionResult>,
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    /// True when no file failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| !item.is_success())
    }
}

impl Converter {
    /// Convert many files, `parallel` at a time.
    ///
    /// A `parallel` of zero is treated as one.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use transmutation::{ConversionOptions, Converter, ConverterConfig};
    ///
    /// # async fn example() -> transmutation::Result<()> {
    /// let converter = Converter::new(ConverterConfig::default())?;
    /// let report = converter
    ///     .batch_convert_files(&["a.pdf", "b.docx"], &ConversionOptions::default(), 4)
    ///     .await;
    ///
    /// for item in report.failures() {
    ///     eprintln!("{}: {}", item.path.display(), item.result.as_ref().unwrap_err());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn batch_convert_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &ConversionOptions,
        parallel: usize,
    ) -> BatchReport {
        let parallel = parallel.max(1);
        let span = tracing::info_span!(parent: self.span(), "batch", files = paths.len(), parallel);

        async {
            let mut report = BatchReport {
                items: Vec::with_capacity(paths.len()),
                ..Default::default()
            };

            for group in paths.chunks(parallel) {
                let results =
                    with_batch_mode(join_all(group.iter().map(|path| self.convert_file(path, options)))).await;

                for (path, result) in group.iter().zip(results) {
                    match &result {
                        Ok(_) => report.succeeded += 1,
                        Err(e) => {
                            report.failed += 1;
                            tracing::warn!(path = %path.as_ref().display(), error = %e, "Batch item failed");
                        }
                    }
                    report.items.push(BatchItem {
                        path: path.as_ref().to_path_buf(),
                        result,
                    });
                }
            }

            tracing::info!(succeeded = report.succeeded, failed = report.failed, "Batch complete");
            report
        }
        .instrument(span)
        .await
    }
}
