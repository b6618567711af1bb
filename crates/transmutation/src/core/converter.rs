//! Conversion orchestration.
//!
//! [`Converter`] ties the registry, cache, validator and metrics together.
//! A call to [`Converter::convert_bytes`]:
//!
//! 1. validates the buffer, format and options (when `validate_input` is set)
//! 2. returns a cached result if one exists
//! 3. resolves the converter for the format
//! 4. converts, stores the result and records metrics
//!
//! Validation failures return before the cache or metrics are touched.
//! Every other failure is recorded under its [`ErrorKind`](crate::ErrorKind)
//! and returned unchanged.

use crate::cache::{CacheStats, ConversionCache, cache_key};
use crate::core::config::ConverterConfig;
use crate::core::io;
use crate::metrics::{ConversionMetrics, MetricsCollector, MetricsSummary};
use crate::plugins::FormatRegistry;
use crate::plugins::registry::extension_of;
use crate::types::{ConversionOptions, ConversionResult, FormatTag};
use crate::{Result, TransmutationError, validation};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span};

type Gate = Arc<tokio::sync::Mutex<()>>;

/// Document-to-Markdown converter.
///
/// `Converter` is `Send + Sync` and meant to be shared (for example behind an
/// `Arc`). The cache and metrics collector are locked only for single
/// synchronous operations.
///
/// # Example
///
/// ```rust,no_run
/// use transmutation::{ConversionOptions, Converter, ConverterConfig};
///
/// # async fn example() -> transmutation::Result<()> {
/// let converter = Converter::new(ConverterConfig {
///     enable_cache: true,
///     collect_metrics: true,
///     ..Default::default()
/// })?;
///
/// let result = converter.convert_file("report.pdf", &ConversionOptions::default()).await?;
/// println!("{}", result.markdown);
/// # Ok(())
/// # }
/// ```
pub struct Converter {
    config: ConverterConfig,
    registry: FormatRegistry,
    cache: Option<Mutex<ConversionCache>>,
    metrics: Option<Mutex<MetricsCollector>>,
    in_flight: Mutex<HashMap<String, Gate>>,
    span: Span,
}

/// Builder for [`Converter`].
#[derive(Default)]
pub struct ConverterBuilder {
    config: ConverterConfig,
    registry: Option<FormatRegistry>,
    span: Option<Span>,
}

impl ConverterBuilder {
    pub fn config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `registry` instead of the built-in converters.
    pub fn registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Emit every log event of this converter inside `span`.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Validate the configuration and build the converter.
    ///
    /// # Errors
    ///
    /// Returns `TransmutationError::Config` for an out-of-range cache size or
    /// a negative max age, and any error raised while registering the
    /// built-in converters.
    pub fn build(self) -> Result<Converter> {
        let config = self.config;
        validation::validate_cache_config(&config)?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => FormatRegistry::with_defaults()?,
        };
        let span = self.span.unwrap_or_else(|| tracing::info_span!("transmutation"));

        let cache = if config.enable_cache {
            let cache = ConversionCache::from_config(&config)?;
            span.in_scope(|| {
                tracing::info!(
                    size = config.cache_size,
                    max_age_ms = config.cache_max_age_ms,
                    "Cache enabled"
                )
            });
            Some(Mutex::new(cache))
        } else {
            None
        };

        let metrics = if config.collect_metrics {
            span.in_scope(|| tracing::info!("Metrics collection enabled"));
            Some(Mutex::new(MetricsCollector::new()))
        } else {
            None
        };

        Ok(Converter {
            config,
            registry,
            cache,
            metrics,
            in_flight: Mutex::new(HashMap::new()),
            span,
        })
    }
}

impl Converter {
    /// Create a converter with the built-in converters.
    pub fn new(config: ConverterConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Convert `content` as `format`.
    ///
    /// # Errors
    ///
    /// - validation errors (`InvalidInput`, `InvalidFormat`, `InvalidOption`)
    ///   when `validate_input` is enabled
    /// - `NoConverterForFormat` if no registered converter produces `format`
    /// - the converter's own error, unchanged
    pub async fn convert_bytes(
        &self,
        content: &[u8],
        format: FormatTag,
        options: &ConversionOptions,
    ) -> Result<ConversionResult> {
        self.convert_bytes_inner(content, format, options)
            .instrument(self.span.clone())
            .await
    }

    /// Convert the file at `path`, detecting its format from the extension.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for an empty or unsafe path (when `validate_input` is set)
    /// - `UnsupportedFormat` when no converter accepts the extension
    /// - `FileNotFound`, `PermissionDenied` or `Io` when reading fails
    /// - anything [`Self::convert_bytes`] returns
    pub async fn convert_file(&self, path: impl AsRef<Path>, options: &ConversionOptions) -> Result<ConversionResult> {
        let path = path.as_ref();
        self.convert_file_inner(path, options)
            .instrument(self.span.clone())
            .await
    }

    async fn convert_file_inner(&self, path: &Path, options: &ConversionOptions) -> Result<ConversionResult> {
        if self.config.validate_input {
            validation::validate_file_path(&path.to_string_lossy())?;
        }

        tracing::debug!(path = %path.display(), "Converting file");

        let format = self.registry.detect_format(path);
        if format.is_unknown() {
            let extension = extension_of(path).map(|ext| format!(".{}", ext)).unwrap_or_default();
            tracing::error!(extension = %extension, "Unsupported file format");
            return Err(TransmutationError::UnsupportedFormat {
                extension,
                supported: self.supported_formats_list(),
            });
        }

        let content = io::read_file_async(path).await?;
        self.convert_bytes_inner(&content, format, options).await
    }

    async fn convert_bytes_inner(
        &self,
        content: &[u8],
        format: FormatTag,
        options: &ConversionOptions,
    ) -> Result<ConversionResult> {
        let started = Instant::now();

        if self.config.validate_input {
            validation::validate_buffer(content)?;
            validation::validate_format(format)?;
            validation::validate_options(options)?;
        }

        tracing::debug!(format = %format, bytes = content.len(), "Converting buffer");

        let Some(cache) = &self.cache else {
            return self.run(content, format, options, None, started).await;
        };

        let key = cache_key(content, format);
        if let Some(hit) = self.cached(cache, &key, format, content.len(), started) {
            return Ok(hit);
        }
        tracing::debug!(format = %format, "Cache miss");

        if !self.config.single_flight {
            return self.run(content, format, options, Some(&key), started).await;
        }

        let gate = InFlight::acquire(&self.in_flight, &key);
        let _turn = gate.gate.lock().await;

        // An earlier holder of the gate may have stored the result.
        if let Some(hit) = self.cached(cache, &key, format, content.len(), started) {
            return Ok(hit);
        }

        self.run(content, format, options, Some(&key), started).await
    }

    /// Cache lookup that records a hit.
    fn cached(
        &self,
        cache: &Mutex<ConversionCache>,
        key: &str,
        format: FormatTag,
        bytes: usize,
        started: Instant,
    ) -> Option<ConversionResult> {
        let hit = cache.lock().get_by_key(key)?;

        tracing::debug!(format = %format, "Cache hit");
        if let Some(metrics) = &self.metrics {
            metrics.lock().record_success(format, bytes, started.elapsed(), true);
        }

        Some(hit)
    }

    /// Resolve the converter, convert, then store and record the outcome.
    async fn run(
        &self,
        content: &[u8],
        format: FormatTag,
        options: &ConversionOptions,
        key: Option<&str>,
        started: Instant,
    ) -> Result<ConversionResult> {
        let outcome = match self.registry.get(format) {
            Ok(converter) => converter.convert(content, options).await,
            Err(e) => Err(e),
        };
        let elapsed = started.elapsed();

        match outcome {
            Ok(result) => {
                tracing::info!(
                    format = %format,
                    elapsed_ms = elapsed.as_millis() as u64,
                    size_kb = %format!("{:.2}", content.len() as f64 / 1024.0),
                    "Converted document"
                );

                if let (Some(cache), Some(key)) = (&self.cache, key) {
                    cache.lock().set_by_key(key.to_string(), result.clone());
                    tracing::debug!(format = %format, "Cached result");
                }

                if let Some(metrics) = &self.metrics {
                    metrics.lock().record_success(format, content.len(), elapsed, false);
                }

                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    format = %format,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "Conversion failed"
                );

                if let Some(metrics) = &self.metrics {
                    metrics.lock().record_failure(format, e.kind());
                }

                Err(e)
            }
        }
    }

    fn supported_formats_list(&self) -> String {
        self.registry
            .supported_formats()
            .iter()
            .map(FormatTag::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Format a file would be converted as, from its extension.
    pub fn detect_format(&self, path: impl AsRef<Path>) -> FormatTag {
        self.registry.detect_format(path)
    }

    pub fn is_supported(&self, path: impl AsRef<Path>) -> bool {
        self.registry.is_supported(path)
    }

    /// Distinct formats of the registered converters, in registration order.
    pub fn supported_formats(&self) -> Vec<FormatTag> {
        self.registry.supported_formats()
    }

    /// Remove every cached result. No-op without a cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    /// Remove expired cached results, returning how many were dropped.
    pub fn clear_expired_cache(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().clear_expired())
    }

    /// Cache statistics, or `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.lock().stats())
    }

    /// Approximate cache memory cost in bytes; 0 without a cache.
    pub fn cache_memory_usage(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().memory_usage())
    }

    /// Metrics snapshot, or `None` when metrics are disabled.
    pub fn metrics(&self) -> Option<ConversionMetrics> {
        self.metrics.as_ref().map(|m| m.lock().metrics())
    }

    pub fn metrics_summary(&self) -> Option<MetricsSummary> {
        self.metrics.as_ref().map(|m| m.lock().summary())
    }

    pub fn reset_metrics(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.lock().reset();
        }
    }

    /// Metrics as JSON, or `None` when metrics are disabled.
    pub fn export_metrics(&self) -> Option<serde_json::Value> {
        self.metrics.as_ref().map(|m| m.lock().to_json())
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Per-key gate held while one caller converts a given content hash.
///
/// Dropping the last holder removes the gate from the map.
struct InFlight<'a> {
    map: &'a Mutex<HashMap<String, Gate>>,
    key: String,
    gate: Gate,
}

impl<'a> InFlight<'a> {
    fn acquire(map: &'a Mutex<HashMap<String, Gate>>, key: &str) -> Self {
        let gate = map.lock().entry(key.to_string()).or_default().clone();
        Self {
            map,
            key: key.to_string(),
            gate,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock();
        // One reference in the map plus ours.
        if Arc::strong_count(&self.gate) == 2 {
            map.remove(&self.key);
        }
    }
}

/// Convert a file with a default-configured [`Converter`].
pub async fn convert_file(path: impl AsRef<Path>, options: &ConversionOptions) -> Result<ConversionResult> {
    Converter::new(ConverterConfig::default())?
        .convert_file(path, options)
        .await
}

/// Convert bytes with a default-configured [`Converter`].
pub async fn convert_bytes(content: &[u8], format: FormatTag, options: &ConversionOptions) -> Result<ConversionResult> {
    Converter::new(ConverterConfig::default())?
        .convert_bytes(content, format, options)
        .await
}
