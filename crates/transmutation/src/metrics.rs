//! Conversion metrics.
//!
//! [`MetricsCollector`] keeps monotonic counters over conversion attempts and
//! derives rates from them. Every attempt is recorded exactly once as either a
//! success or a failure, so `successful + failed == total` always holds.

use crate::error::ErrorKind;
use crate::types::FormatTag;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Raw counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetrics {
    pub total_conversions: u64,
    pub successful_conversions: u64,
    pub failed_conversions: u64,
    pub total_bytes_processed: u64,
    /// Cumulative conversion time in milliseconds.
    pub total_time_ms: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub errors_by_kind: BTreeMap<ErrorKind, u64>,
    pub conversions_by_format: BTreeMap<FormatTag, u64>,
}

/// Rates derived from [`ConversionMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Time since the collector was created or last reset.
    pub uptime: Duration,
    /// Successful conversions as a percentage of all attempts.
    pub success_rate: f64,
    /// Cache hits as a percentage of successful lookups (hits + misses).
    pub cache_hit_rate: f64,
    /// Mean time per successful conversion, in milliseconds.
    pub avg_conversion_time_ms: f64,
    /// Bytes processed per second of conversion time.
    pub avg_throughput: f64,
}

#[derive(Debug)]
pub struct MetricsCollector {
    metrics: ConversionMetrics,
    started: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: ConversionMetrics::default(),
            started: Instant::now(),
        }
    }

    /// Record a successful conversion of `bytes` taking `elapsed`.
    pub fn record_success(&mut self, format: FormatTag, bytes: usize, elapsed: Duration, from_cache: bool) {
        let m = &mut self.metrics;
        m.total_conversions += 1;
        m.successful_conversions += 1;
        m.total_bytes_processed += bytes as u64;
        m.total_time_ms += elapsed.as_secs_f64() * 1000.0;

        if from_cache {
            m.cache_hits += 1;
        } else {
            m.cache_misses += 1;
        }

        *m.conversions_by_format.entry(format).or_insert(0) += 1;
    }

    /// Record a failed conversion.
    pub fn record_failure(&mut self, format: FormatTag, kind: ErrorKind) {
        let m = &mut self.metrics;
        m.total_conversions += 1;
        m.failed_conversions += 1;

        *m.errors_by_kind.entry(kind).or_insert(0) += 1;
        *m.conversions_by_format.entry(format).or_insert(0) += 1;
    }

    /// Snapshot of the raw counters.
    pub fn metrics(&self) -> ConversionMetrics {
        self.metrics.clone()
    }

    pub fn summary(&self) -> MetricsSummary {
        let m = &self.metrics;

        let success_rate = percentage(m.successful_conversions, m.total_conversions);
        let cache_hit_rate = percentage(m.cache_hits, m.cache_hits + m.cache_misses);

        let avg_conversion_time_ms = if m.successful_conversions > 0 {
            m.total_time_ms / m.successful_conversions as f64
        } else {
            0.0
        };

        let avg_throughput = if m.total_time_ms > 0.0 {
            m.total_bytes_processed as f64 / m.total_time_ms * 1000.0
        } else {
            0.0
        };

        MetricsSummary {
            uptime: self.started.elapsed(),
            success_rate,
            cache_hit_rate,
            avg_conversion_time_ms,
            avg_throughput,
        }
    }

    /// Zero every counter and restart the uptime clock.
    pub fn reset(&mut self) {
        self.metrics = ConversionMetrics::default();
        self.started = Instant::now();
    }

    /// Export counters and a human-readable summary.
    ///
    /// ```rust
    /// use transmutation::metrics::MetricsCollector;
    /// use transmutation::FormatTag;
    /// use std::time::Duration;
    ///
    /// let mut collector = MetricsCollector::new();
    /// collector.record_success(FormatTag::Pdf, 2048, Duration::from_millis(200), false);
    ///
    /// let json = collector.to_json();
    /// assert_eq!(json["summary"]["avgConversionTime"], "200.00ms");
    /// assert_eq!(json["metrics"]["conversionsByFormat"]["pdf"], 1);
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        let summary = self.summary();

        serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "uptime": summary.uptime.as_millis() as u64,
            "metrics": self.metrics,
            "summary": {
                "successRate": format!("{:.2}%", summary.success_rate),
                "cacheHitRate": format!("{:.2}%", summary.cache_hit_rate),
                "avgConversionTime": format!("{:.2}ms", summary.avg_conversion_time_ms),
                "avgThroughput": format!("{:.2} KB/s", summary.avg_throughput / 1024.0),
            },
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let collector = MetricsCollector::new();
        let summary = collector.summary();
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.cache_hit_rate, 0.0);
        assert_eq!(summary.avg_conversion_time_ms, 0.0);
        assert_eq!(summary.avg_throughput, 0.0);
    }

    #[test]
    fn test_two_successes_one_failure() {
        let mut collector = MetricsCollector::new();
        collector.record_success(FormatTag::Pdf, 1024, Duration::from_millis(100), false);
        collector.record_success(FormatTag::Docx, 2048, Duration::from_millis(200), true);
        collector.record_failure(FormatTag::Pdf, ErrorKind::ConverterFailure);

        let summary = collector.summary();
        assert!((summary.success_rate - 66.666_666).abs() < 0.001);
        assert!((summary.avg_conversion_time_ms - 150.0).abs() < 1e-9);
        assert!((summary.cache_hit_rate - 50.0).abs() < 1e-9);
        assert!((summary.avg_throughput - 10_240.0).abs() < 1e-6);

        let json = collector.to_json();
        assert_eq!(json["summary"]["successRate"], "66.67%");
        assert_eq!(json["summary"]["avgConversionTime"], "150.00ms");
        assert_eq!(json["summary"]["cacheHitRate"], "50.00%");
        assert_eq!(json["summary"]["avgThroughput"], "10.00 KB/s");
    }

    #[test]
    fn test_counters_stay_consistent() {
        let mut collector = MetricsCollector::new();
        for i in 0..10 {
            if i % 3 == 0 {
                collector.record_failure(FormatTag::Txt, ErrorKind::InvalidInput);
            } else {
                collector.record_success(FormatTag::Txt, 10, Duration::from_millis(1), i % 2 == 0);
            }
            let m = collector.metrics();
            assert_eq!(m.successful_conversions + m.failed_conversions, m.total_conversions);
        }

        let m = collector.metrics();
        assert_eq!(m.failed_conversions, 4);
        assert_eq!(m.errors_by_kind.get(&ErrorKind::InvalidInput), Some(&4));
        assert_eq!(m.conversions_by_format.get(&FormatTag::Txt), Some(&10));
    }

    #[test]
    fn test_reset() {
        let mut collector = MetricsCollector::new();
        collector.record_success(FormatTag::Html, 100, Duration::from_millis(5), false);
        collector.record_failure(FormatTag::Html, ErrorKind::Io);

        collector.reset();
        assert_eq!(collector.metrics(), ConversionMetrics::default());
    }

    #[test]
    fn test_to_json_shape() {
        let mut collector = MetricsCollector::new();
        collector.record_failure(FormatTag::Xlsx, ErrorKind::ConverterFailure);

        let json = collector.to_json();
        assert!(json["timestamp"].is_string());
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
        assert!(json["uptime"].is_u64());
        assert_eq!(json["metrics"]["totalConversions"], 1);
        assert_eq!(json["metrics"]["errorsByKind"]["ConverterFailure"], 1);
        assert_eq!(json["metrics"]["conversionsByFormat"]["xlsx"], 1);
        assert_eq!(json["summary"]["successRate"], "0.00%");
    }
}
