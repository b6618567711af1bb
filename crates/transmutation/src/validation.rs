//! Input validation guards.
//!
//! Stateless checks run by the [`Converter`](crate::Converter) before any
//! cache or converter interaction. Each returns `Ok(())` or the matching
//! validation error and has no side effects.

use crate::core::config::ConverterConfig;
use crate::types::{ConversionOptions, FormatTag};
use crate::{Result, TransmutationError};

/// Largest buffer accepted for conversion (500 MiB).
pub const MAX_BUFFER_SIZE: usize = 500 * 1024 * 1024;

/// Upper bound for `cache_size`.
pub const MAX_CACHE_SIZE: usize = 10_000;

const SENSITIVE_PREFIXES: [&str; 3] = ["/etc/", "/sys/", "/proc/"];

/// Reject empty buffers and buffers larger than [`MAX_BUFFER_SIZE`].
pub fn validate_buffer(content: &[u8]) -> Result<()> {
    if content.is_empty() {
        return Err(TransmutationError::invalid_input("buffer is empty"));
    }

    if content.len() > MAX_BUFFER_SIZE {
        return Err(TransmutationError::invalid_input(format!(
            "buffer size ({:.2}MB) exceeds maximum allowed size ({}MB)",
            content.len() as f64 / 1024.0 / 1024.0,
            MAX_BUFFER_SIZE / 1024 / 1024
        )));
    }

    Ok(())
}

/// Reject the `Unknown` sentinel.
pub fn validate_format(format: FormatTag) -> Result<()> {
    if format.is_unknown() {
        return Err(TransmutationError::invalid_format(
            "Cannot convert documents with unknown format. Please specify a valid format.",
        ));
    }
    Ok(())
}

/// Parse a format name and reject unknown names and the `Unknown` sentinel.
pub fn parse_format(name: &str) -> Result<FormatTag> {
    let format: FormatTag = name.parse()?;
    validate_format(format)?;
    Ok(format)
}

/// Reject blank paths, parent-directory traversal, and system roots.
pub fn validate_file_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(TransmutationError::invalid_path("path is empty"));
    }

    let dangerous = path.contains("..") || SENSITIVE_PREFIXES.iter().any(|prefix| path.starts_with(prefix));
    if dangerous {
        return Err(TransmutationError::invalid_path(format!(
            "path contains potentially dangerous pattern: {}",
            path
        )));
    }

    Ok(())
}

/// Check typed options. `max_pages`, when present, must be at least 1.
pub fn validate_options(options: &ConversionOptions) -> Result<()> {
    if let Some(max_pages) = options.max_pages
        && max_pages < 1
    {
        return Err(TransmutationError::invalid_option("maxPages: must be at least 1"));
    }
    Ok(())
}

/// Check untyped options before they are turned into [`ConversionOptions`].
///
/// `null` means "no options". Otherwise the value must be an object whose
/// page limit (`maxPages` or `max_pages`) is an integer of at least 1 and
/// whose formatting flag (`preserveFormatting` or `preserve_formatting`) is
/// a boolean.
pub fn validate_options_json(options: &serde_json::Value) -> Result<()> {
    let object = match options {
        serde_json::Value::Null => return Ok(()),
        serde_json::Value::Object(object) => object,
        other => {
            return Err(TransmutationError::invalid_option(format!(
                "options: expected object, got {}",
                json_type_name(other)
            )));
        }
    };

    for key in ["maxPages", "max_pages"] {
        let Some(value) = object.get(key) else {
            continue;
        };

        let serde_json::Value::Number(number) = value else {
            return Err(TransmutationError::invalid_option(format!(
                "maxPages: expected number, got {}",
                json_type_name(value)
            )));
        };

        if number.as_f64().is_some_and(|n| n < 1.0) {
            return Err(TransmutationError::invalid_option("maxPages: must be at least 1"));
        }

        if number.as_i64().is_none() {
            return Err(TransmutationError::invalid_option("maxPages: must be an integer"));
        }
    }

    for key in ["preserveFormatting", "preserve_formatting"] {
        if let Some(value) = object.get(key)
            && !value.is_boolean()
        {
            return Err(TransmutationError::invalid_option(format!(
                "preserveFormatting: expected boolean, got {}",
                json_type_name(value)
            )));
        }
    }

    Ok(())
}

/// Check cache sizing: `cache_size` in `[1, 10000]`, `cache_max_age_ms >= 0`.
pub fn validate_cache_config(config: &ConverterConfig) -> Result<()> {
    if config.cache_size < 1 {
        return Err(TransmutationError::config("cache_size must be at least 1"));
    }

    if config.cache_size > MAX_CACHE_SIZE {
        return Err(TransmutationError::config(format!(
            "cache_size maximum is {}",
            MAX_CACHE_SIZE
        )));
    }

    if config.cache_max_age_ms < 0 {
        return Err(TransmutationError::config("cache_max_age_ms must be non-negative"));
    }

    Ok(())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
