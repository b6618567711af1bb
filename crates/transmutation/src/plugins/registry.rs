//! Converter registration and format dispatch.
//!
//! The registry is an insertion-ordered list of converters. Lookups are linear
//! and first-match: the earliest registered converter that accepts an
//! extension (or produces a tag) wins.

use crate::plugins::FormatConverter;
use crate::types::FormatTag;
use crate::{Result, TransmutationError};
use std::path::Path;
use std::sync::Arc;

/// Validate a plugin name before registration.
///
/// # Rules
///
/// - Name cannot be empty
/// - Name cannot contain whitespace
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TransmutationError::invalid_input("Plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(TransmutationError::invalid_input(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Lower-cased extension of `path` without the leading dot.
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Registry for format converter plugins.
///
/// Not internally synchronized: the owning [`Converter`](crate::Converter)
/// builds it once and only reads it afterwards.
///
/// # Example
///
/// ```rust
/// use transmutation::plugins::registry::FormatRegistry;
/// use transmutation::FormatTag;
///
/// let registry = FormatRegistry::with_defaults().unwrap();
/// assert_eq!(registry.detect_format("notes.TXT"), FormatTag::Txt);
/// assert_eq!(registry.detect_format("archive.tar.gz"), FormatTag::Unknown);
/// ```
pub struct FormatRegistry {
    converters: Vec<Arc<dyn FormatConverter>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { converters: Vec::new() }
    }

    /// Create a registry holding every built-in converter enabled at compile
    /// time, in the order PDF, DOCX, XLSX, PPTX, TXT, HTML.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        crate::converters::register_defaults(&mut registry)?;
        Ok(registry)
    }

    /// Register a converter.
    ///
    /// The converter's `initialize` runs first; if it fails the converter is
    /// not added. A converter whose name is already registered replaces the
    /// old one in place and the old one is shut down.
    pub fn register(&mut self, converter: Arc<dyn FormatConverter>) -> Result<()> {
        validate_plugin_name(converter.name())?;

        converter.initialize()?;

        let existing = self.converters.iter().position(|c| c.name() == converter.name());
        match existing {
            Some(index) => {
                let previous = std::mem::replace(&mut self.converters[index], converter);
                if let Err(e) = previous.shutdown() {
                    tracing::warn!(plugin = previous.name(), error = %e, "Replaced converter failed to shut down");
                }
            }
            None => self.converters.push(converter),
        }

        Ok(())
    }

    /// Resolve a format tag from a path's extension.
    ///
    /// Returns [`FormatTag::Unknown`] when the path has no extension or no
    /// converter accepts it. File contents are never inspected.
    pub fn detect_format(&self, path: impl AsRef<Path>) -> FormatTag {
        let Some(extension) = extension_of(path.as_ref()) else {
            return FormatTag::Unknown;
        };

        self.converters
            .iter()
            .find(|c| c.can_handle(&extension))
            .map(|c| c.format())
            .unwrap_or(FormatTag::Unknown)
    }

    pub fn is_supported(&self, path: impl AsRef<Path>) -> bool {
        !self.detect_format(path).is_unknown()
    }

    /// Get the first registered converter for `format`.
    pub fn get(&self, format: FormatTag) -> Result<Arc<dyn FormatConverter>> {
        self.converters
            .iter()
            .find(|c| c.format() == format)
            .map(Arc::clone)
            .ok_or(TransmutationError::NoConverterForFormat(format))
    }

    /// Distinct format tags, in registration order.
    pub fn supported_formats(&self) -> Vec<FormatTag> {
        let mut formats = Vec::new();
        for converter in &self.converters {
            let format = converter.format();
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }

    /// Every extension accepted by some registered converter, in
    /// registration order without duplicates.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        for converter in &self.converters {
            for ext in converter.extensions() {
                if !extensions.iter().any(|e| e == ext) {
                    extensions.push((*ext).to_string());
                }
            }
        }
        extensions
    }

    /// Names of all registered converters.
    pub fn list(&self) -> Vec<String> {
        self.converters.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Remove a converter by name and shut it down.
    ///
    /// Removing an unknown name is a no-op.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let Some(index) = self.converters.iter().position(|c| c.name() == name) else {
            return Ok(());
        };

        let converter = self.converters.remove(index);
        converter.shutdown()?;

        Ok(())
    }

    /// Shutdown all converters and clear the registry.
    pub fn shutdown_all(&mut self) -> Result<()> {
        let names = self.list();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry").field("converters", &self.list()).finish()
    }
}
