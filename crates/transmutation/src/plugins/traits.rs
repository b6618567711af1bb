//! Base plugin trait definition.
//!
//! Every converter is a plugin: it has a name, a version, and a lifecycle
//! driven by the registry that owns it.

use crate::Result;

/// Base trait that all plugins must implement.
///
/// # Thread Safety
///
/// Plugins are shared as `Arc<dyn ...>` across tasks, so they must be
/// `Send + Sync`. Lifecycle methods take `&self`; plugins that need mutable
/// state use interior mutability.
///
/// # Example
///
/// ```rust
/// use transmutation::plugins::Plugin;
/// use transmutation::Result;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Watermark {
///     ready: AtomicBool,
/// }
///
/// impl Plugin for Watermark {
///     fn name(&self) -> &str {
///         "watermark"
///     }
///
///     fn version(&self) -> String {
///         "0.1.0".to_string()
///     }
///
///     fn initialize(&self) -> Result<()> {
///         self.ready.store(true, Ordering::Release);
///         Ok(())
///     }
///
///     fn shutdown(&self) -> Result<()> {
///         self.ready.store(false, Ordering::Release);
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Unique identifier, lowercase with hyphens (e.g. `"pdf-converter"`).
    ///
    /// The registry rejects empty names and names containing whitespace.
    fn name(&self) -> &str;

    /// Semantic version, `MAJOR.MINOR.PATCH`.
    fn version(&self) -> String;

    /// Called once when the plugin is registered.
    ///
    /// # Errors
    ///
    /// If this returns an error the plugin is not registered.
    fn initialize(&self) -> Result<()>;

    /// Called when the plugin is removed from its registry or the registry
    /// shuts down.
    ///
    /// # Errors
    ///
    /// Errors are logged by the registry; they do not stop the shutdown of
    /// other plugins.
    fn shutdown(&self) -> Result<()>;

    fn description(&self) -> &str {
        ""
    }
}
