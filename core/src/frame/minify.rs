//! frame/minify.rs
//! Minifier capability.
//!
//! Design notes:
//! - Minification is an optional external capability. Callers install one on
//!   `FrameBuilder`; absence is visible through `FrameBuilder::can_minify`
//!   before any work starts.
//! - Closures `Fn(&str) -> Result<String, String>` are minifiers too, which
//!   keeps test doubles to one line.

/// Source-to-source transform applied to the script before framing.
pub trait Minifier: Send + Sync {
    /// Short identifier used in error messages.
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Return the minified script or a human-readable reason for refusing it.
    fn mangle(&self, source: &str) -> Result<String, String>;
}

impl<F> Minifier for F
where
    F: Fn(&str) -> Result<String, String> + Send + Sync,
{
    fn mangle(&self, source: &str) -> Result<String, String> {
        self(source)
    }
}
