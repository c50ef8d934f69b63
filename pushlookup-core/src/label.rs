//! Engine label type for identifying cache engines.
//!
//! `EngineLabel` is a newtype wrapper around `SmolStr` used to tag lookup
//! spans and metrics with the cache engine that answered them.

use smol_str::SmolStr;
use std::fmt;

/// A label identifying a cache engine.
///
/// # Example
/// ```
/// use pushlookup_core::EngineLabel;
///
/// let label = EngineLabel::new_static("moka");
/// assert_eq!(label.as_str(), "moka");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EngineLabel(SmolStr);

impl EngineLabel {
    /// Creates a new engine label.
    #[inline]
    pub fn new(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    /// Creates an engine label from a static string (no allocation).
    #[inline]
    pub const fn new_static(s: &'static str) -> Self {
        Self(SmolStr::new_static(s))
    }

    /// Returns the label as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EngineLabel {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for EngineLabel {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}

impl From<EngineLabel> for SmolStr {
    #[inline]
    fn from(label: EngineLabel) -> Self {
        label.0
    }
}
