//! Identifier of a pushed resource.
//!
//! [`Identifier`] is a newtype wrapper around [`SmolStr`] holding the
//! canonical address of a resource. Two push notifications carrying equal
//! identifiers refer to the same resource and share a single lookup.

use std::fmt;

use http::Uri;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Canonical key of a resource a producer intends to push.
///
/// Cloning is cheap: short identifiers are stored inline, longer ones are
/// reference counted by [`SmolStr`].
///
/// # Example
/// ```
/// use pushlookup_core::Identifier;
///
/// let uri: http::Uri = "https://example.com/style.css".parse().unwrap();
/// let id = Identifier::from(&uri);
/// assert_eq!(id.as_str(), "https://example.com/style.css");
/// assert_eq!(id, Identifier::new("https://example.com/style.css"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(SmolStr);

impl Identifier {
    /// Creates a new identifier.
    #[inline]
    pub fn new(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    /// Creates an identifier from a static string (no allocation).
    #[inline]
    pub const fn new_static(s: &'static str) -> Self {
        Self(SmolStr::new_static(s))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Identifier {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for Identifier {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}

impl From<&Uri> for Identifier {
    fn from(uri: &Uri) -> Self {
        Self(SmolStr::from(uri.to_string()))
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
