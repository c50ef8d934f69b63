//! Outcome of a cache-only lookup.
//!
//! A lookup ends in exactly one [`LookupStatus`]. Only [`LookupStatus::Hit`]
//! means the resource is confirmed present; a miss and an error are both
//! "not confirmed" and leave the push alone.

use std::time::Duration;

use thiserror::Error;

/// Reason a lookup could not answer hit or miss.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The cache engine failed while reading the entry.
    #[error("cache read failed: {0}")]
    CacheRead(Box<dyn std::error::Error + Send + Sync>),
    /// The engine was asked for a read that could reach the network.
    #[error("cache engine only serves cache-only reads")]
    CacheOnlyRequired,
    /// The lookup did not resolve within the configured duration.
    #[error("lookup timed out after {0:?}")]
    TimedOut(Duration),
    /// The engine dropped the pending read without producing a result.
    #[error("cache engine is unavailable")]
    Unavailable,
}

/// Final result of a single lookup.
#[derive(Debug)]
pub enum LookupStatus {
    /// The resource is already cached; the push is redundant.
    Hit,
    /// The resource is not cached.
    Miss,
    /// The lookup failed. Treated like a miss.
    Error(LookupError),
}

impl LookupStatus {
    /// Returns `true` only for [`LookupStatus::Hit`].
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, LookupStatus::Hit)
    }

    /// Returns the status as a string slice for span fields and metric labels.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LookupStatus::Hit => "hit",
            LookupStatus::Miss => "miss",
            LookupStatus::Error(_) => "error",
        }
    }
}

impl From<LookupError> for LookupStatus {
    fn from(error: LookupError) -> Self {
        LookupStatus::Error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hit_confirms_presence() {
        assert!(LookupStatus::Hit.is_hit());
        assert!(!LookupStatus::Miss.is_hit());
        assert!(!LookupStatus::from(LookupError::Unavailable).is_hit());
    }

    #[test]
    fn error_message_includes_timeout() {
        let err = LookupError::TimedOut(Duration::from_millis(250));
        assert_eq!(err.to_string(), "lookup timed out after 250ms");
    }
}
