//! Moka engine metrics.
//!
//! Enable the `metrics` feature to record them.
//!
//! - `pushlookup_moka_entries` - entries currently cached (gauge)
//! - `pushlookup_moka_size_bytes` - weighted cache size in bytes (gauge)
//! - `pushlookup_moka_reads_total` - transaction reads by `outcome` (counter)
//!
//! Every metric carries an `engine` label.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Cached entry count gauge.
    pub static ref MOKA_ENTRIES: &'static str = {
        metrics::describe_gauge!(
            "pushlookup_moka_entries",
            "Current number of entries in the Moka cache engine."
        );
        "pushlookup_moka_entries"
    };

    /// Weighted size gauge.
    pub static ref MOKA_SIZE_BYTES: &'static str = {
        metrics::describe_gauge!(
            "pushlookup_moka_size_bytes",
            "Current weighted size of the Moka cache engine in bytes."
        );
        "pushlookup_moka_size_bytes"
    };

    /// Reads answered by transactions, labeled by outcome.
    pub static ref MOKA_READS: &'static str = {
        metrics::describe_counter!(
            "pushlookup_moka_reads_total",
            "Cache-only reads answered by the Moka cache engine."
        );
        "pushlookup_moka_reads_total"
    };
}

/// Outcome of a single transaction read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Fresh entry, or stale entry with validation skipped.
    Hit,
    /// Stale entry that would need revalidation.
    Stale,
    /// No entry.
    Absent,
    /// The request could reach the network.
    Refused,
}

impl ReadOutcome {
    /// Metric label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReadOutcome::Hit => "hit",
            ReadOutcome::Stale => "stale",
            ReadOutcome::Absent => "absent",
            ReadOutcome::Refused => "refused",
        }
    }
}

/// Record current entry count and weighted size.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_capacity(engine: &str, entries: u64, size_bytes: u64) {
    metrics::gauge!(*MOKA_ENTRIES, "engine" => engine.to_string()).set(entries as f64);
    metrics::gauge!(*MOKA_SIZE_BYTES, "engine" => engine.to_string()).set(size_bytes as f64);
}

/// Record current entry count and weighted size (no-op without `metrics`).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_capacity(_engine: &str, _entries: u64, _size_bytes: u64) {}

/// Record one transaction read.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_read(engine: &str, outcome: ReadOutcome) {
    metrics::counter!(
        *MOKA_READS,
        "engine" => engine.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record one transaction read (no-op without `metrics`).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_read(_engine: &str, _outcome: ReadOutcome) {}
