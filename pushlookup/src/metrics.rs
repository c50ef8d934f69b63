//! Metrics declaration and initialization.

use std::time::Duration;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of cache-only lookups started.
    pub static ref LOOKUPS_STARTED: &'static str = {
        metrics::describe_counter!(
            "pushlookup_lookups_started_total",
            "Total number of cache-only lookups started."
        );
        "pushlookup_lookups_started_total"
    };
    /// Track number of push notifications dropped because a lookup was in flight.
    pub static ref LOOKUPS_DEDUPLICATED: &'static str = {
        metrics::describe_counter!(
            "pushlookup_lookups_deduplicated_total",
            "Total number of push notifications deduplicated (lookup already in flight)."
        );
        "pushlookup_lookups_deduplicated_total"
    };
    /// Track number of push notifications not looked up because of the in-flight limit.
    pub static ref LOOKUPS_SKIPPED: &'static str = {
        metrics::describe_counter!(
            "pushlookup_lookups_skipped_total",
            "Total number of push notifications skipped because the in-flight limit was reached."
        );
        "pushlookup_lookups_skipped_total"
    };
    /// Track number of lookups completed, by status and mode.
    pub static ref LOOKUPS_COMPLETED: &'static str = {
        metrics::describe_counter!(
            "pushlookup_lookups_completed_total",
            "Total number of lookups completed."
        );
        "pushlookup_lookups_completed_total"
    };
    /// Track number of pushes canceled because the resource was cached.
    pub static ref PUSHES_CANCELED: &'static str = {
        metrics::describe_counter!(
            "pushlookup_pushes_canceled_total",
            "Total number of pushes canceled because the resource was already cached."
        );
        "pushlookup_pushes_canceled_total"
    };
    /// Gauge of currently pending lookups.
    pub static ref LOOKUPS_IN_FLIGHT: &'static str = {
        metrics::describe_gauge!(
            "pushlookup_lookups_in_flight",
            "Number of lookups waiting for the cache engine."
        );
        "pushlookup_lookups_in_flight"
    };
    /// Histogram of lookup duration.
    pub static ref LOOKUP_DURATION: &'static str = {
        metrics::describe_histogram!(
            "pushlookup_lookup_duration_seconds",
            metrics::Unit::Seconds,
            "Duration of cache-only lookups in seconds."
        );
        "pushlookup_lookup_duration_seconds"
    };
}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_started() {
    metrics::counter!(*LOOKUPS_STARTED).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_started() {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_deduplicated() {
    metrics::counter!(*LOOKUPS_DEDUPLICATED).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_deduplicated() {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_skipped() {
    metrics::counter!(*LOOKUPS_SKIPPED).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_skipped() {}

/// Adjust the in-flight gauge by `delta` registry entries.
#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_in_flight(delta: f64) {
    metrics::gauge!(*LOOKUPS_IN_FLIGHT).increment(delta);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_in_flight(_delta: f64) {}

/// Record the outcome of a finished lookup.
///
/// When the `metrics` feature is disabled, this function is a no-op
/// and will be eliminated by the compiler.
#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_completed(
    status: &'static str,
    mode: &'static str,
    canceled: bool,
    duration: Option<Duration>,
) {
    metrics::counter!(*LOOKUPS_COMPLETED, "status" => status, "mode" => mode).increment(1);
    if canceled {
        metrics::counter!(*PUSHES_CANCELED).increment(1);
    }
    if let Some(duration) = duration {
        metrics::histogram!(*LOOKUP_DURATION, "status" => status, "mode" => mode)
            .record(duration.as_secs_f64());
    }
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn record_completed(
    _status: &'static str,
    _mode: &'static str,
    _canceled: bool,
    _duration: Option<Duration>,
) {
}
