//! Lookup policies and configuration.

use std::time::Duration;

use pushlookup_core::RequestPriority;
use serde::{Deserialize, Serialize};

/// Policy for lookups that stay pending for too long.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// No timeout - wait for the cache engine to answer.
    #[default]
    None,
    /// Give up after the duration; the lookup completes with a timeout error
    /// and the push proceeds.
    Cancel(#[serde(with = "humantime_serde")] Duration),
    /// Log a warning after the duration but keep waiting.
    Warn(#[serde(with = "humantime_serde")] Duration),
}

/// Configuration for the [`LookupManager`](super::LookupManager).
///
/// Can be built in code or deserialized:
///
/// ```
/// use std::time::Duration;
/// use pushlookup::lookup::{LookupConfig, TimeoutPolicy};
///
/// let config: LookupConfig = serde_json::from_str(
///     r#"{ "priority": "low", "timeout": { "cancel": "250ms" }, "max_in_flight": 64 }"#,
/// ).unwrap();
/// assert_eq!(config.timeout, TimeoutPolicy::Cancel(Duration::from_millis(250)));
/// assert_eq!(config.max_in_flight, Some(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Priority used when creating cache transactions.
    pub priority: RequestPriority,
    /// Timeout policy for pending lookups.
    pub timeout: TimeoutPolicy,
    /// Maximum number of pending lookups.
    /// None means unlimited.
    pub max_in_flight: Option<usize>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            priority: RequestPriority::Idle,
            timeout: TimeoutPolicy::None,
            max_in_flight: None,
        }
    }
}

impl LookupConfig {
    /// Create a new builder for LookupConfig.
    pub fn builder() -> LookupConfigBuilder {
        LookupConfigBuilder::default()
    }
}

/// Builder for LookupConfig.
#[derive(Debug, Clone, Default)]
pub struct LookupConfigBuilder {
    config: LookupConfig,
}

impl LookupConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transaction priority.
    pub fn priority(mut self, priority: RequestPriority) -> Self {
        self.config.priority = priority;
        self
    }

    /// Set timeout policy.
    pub fn timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.config.timeout = policy;
        self
    }

    /// Set timeout with cancel policy.
    pub fn timeout(self, duration: Duration) -> Self {
        self.timeout_policy(TimeoutPolicy::Cancel(duration))
    }

    /// Set maximum pending lookups.
    pub fn max_in_flight(mut self, max: usize) -> Self {
        self.config.max_in_flight = Some(max);
        self
    }

    /// Build the LookupConfig.
    pub fn build(self) -> LookupConfig {
        self.config
    }
}
