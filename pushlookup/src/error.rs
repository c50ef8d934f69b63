//! Error types for lookup routing.

use pushlookup_core::Identifier;
use thiserror::Error;

/// Failure to route a completion to its lookup.
///
/// Completions are only produced for lookups the manager registered itself,
/// so this error always indicates a defect in the caller, never a cache or
/// network condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// No pending lookup is registered under the identifier.
    #[error("no pending lookup registered for {0}")]
    Unregistered(Identifier),
}
