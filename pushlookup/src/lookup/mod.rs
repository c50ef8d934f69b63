//! Cache-only lookups for pushed resources.
//!
//! A push producer announces a resource it is about to send. Before the push
//! goes out, the [`LookupManager`] asks the cache engine, without touching the
//! network, whether the resource is already cached. A hit makes the push
//! redundant and cancels it; a miss or an error leaves it alone.
//!
//! # Example
//!
//! ```ignore
//! use pushlookup::lookup::{LookupConfig, LookupManager};
//!
//! let manager = LookupManager::new(engine, LookupConfig::default());
//!
//! // Starts a lookup, or drops the notification if one is already pending
//! manager.on_push_notification(Box::new(producer));
//! ```

mod manager;
mod policy;
mod task;

pub use manager::{Dispatch, LookupManager};
pub use policy::{LookupConfig, LookupConfigBuilder, TimeoutPolicy};
pub use task::{CompletionMode, LookupTask};
