//! # pushlookup-moka
//!
//! In-memory [`CacheEngine`](pushlookup_core::CacheEngine) for `pushlookup`,
//! backed by the [Moka](https://docs.rs/moka) async cache.
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod engine;
mod entry;
pub mod metrics;

pub use builder::{ByteCapacity, EntryCapacity, MokaCacheEngineBuilder, NoCapacity};
pub use engine::{MokaCacheEngine, MokaTransaction};
pub use entry::CachedEntry;
pub use moka::policy::EvictionPolicy;
