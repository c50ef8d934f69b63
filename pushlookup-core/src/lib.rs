#![warn(missing_docs)]
//! # pushlookup-core
//!
//! Core traits and types for deciding whether a resource announced by a push
//! producer is already present in a local cache.
//!
//! This crate defines the seams between the lookup coordinator (the
//! `pushlookup` crate) and the collaborators it drives:
//!
//! - **Identify** pushed resources ([`Identifier`])
//! - **Describe** a cache-only read ([`LookupRequest`], [`LoadFlags`], [`RequestPriority`])
//! - **Read** from a cache engine ([`CacheEngine`], [`Transaction`], [`TransactionStart`])
//! - **Report** the outcome ([`LookupStatus`], [`LookupError`])
//! - **Cancel** a redundant push ([`PushProducer`])
//!
//! Cache engines live in their own crates (for example `pushlookup-moka`).

pub mod engine;
pub mod identifier;
pub mod label;
pub mod producer;
pub mod request;
pub mod status;

pub use engine::{CacheEngine, Transaction, TransactionStart};
pub use identifier::Identifier;
pub use label::EngineLabel;
pub use producer::PushProducer;
pub use request::{LoadFlags, LookupRequest, RequestPriority};
pub use status::{LookupError, LookupStatus};
