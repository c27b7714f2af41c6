//! # GreenQuote Quotes
//!
//! Quote orchestration and access control.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 QuoteService                 │
//! │  create ─► QuotePricer ─► QuoteStore.insert  │
//! │  get / list ─► QuoteStore ─► AccessPolicy    │
//! └──────────────────────┬───────────────────────┘
//!                        │
//!          ┌─────────────┴─────────────┐
//!          │         QuoteStore        │
//!          │  InMemoryQuoteStore       │
//!          │  RedisQuoteStore          │
//!          └───────────────────────────┘
//! ```
//!
//! The store is injected at construction; the service holds no other
//! shared state and creates never coordinate with each other.

pub mod infra;
pub mod policy;
pub mod service;

pub use infra::{
    memory_store::InMemoryQuoteStore,
    redis_store::{RedisQuoteStore, DEFAULT_KEY_PREFIX},
    QuoteStore, StoreError,
};
pub use policy::AccessPolicy;
pub use service::QuoteService;
