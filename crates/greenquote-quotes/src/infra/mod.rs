//! Quote storage backends

pub mod memory_store;
pub mod redis_store;

use async_trait::async_trait;
use greenquote_common::{QuoteError, QuoteFilter, QuoteRecord};
use uuid::Uuid;

/// Trait for quote storage backends
///
/// Records are written once and never updated. Listing methods return
/// records in no particular order; callers sort.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Persist a new quote
    async fn insert(&self, record: QuoteRecord) -> Result<Uuid, StoreError>;

    /// Get a quote by ID
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<QuoteRecord>, StoreError>;

    /// Get all quotes owned by a user
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<QuoteRecord>, StoreError>;

    /// Get all quotes matching a filter
    async fn find_all(&self, filter: &QuoteFilter) -> Result<Vec<QuoteRecord>, StoreError>;
}

/// Errors from quote store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Quote already exists: {0}")]
    Duplicate(Uuid),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<StoreError> for QuoteError {
    fn from(err: StoreError) -> Self {
        QuoteError::Storage(err.to_string())
    }
}
