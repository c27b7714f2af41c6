//! In-memory quote store

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use greenquote_common::{QuoteFilter, QuoteRecord};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{QuoteStore, StoreError};

/// In-memory storage implementation
///
/// Uses DashMap for concurrent access to records plus an owner index.
#[derive(Default)]
pub struct InMemoryQuoteStore {
    /// All quotes by ID
    quotes: DashMap<Uuid, QuoteRecord>,

    /// Quote IDs by owner
    by_owner: RwLock<HashMap<String, Vec<Uuid>>>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn insert(&self, record: QuoteRecord) -> Result<Uuid, StoreError> {
        let id = record.id;
        let owner_id = record.owner_id.clone();

        match self.quotes.entry(id) {
            Entry::Occupied(_) => return Err(StoreError::Duplicate(id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }

        self.by_owner.write().entry(owner_id).or_default().push(id);
        Ok(id)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<QuoteRecord>, StoreError> {
        Ok(self.quotes.get(id).map(|q| q.value().clone()))
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<QuoteRecord>, StoreError> {
        let ids = self
            .by_owner
            .read()
            .get(owner_id)
            .cloned()
            .unwrap_or_default();

        Ok(ids
            .iter()
            .filter_map(|id| self.quotes.get(id).map(|q| q.value().clone()))
            .collect())
    }

    async fn find_all(&self, filter: &QuoteFilter) -> Result<Vec<QuoteRecord>, StoreError> {
        Ok(self
            .quotes
            .iter()
            .filter(|q| filter.matches(q.value()))
            .map(|q| q.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use greenquote_common::{DerivedPricing, QuoteRequest, RiskBand};
    use rust_decimal_macros::dec;

    fn create_test_quote(owner_id: &str, full_name: &str, email: &str) -> QuoteRecord {
        QuoteRecord {
            id: Uuid::now_v7(),
            owner_id: owner_id.to_string(),
            inputs: QuoteRequest::new(full_name, email, "1 Solar Way", dec!(300), dec!(4)).into(),
            derived: DerivedPricing {
                system_price: dec!(4800),
                principal_amount: dec!(4800),
                risk_band: RiskBand::B,
            },
            offers: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryQuoteStore::new();
        let quote = create_test_quote("user-1", "Test User", "test@example.com");
        let id = quote.id;

        assert_eq!(store.insert(quote.clone()).await.unwrap(), id);

        let found = store.find_by_id(&id).await.unwrap();
        assert_eq!(found, Some(quote));
        assert!(store.find_by_id(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryQuoteStore::new();
        let quote = create_test_quote("user-1", "Test User", "test@example.com");

        store.insert(quote.clone()).await.unwrap();
        let err = store.insert(quote).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_owner() {
        let store = InMemoryQuoteStore::new();
        for _ in 0..3 {
            store
                .insert(create_test_quote("user-1", "Test User", "test@example.com"))
                .await
                .unwrap();
        }
        store
            .insert(create_test_quote("user-2", "User Two", "user2@example.com"))
            .await
            .unwrap();

        assert_eq!(store.find_by_owner("user-1").await.unwrap().len(), 3);
        assert_eq!(store.find_by_owner("user-2").await.unwrap().len(), 1);
        assert!(store.find_by_owner("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_with_filter() {
        let store = InMemoryQuoteStore::new();
        store
            .insert(create_test_quote("user-1", "Test User", "test@example.com"))
            .await
            .unwrap();
        store
            .insert(create_test_quote("user-2", "User Two", "two@example.com"))
            .await
            .unwrap();

        assert_eq!(store.find_all(&QuoteFilter::all()).await.unwrap().len(), 2);

        let matched = store
            .find_all(&QuoteFilter::search(Some("TEST")))
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].owner_id, "user-1");

        let by_email = store
            .find_all(&QuoteFilter::search(Some("two@")))
            .await
            .unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].owner_id, "user-2");
    }
}
