//! Quote orchestration
//!
//! Composes the pricing pipeline with the quote store and applies the
//! access policy on every read path.

use std::sync::Arc;

use chrono::Utc;
use greenquote_common::{
    AdminQuoteSummary, QuoteError, QuoteFilter, QuoteRecord, QuoteRequest, QuoteSummary,
    QuoteView, Requester, Result,
};
use greenquote_pricing::QuotePricer;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::infra::QuoteStore;
use crate::policy::AccessPolicy;

/// Quote service
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    pricer: QuotePricer,
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>, pricer: QuotePricer) -> Self {
        Self { store, pricer }
    }

    /// Price and persist a quote for `owner_id`.
    ///
    /// The request must already be validated.
    #[instrument(skip(self, request))]
    pub async fn create(&self, owner_id: &str, request: QuoteRequest) -> Result<QuoteView> {
        let priced = self.pricer.price(
            request.system_size_kw,
            request.monthly_consumption_kwh,
            request.down_payment_or_zero(),
        );

        let record = QuoteRecord {
            id: Uuid::now_v7(),
            owner_id: owner_id.to_string(),
            inputs: request.into(),
            derived: priced.derived,
            offers: priced.offers,
            created_at: Utc::now(),
        };
        let view = record.view();

        let id = self.store.insert(record).await?;
        info!(
            quote_id = %id,
            risk_band = %view.derived.risk_band,
            principal = %view.derived.principal_amount,
            "Created quote"
        );

        Ok(view)
    }

    /// Look up a quote.
    ///
    /// `Ok(None)` when no quote has this id; [`QuoteError::Forbidden`] when it
    /// exists but belongs to someone else and the requester is not an admin.
    #[instrument(skip(self, requester), fields(requester = %requester.id))]
    pub async fn get_by_id(&self, requester: &Requester, id: Uuid) -> Result<Option<QuoteView>> {
        let Some(record) = self.store.find_by_id(&id).await? else {
            debug!(quote_id = %id, "Quote not found");
            return Ok(None);
        };

        if !AccessPolicy::can_read(requester, &record.owner_id) {
            warn!(quote_id = %id, "Quote access denied");
            return Err(QuoteError::Forbidden(id));
        }

        Ok(Some(record.view()))
    }

    /// Summaries of the owner's quotes, most recent first
    #[instrument(skip(self))]
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<QuoteSummary>> {
        let mut records = self.store.find_by_owner(owner_id).await?;
        records.sort_by(QuoteRecord::cmp_newest_first);

        debug!(count = records.len(), "Listed owner quotes");
        Ok(records.iter().map(QuoteRecord::summary).collect())
    }

    /// Summaries of every quote, optionally filtered by a case-insensitive
    /// search on email or full name, most recent first. Admin only.
    #[instrument(skip(self, requester), fields(requester = %requester.id))]
    pub async fn list_all(
        &self,
        requester: &Requester,
        search_term: Option<&str>,
    ) -> Result<Vec<AdminQuoteSummary>> {
        if !AccessPolicy::can_list_all(requester) {
            warn!("Non-admin attempted to list all quotes");
            return Err(QuoteError::AdminOnly);
        }

        let filter = QuoteFilter::search(search_term);
        let mut records = self.store.find_all(&filter).await?;
        records.sort_by(QuoteRecord::cmp_newest_first);

        debug!(count = records.len(), "Listed all quotes");
        Ok(records.iter().map(QuoteRecord::admin_summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryQuoteStore, StoreError};
    use async_trait::async_trait;
    use greenquote_common::RiskBand;
    use rust_decimal_macros::dec;

    fn service() -> QuoteService {
        QuoteService::new(Arc::new(InMemoryQuoteStore::new()), QuotePricer::default())
    }

    fn request() -> QuoteRequest {
        QuoteRequest::new("Test User", "test@example.com", "123 Main St", dec!(400), dec!(5))
            .with_down_payment(dec!(1000))
    }

    /// Store whose every call fails
    struct FailingStore;

    #[async_trait]
    impl QuoteStore for FailingStore {
        async fn insert(&self, _record: QuoteRecord) -> std::result::Result<Uuid, StoreError> {
            Err(StoreError::StorageError("connection refused".into()))
        }

        async fn find_by_id(
            &self,
            _id: &Uuid,
        ) -> std::result::Result<Option<QuoteRecord>, StoreError> {
            Err(StoreError::StorageError("connection refused".into()))
        }

        async fn find_by_owner(
            &self,
            _owner_id: &str,
        ) -> std::result::Result<Vec<QuoteRecord>, StoreError> {
            Err(StoreError::StorageError("connection refused".into()))
        }

        async fn find_all(
            &self,
            _filter: &QuoteFilter,
        ) -> std::result::Result<Vec<QuoteRecord>, StoreError> {
            Err(StoreError::StorageError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_create_returns_priced_view() {
        let view = service().create("user-1", request()).await.unwrap();

        assert_eq!(view.inputs.full_name, "Test User");
        assert_eq!(view.inputs.down_payment, dec!(1000));
        assert_eq!(view.derived.system_price, dec!(6000.00));
        assert_eq!(view.derived.principal_amount, dec!(5000.00));
        assert_eq!(view.derived.risk_band, RiskBand::A);
        assert_eq!(view.offers.len(), 3);
    }

    #[tokio::test]
    async fn test_owner_reads_own_quote() {
        let svc = service();
        let created = svc.create("user-1", request()).await.unwrap();

        let fetched = svc
            .get_by_id(&Requester::user("user-1"), created.id)
            .await
            .unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_missing_quote_is_none() {
        let fetched = service()
            .get_by_id(&Requester::user("user-1"), Uuid::now_v7())
            .await
            .unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_other_user_is_forbidden() {
        let svc = service();
        let created = svc.create("user-1", request()).await.unwrap();

        let err = svc
            .get_by_id(&Requester::user("user-x"), created.id)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Forbidden(id) if id == created.id));
    }

    #[tokio::test]
    async fn test_list_all_requires_admin() {
        let err = service()
            .list_all(&Requester::user("user-1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::AdminOnly));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let svc = QuoteService::new(Arc::new(FailingStore), QuotePricer::default());

        let err = svc.create("user-1", request()).await.unwrap_err();
        assert!(matches!(err, QuoteError::Storage(msg) if msg.contains("connection refused")));

        let err = svc
            .get_by_id(&Requester::admin("admin"), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Storage(_)));

        assert!(svc.list_for_owner("user-1").await.is_err());
        assert!(svc.list_all(&Requester::admin("admin"), None).await.is_err());
    }
}
