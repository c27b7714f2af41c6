//! Bounded payment cache
//!
//! Memoizes monthly payments keyed on (principal, rate, term). Payments are
//! deterministic, so concurrent writes for the same key store the same value
//! and it does not matter which one lands last.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Cache key components
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct PaymentKey {
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
}

impl PaymentKey {
    pub fn new(principal: Decimal, annual_rate_percent: Decimal, term_years: u32) -> Self {
        // Normalized so 5000 and 5000.00 share an entry
        Self {
            principal: principal.normalize(),
            annual_rate_percent: annual_rate_percent.normalize(),
            term_years,
        }
    }
}

/// In-memory payment cache using DashMap, holding at most `capacity` entries.
///
/// Under concurrent inserts the bound may be overshot briefly by the number
/// of racing writers.
pub struct PaymentCache {
    entries: DashMap<PaymentKey, Decimal>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PaymentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &PaymentKey) -> Option<Decimal> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(*entry.value())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: PaymentKey, payment: Decimal) {
        if self.capacity == 0 {
            return;
        }

        // Evict an arbitrary entry when full
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            let victim = self.entries.iter().next().map(|e| *e.key());
            if let Some(victim) = victim {
                self.entries.remove(&victim);
                debug!(?victim, "Evicted payment cache entry");
            }
        }

        self.entries.insert(key, payment);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached payments
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}
