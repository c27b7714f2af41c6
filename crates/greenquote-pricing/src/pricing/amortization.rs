//! Level-payment amortization
//!
//! ```text
//! payment = P × r(1+r)^n / ((1+r)^n − 1)
//! ```
//!
//! with `r` the monthly rate and `n` the number of monthly payments.

use std::sync::Arc;

use greenquote_common::round_money;
use rust_decimal::{Decimal, MathematicalOps};
use tracing::trace;

use super::cache::{CacheStats, PaymentCache, PaymentKey};

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const MONTHS_PER_YEAR: u32 = 12;

/// Monthly payment for a loan, rounded to cents.
///
/// A non-positive principal owes nothing. A zero rate amortizes straight-line.
/// A zero term is due in full.
pub fn monthly_payment(principal: Decimal, annual_rate_percent: Decimal, term_years: u32) -> Decimal {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let n = u64::from(term_years) * u64::from(MONTHS_PER_YEAR);
    if n == 0 {
        return round_money(principal);
    }

    let r = annual_rate_percent / ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
    if r.is_zero() {
        return round_money(principal / Decimal::from(n));
    }

    // growth / (growth - 1) tends to 1 as growth overflows
    let factor = match (Decimal::ONE + r).checked_powu(n) {
        Some(growth) if growth == Decimal::ONE => {
            return round_money(principal / Decimal::from(n));
        }
        Some(growth) => growth
            .checked_div(growth - Decimal::ONE)
            .unwrap_or(Decimal::ONE),
        None => Decimal::ONE,
    };

    round_money(principal.saturating_mul(r).saturating_mul(factor))
}

/// Computes monthly payments, optionally memoized.
///
/// The cache only ever stores outputs of [`monthly_payment`], so results are
/// identical with or without it.
#[derive(Clone, Default)]
pub struct AmortizationCalculator {
    cache: Option<Arc<PaymentCache>>,
}

impl AmortizationCalculator {
    /// Calculator without memoization
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Calculator backed by a shared payment cache
    pub fn with_cache(cache: PaymentCache) -> Self {
        Self {
            cache: Some(Arc::new(cache)),
        }
    }

    pub fn monthly_payment(
        &self,
        principal: Decimal,
        annual_rate_percent: Decimal,
        term_years: u32,
    ) -> Decimal {
        let Some(cache) = &self.cache else {
            return monthly_payment(principal, annual_rate_percent, term_years);
        };

        let key = PaymentKey::new(principal, annual_rate_percent, term_years);
        if let Some(payment) = cache.get(&key) {
            return payment;
        }

        let payment = monthly_payment(principal, annual_rate_percent, term_years);
        trace!(%principal, %annual_rate_percent, term_years, %payment, "Computed monthly payment");
        cache.insert(key, payment);
        payment
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }
}
