//! # GreenQuote Pricing
//!
//! Deterministic pricing pipeline for solar financing quotes.
//!
//! ## Pipeline
//!
//! ```text
//! system specs ──► PricingDeriver ──► (price, principal, band)
//!                                          │
//!                                          ▼
//!                 OfferGenerator ──► AmortizationCalculator (per term)
//! ```
//!
//! - Price: `system_size_kw × unit_price_per_kw`
//! - Principal: `max(0, price − down_payment)`
//! - Offers: one per term in [`OFFER_TERMS_YEARS`], APR set by risk band
//!
//! Nothing in this crate reads the clock or generates ids, so the same
//! inputs always price identically.

pub mod pricing;

use greenquote_common::{round_money, DerivedPricing, Offer};
use rust_decimal::Decimal;

pub use pricing::{
    amortization::{monthly_payment, AmortizationCalculator},
    cache::{CacheStats, PaymentCache, PaymentKey},
    deriver::{classify_risk, Derivation, PricingDeriver},
    offers::OfferGenerator,
};

/// Default system price per installed kW
pub const DEFAULT_UNIT_PRICE_PER_KW: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Default number of memoized monthly payments
pub const DEFAULT_PAYMENT_CACHE_CAPACITY: usize = 1024;

/// Loan terms offered on every quote, in order
pub const OFFER_TERMS_YEARS: [u32; 3] = [5, 10, 15];

/// Pricing configuration
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// System price per installed kW
    pub unit_price_per_kw: Decimal,
    /// Capacity of the payment cache (0 disables it)
    pub payment_cache_capacity: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            unit_price_per_kw: DEFAULT_UNIT_PRICE_PER_KW,
            payment_cache_capacity: DEFAULT_PAYMENT_CACHE_CAPACITY,
        }
    }
}

/// Derived pricing and offers for one quote, rounded for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedQuote {
    pub derived: DerivedPricing,
    pub offers: Vec<Offer>,
}

/// Runs the full pricing pipeline
pub struct QuotePricer {
    deriver: PricingDeriver,
    offers: OfferGenerator,
}

impl QuotePricer {
    pub fn new(config: PricingConfig) -> Self {
        let calculator = if config.payment_cache_capacity > 0 {
            AmortizationCalculator::with_cache(PaymentCache::new(config.payment_cache_capacity))
        } else {
            AmortizationCalculator::new()
        };

        Self {
            deriver: PricingDeriver::new(config.unit_price_per_kw),
            offers: OfferGenerator::new(calculator),
        }
    }

    /// Price a system. Amounts are rounded to cents only here, after the
    /// offers were computed from the unrounded principal.
    pub fn price(
        &self,
        system_size_kw: Decimal,
        monthly_consumption_kwh: Decimal,
        down_payment: Decimal,
    ) -> PricedQuote {
        let derivation = self
            .deriver
            .derive(system_size_kw, monthly_consumption_kwh, down_payment);
        let offers = self
            .offers
            .build_offers(derivation.principal, derivation.risk_band);

        PricedQuote {
            derived: DerivedPricing {
                system_price: round_money(derivation.system_price),
                principal_amount: round_money(derivation.principal),
                risk_band: derivation.risk_band,
            },
            offers,
        }
    }

    pub fn unit_price_per_kw(&self) -> Decimal {
        self.deriver.unit_price_per_kw()
    }

    /// Payment cache statistics, if caching is enabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.offers.calculator().cache_stats()
    }
}

impl Default for QuotePricer {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
