//! Pricing module
//!
//! Provides the quote pricing pipeline with:
//! - System price and financed principal derivation
//! - Risk band classification
//! - Level-payment amortization with a bounded memoization cache
//! - Loan offer generation per supported term

pub mod amortization;
pub mod cache;
pub mod deriver;
pub mod offers;

pub use amortization::{monthly_payment, AmortizationCalculator};
pub use cache::{CacheStats, PaymentCache, PaymentKey};
pub use deriver::{classify_risk, Derivation, PricingDeriver};
pub use offers::OfferGenerator;
