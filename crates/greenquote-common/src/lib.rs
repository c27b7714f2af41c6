//! # GreenQuote Common
//!
//! Shared types and errors for the GreenQuote solar financing service.
//!
//! ## Core Types
//!
//! - [`QuoteRequest`]: caller-supplied system specs and contact details
//! - [`QuoteRecord`]: persisted quote with derived pricing and offers
//! - [`Offer`]: one amortized loan offer embedded in a quote
//! - [`RiskBand`]: credit risk classification (A, B, C)
//! - [`Requester`]: authenticated caller identity used for access decisions
//!
//! ## Money
//!
//! All monetary amounts are [`rust_decimal::Decimal`]. Rounding to cents
//! happens once, at persistence, through [`round_money`].

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{FieldViolation, QuoteError, Result, ValidationError};
pub use types::{
    money::round_money,
    quote::{
        AdminQuoteSummary, DerivedPricing, Offer, QuoteFilter, QuoteInputs, QuoteRecord,
        QuoteRequest, QuoteSummary, QuoteView, RiskBand,
    },
    requester::Requester,
};

/// Decimal places kept for persisted monetary amounts
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Upper bound accepted for any numeric request field
pub const MAX_NUMERIC_INPUT: u64 = 1_000_000_000_000;
