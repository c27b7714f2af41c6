//! Loan offer generation

use greenquote_common::{round_money, Offer, RiskBand};
use rust_decimal::Decimal;

use super::amortization::AmortizationCalculator;
use crate::OFFER_TERMS_YEARS;

/// Builds one offer per supported term, shortest term first.
#[derive(Clone, Default)]
pub struct OfferGenerator {
    calculator: AmortizationCalculator,
}

impl OfferGenerator {
    pub fn new(calculator: AmortizationCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &AmortizationCalculator {
        &self.calculator
    }

    /// Payments are computed from the unrounded principal; `principal_used`
    /// carries the rounded one.
    pub fn build_offers(&self, principal: Decimal, risk_band: RiskBand) -> Vec<Offer> {
        let apr = risk_band.apr();
        let principal_used = round_money(principal);

        OFFER_TERMS_YEARS
            .iter()
            .map(|&term_years| Offer {
                term_years,
                apr,
                principal_used,
                monthly_payment: self.calculator.monthly_payment(principal, apr, term_years),
            })
            .collect()
    }
}
