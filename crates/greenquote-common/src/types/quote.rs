//! Quote types
//!
//! A quote is created once from a [`QuoteRequest`], persisted as a
//! [`QuoteRecord`] and never mutated afterwards. Read paths rebuild
//! [`QuoteView`]s and summaries from stored records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FieldViolation, ValidationError};
use crate::MAX_NUMERIC_INPUT;

/// Credit risk classification of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    /// High consumption on a modest system
    A,
    /// Moderate consumption
    B,
    /// Low consumption
    C,
}

impl RiskBand {
    /// Annual percentage rate offered for this band
    pub fn apr(&self) -> Decimal {
        match self {
            RiskBand::A => Decimal::new(69, 1),
            RiskBand::B => Decimal::new(89, 1),
            RiskBand::C => Decimal::new(119, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::A => "A",
            RiskBand::B => "B",
            RiskBand::C => "C",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RiskBand::A),
            "B" => Ok(RiskBand::B),
            "C" => Ok(RiskBand::C),
            other => Err(format!("unknown risk band: {}", other)),
        }
    }
}

/// One amortized loan offer embedded in a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub term_years: u32,
    /// Annual percentage rate, e.g. 6.9
    pub apr: Decimal,
    /// Financed principal, rounded to cents
    pub principal_used: Decimal,
    pub monthly_payment: Decimal,
}

/// Caller-supplied quote request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub monthly_consumption_kwh: Decimal,
    pub system_size_kw: Decimal,
    #[serde(default)]
    pub down_payment: Option<Decimal>,
}

impl QuoteRequest {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        monthly_consumption_kwh: Decimal,
        system_size_kw: Decimal,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            address: address.into(),
            monthly_consumption_kwh,
            system_size_kw,
            down_payment: None,
        }
    }

    /// Set the down payment
    pub fn with_down_payment(mut self, down_payment: Decimal) -> Self {
        self.down_payment = Some(down_payment);
        self
    }

    /// Down payment, defaulting to zero when absent
    pub fn down_payment_or_zero(&self) -> Decimal {
        self.down_payment.unwrap_or(Decimal::ZERO)
    }

    /// Check required strings and numeric bounds, collecting every violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.full_name.trim().is_empty() {
            violations.push(FieldViolation::new("fullName", "fullName should not be empty"));
        }
        if !is_email(&self.email) {
            violations.push(FieldViolation::new("email", "email must be an email"));
        }
        if self.address.trim().is_empty() {
            violations.push(FieldViolation::new("address", "address should not be empty"));
        }

        check_amount(&mut violations, "monthlyConsumptionKwh", self.monthly_consumption_kwh);
        check_amount(&mut violations, "systemSizeKw", self.system_size_kw);
        if let Some(down_payment) = self.down_payment {
            check_amount(&mut violations, "downPayment", down_payment);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

fn check_amount(violations: &mut Vec<FieldViolation>, field: &str, value: Decimal) {
    if value.is_sign_negative() && !value.is_zero() {
        violations.push(FieldViolation::new(
            field,
            format!("{} must not be less than 0", field),
        ));
    } else if value > Decimal::from(MAX_NUMERIC_INPUT) {
        violations.push(FieldViolation::new(
            field,
            format!("{} must not be greater than {}", field, MAX_NUMERIC_INPUT),
        ));
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Request fields as persisted with the quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInputs {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub monthly_consumption_kwh: Decimal,
    pub system_size_kw: Decimal,
    pub down_payment: Decimal,
}

impl From<QuoteRequest> for QuoteInputs {
    fn from(req: QuoteRequest) -> Self {
        let down_payment = req.down_payment_or_zero();
        Self {
            full_name: req.full_name,
            email: req.email,
            address: req.address,
            monthly_consumption_kwh: req.monthly_consumption_kwh,
            system_size_kw: req.system_size_kw,
            down_payment,
        }
    }
}

/// Derived pricing, rounded to cents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPricing {
    pub system_price: Decimal,
    pub principal_amount: Decimal,
    pub risk_band: RiskBand,
}

/// Persisted quote, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub inputs: QuoteInputs,
    pub derived: DerivedPricing,
    /// Ordered by term, shortest first
    pub offers: Vec<Offer>,
    pub created_at: DateTime<Utc>,
}

impl QuoteRecord {
    /// Full response view
    pub fn view(&self) -> QuoteView {
        QuoteView {
            id: self.id,
            inputs: self.inputs.clone(),
            derived: self.derived.clone(),
            offers: self.offers.clone(),
        }
    }

    /// Summary shown to the quote owner
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            id: self.id,
            system_size_kw: self.inputs.system_size_kw,
            system_price: self.derived.system_price,
            risk_band: self.derived.risk_band,
            created_at: self.created_at,
        }
    }

    /// Summary shown to administrators
    pub fn admin_summary(&self) -> AdminQuoteSummary {
        AdminQuoteSummary {
            id: self.id,
            user_id: self.owner_id.clone(),
            full_name: self.inputs.full_name.clone(),
            email: self.inputs.email.clone(),
            system_size_kw: self.inputs.system_size_kw,
            system_price: self.derived.system_price,
            risk_band: self.derived.risk_band,
            created_at: self.created_at,
        }
    }

    /// Most recent first; ties broken by id, descending.
    pub fn cmp_newest_first(a: &QuoteRecord, b: &QuoteRecord) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Quote as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub id: Uuid,
    pub inputs: QuoteInputs,
    pub derived: DerivedPricing,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub id: Uuid,
    pub system_size_kw: Decimal,
    pub system_price: Decimal,
    pub risk_band: RiskBand,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuoteSummary {
    pub id: Uuid,
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub system_size_kw: Decimal,
    pub system_price: Decimal,
    pub risk_band: RiskBand,
    pub created_at: DateTime<Utc>,
}

/// Search filter for admin listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    /// Case-insensitive substring matched against email or full name
    pub term: Option<String>,
}

impl QuoteFilter {
    /// Filter matching every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a search term; an empty term matches everything
    pub fn search(term: Option<&str>) -> Self {
        Self {
            term: term.filter(|t| !t.is_empty()).map(str::to_lowercase),
        }
    }

    pub fn matches(&self, record: &QuoteRecord) -> bool {
        match &self.term {
            None => true,
            Some(term) => {
                record.inputs.email.to_lowercase().contains(term.as_str())
                    || record.inputs.full_name.to_lowercase().contains(term.as_str())
            }
        }
    }
}
