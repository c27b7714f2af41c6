//! Error types for GreenQuote
//!
//! Provides a unified error type and the validation error reported by the
//! input validation layer.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using QuoteError
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Unified error type for quote operations
#[derive(Debug, Error)]
pub enum QuoteError {
    // Access policy denied an existing quote
    #[error("Not authorized to access quote {0}")]
    Forbidden(Uuid),

    // Admin-only operation called by a regular user
    #[error("Admin only")]
    AdminOnly,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    // Storage errors propagate unchanged from the quote store
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A single rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All violations found while validating a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid field(s): {}", .violations.len(), summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
