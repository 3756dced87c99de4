//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant describes a rejected user action. A command that fails with
/// one of these leaves the ledger and archive exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (empty client name, bad payment amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested service code is not in the catalog.
    #[error("invalid service: {0}")]
    InvalidService(String),

    /// An operation referenced a line item that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Settlement was attempted on an order without line items.
    #[error("order has no services")]
    EmptyOrder,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_service(code: impl Into<String>) -> Self {
        Self::InvalidService(code.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
