//! Report error types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::store::StoreError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Invalid date range.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Start of the range.
        from: DateTime<Utc>,
        /// End of the range.
        to: DateTime<Utc>,
    },

    /// Stored lines do not balance; the ledger is corrupt.
    #[error("Trial balance does not balance. Debit: {debit}, Credit: {credit}")]
    TrialBalanceMismatch {
        /// Debit column total.
        debit: Decimal,
        /// Credit column total.
        credit: Decimal,
    },

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::TrialBalanceMismatch { .. } => "TRIAL_BALANCE_MISMATCH",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AccountNotFound(_) => 404,
            Self::InvalidDateRange { .. } => 400,
            Self::TrialBalanceMismatch { .. } | Self::Storage(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
