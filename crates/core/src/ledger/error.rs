//! Ledger error types for posting validation and storage failures.

use kodi_shared::types::JournalEntryId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Posting request has no correlation id.
    #[error("Correlation id must not be empty")]
    MissingCorrelationId,

    /// Posting request has no lines.
    #[error("Journal entry must have at least one line")]
    NoLines,

    /// A line is malformed (negative, both sides set, or both zero).
    #[error("Line {index} is invalid: {reason}")]
    InvalidLine {
        /// Zero-based position of the line in the request.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Entry is not balanced (debits != credits after rounding).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account code is not in the chart of accounts.
    #[error("Unknown account code: {0}")]
    UnknownAccount(String),

    /// Account exists but is inactive.
    #[error("Account {0} is inactive")]
    InactiveAccount(String),

    // ========== Entry Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry is itself a reversal and cannot be reversed again.
    #[error("Journal entry {0} is a reversal and cannot be reversed")]
    CannotReverseReversal(JournalEntryId),

    // ========== Storage Errors ==========
    /// Storage failure; the entry was not written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCorrelationId => "MISSING_CORRELATION_ID",
            Self::NoLines => "NO_LINES",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::InactiveAccount(_) => "INACTIVE_ACCOUNT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::CannotReverseReversal(_) => "CANNOT_REVERSE_REVERSAL",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed requests
            Self::MissingCorrelationId | Self::NoLines | Self::InvalidLine { .. } => 400,

            // 422 Unprocessable - well-formed but refused by the ledger
            Self::UnbalancedEntry { .. }
            | Self::UnknownAccount(_)
            | Self::InactiveAccount(_)
            | Self::CannotReverseReversal(_) => 422,

            // 404 Not Found
            Self::EntryNotFound(_) => 404,

            // 500 Internal Server Error
            Self::Storage(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
