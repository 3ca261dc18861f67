//! Reconciliation input rows and run summary.

use chrono::{DateTime, Utc};
use kodi_shared::types::{LandlordId, WalletId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::WalletStatus;

/// One row of the external wallet transaction feed.
///
/// Positive amounts credit a landlord wallet, negative amounts are withdrawals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Provider transaction id, unique per row.
    pub transaction_id: String,
    /// Signed amount.
    pub amount: Decimal,
    /// Free-text status as reported by the provider.
    pub status: String,
    /// Wallet the money moved in or out of.
    pub wallet_id: WalletId,
    /// Landlord owning the wallet.
    pub landlord_id: Option<LandlordId>,
    /// When the transaction happened.
    pub transaction_date: DateTime<Utc>,
    /// Free-text description.
    pub description: Option<String>,
    /// Failure reason reported by the telecom.
    pub reason_at_telecom: Option<String>,
}

impl WalletTransaction {
    /// Normalised status.
    #[must_use]
    pub fn wallet_status(&self) -> WalletStatus {
        WalletStatus::parse(&self.status)
    }

    /// Memo for a returned withdrawal: the telecom's reason, else the raw status.
    #[must_use]
    pub fn failure_memo(&self) -> String {
        self.reason_at_telecom
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .unwrap_or(self.status.trim())
            .to_string()
    }
}

/// Why a transaction was counted as skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Negative amount with status REVERSAL; nothing is posted.
    ReversalStatus,
    /// Status not recognised after normalisation.
    UnrecognizedStatus(String),
    /// Amount is zero.
    ZeroAmount,
    /// Posting failed; the error message is kept.
    Failed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReversalStatus => f.write_str("reversal status"),
            Self::UnrecognizedStatus(raw) => write!(f, "unrecognized status '{raw}'"),
            Self::ZeroAmount => f.write_str("zero amount"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// A skipped transaction and its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTransaction {
    /// Provider transaction id.
    pub transaction_id: String,
    /// Reason.
    pub reason: SkipReason,
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Identifier of the run, for correlating logs.
    pub run_id: Uuid,
    /// Window start (inclusive).
    pub from: DateTime<Utc>,
    /// Window end (inclusive).
    pub to: DateTime<Utc>,
    /// Transactions read from the feed.
    pub scanned: usize,
    /// Journal entries newly created.
    pub posted: usize,
    /// Transactions counted as skipped.
    pub skipped: usize,
    /// Skip details.
    pub skips: Vec<SkippedTransaction>,
}

impl ReconciliationSummary {
    /// Starts an empty summary for a window.
    #[must_use]
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            from,
            to,
            scanned: 0,
            posted: 0,
            skipped: 0,
            skips: Vec::new(),
        }
    }

    /// Records a skipped transaction.
    pub fn skip(&mut self, transaction_id: &str, reason: SkipReason) {
        self.skipped += 1;
        self.skips.push(SkippedTransaction {
            transaction_id: transaction_id.to_string(),
            reason,
        });
    }
}
