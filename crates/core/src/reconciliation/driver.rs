//! Reconciliation driver: turns a window of wallet transactions into postings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, info, info_span, warn};

use super::plan::plan_postings;
use super::types::{ReconciliationSummary, SkipReason, WalletTransaction};
use crate::fees::ChargePolicy;
use crate::ledger::service::PostingService;
use crate::ledger::store::{LedgerStore, StoreError};

/// Read access to the external wallet transaction feed.
#[async_trait]
pub trait WalletFeed: Send + Sync {
    /// Transactions with `transaction_date` in `[from, to]`, oldest first.
    async fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WalletTransaction>, StoreError>;
}

#[async_trait]
impl<T: WalletFeed + ?Sized> WalletFeed for Arc<T> {
    async fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WalletTransaction>, StoreError> {
        (**self).transactions_between(from, to).await
    }
}

/// Errors that abort a whole reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Window start is after its end.
    #[error("Invalid reconciliation window: {from} is after {to}")]
    InvalidWindow {
        /// Window start.
        from: DateTime<Utc>,
        /// Window end.
        to: DateTime<Utc>,
    },

    /// The feed could not be read.
    #[error("Wallet feed error: {0}")]
    Feed(String),
}

impl ReconcileError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
            Self::Feed(_) => "FEED_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidWindow { .. } => 400,
            Self::Feed(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Feed(_))
    }
}

/// Scans wallet transactions and posts them through the posting service.
///
/// Transactions are processed one at a time. A failing transaction is
/// recorded as skipped and the run moves on. Re-running an overlapping window
/// is safe: every posting is idempotent by correlation id.
#[derive(Debug, Clone)]
pub struct ReconciliationDriver<F, S> {
    feed: F,
    postings: PostingService<S>,
    policy: ChargePolicy,
}

impl<F: WalletFeed, S: LedgerStore> ReconciliationDriver<F, S> {
    /// Creates a driver.
    pub fn new(feed: F, postings: PostingService<S>, policy: ChargePolicy) -> Self {
        Self {
            feed,
            postings,
            policy,
        }
    }

    /// Reconciles transactions dated within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` if `from > to` and `Feed` if the feed cannot be
    /// read. Per-transaction failures are reported in the summary instead.
    pub async fn reconcile(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ReconciliationSummary, ReconcileError> {
        if from > to {
            return Err(ReconcileError::InvalidWindow { from, to });
        }

        let mut summary = ReconciliationSummary::new(from, to);
        let span = info_span!("reconcile", run_id = %summary.run_id, %from, %to);

        async move {
            let transactions = self
                .feed
                .transactions_between(from, to)
                .await
                .map_err(|e| ReconcileError::Feed(e.to_string()))?;

            for tx in &transactions {
                summary.scanned += 1;
                if let Some(reason) = self.process(tx, &mut summary.posted).await {
                    warn!(
                        transaction_id = %tx.transaction_id,
                        amount = %tx.amount,
                        status = %tx.status,
                        reason = %reason,
                        "Wallet transaction skipped"
                    );
                    summary.skip(&tx.transaction_id, reason);
                }
            }

            if summary.skipped > 0 {
                warn!(
                    scanned = summary.scanned,
                    posted = summary.posted,
                    skipped = summary.skipped,
                    "Reconciliation finished with skipped transactions"
                );
            } else {
                info!(
                    scanned = summary.scanned,
                    posted = summary.posted,
                    skipped = summary.skipped,
                    "Reconciliation finished"
                );
            }
            Ok::<_, ReconcileError>(summary)
        }
        .instrument(span)
        .await
    }

    /// Posts every planned entry for one transaction.
    ///
    /// Returns the skip reason, if any. Stops at the first failed posting;
    /// entries already posted for this transaction stay (they are idempotent).
    async fn process(&self, tx: &WalletTransaction, posted: &mut usize) -> Option<SkipReason> {
        let plan = plan_postings(tx, &self.policy);

        for request in &plan.postings {
            match self.postings.post(request).await {
                Ok(outcome) if outcome.created => *posted += 1,
                Ok(_) => {}
                Err(err) => return Some(SkipReason::Failed(err.to_string())),
            }
        }

        plan.skip
    }
}
