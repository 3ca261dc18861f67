//! Classification of one wallet transaction into postings.
//!
//! Pure: maps `(amount sign, status)` to the posting requests to submit and an
//! optional skip reason.

use rust_decimal::Decimal;

use super::status::WalletStatus;
use super::types::{SkipReason, WalletTransaction};
use crate::fees::ChargePolicy;
use crate::ledger::rules::{self, EventContext};
use crate::ledger::types::{LineDimensions, PostingRequest};

/// Postings for one transaction, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    /// Requests to post, in order.
    pub postings: Vec<PostingRequest>,
    /// Set when the transaction counts as skipped.
    pub skip: Option<SkipReason>,
}

impl Plan {
    fn posted(postings: Vec<PostingRequest>) -> Self {
        Self {
            postings,
            skip: None,
        }
    }

    fn skip(reason: SkipReason) -> Self {
        Self {
            postings: Vec::new(),
            skip: Some(reason),
        }
    }
}

/// Builds the template context for a wallet transaction.
#[must_use]
pub fn event_context(tx: &WalletTransaction) -> EventContext {
    EventContext {
        source_id: tx.transaction_id.clone(),
        description: tx.description.clone().unwrap_or_default(),
        entry_date: tx.transaction_date,
        dimensions: LineDimensions::wallet(tx.wallet_id, tx.landlord_id),
    }
}

/// Classifies a transaction.
///
/// - amount > 0: wallet credit with charges, whatever the status
/// - amount < 0 and REVERSAL: skipped
/// - amount < 0 otherwise: withdrawal initiated, then settled (SUCCESSFUL),
///   reversed (FAILED/REVERSED), nothing more (PENDING) or skipped (unknown)
/// - amount = 0: skipped
#[must_use]
pub fn plan_postings(tx: &WalletTransaction, policy: &ChargePolicy) -> Plan {
    let ctx = event_context(tx);

    if tx.amount > Decimal::ZERO {
        let charges = policy.deposit_charges(tx.amount);
        return Plan::posted(vec![rules::wallet_credit(&ctx, &charges)]);
    }
    if tx.amount.is_zero() {
        return Plan::skip(SkipReason::ZeroAmount);
    }

    let amount = kodi_shared::types::round_money(tx.amount.abs());
    let initiated = || rules::withdrawal_initiated(&ctx, amount);

    match tx.wallet_status() {
        WalletStatus::Reversal => Plan::skip(SkipReason::ReversalStatus),
        WalletStatus::Pending => Plan::posted(vec![initiated()]),
        WalletStatus::Successful => {
            let charges = policy.withdrawal_charges(tx.amount);
            Plan::posted(vec![initiated(), rules::withdrawal_settled(&ctx, &charges)])
        }
        WalletStatus::Failed | WalletStatus::Reversed => Plan::posted(vec![
            initiated(),
            rules::withdrawal_reversed(&ctx, amount, Some(tx.failure_memo())),
        ]),
        WalletStatus::Unknown(raw) => Plan {
            postings: vec![initiated()],
            skip: Some(SkipReason::UnrecognizedStatus(raw)),
        },
    }
}
