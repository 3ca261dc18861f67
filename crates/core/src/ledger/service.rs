//! Posting service: the transactional write path of the ledger.
//!
//! The service validates a posting request, short-circuits on an already
//! posted correlation id, resolves account codes and hands a fully resolved
//! entry to the [`LedgerStore`], which inserts it atomically. The store's
//! unique constraint on `correlation_id` is the authoritative duplicate guard;
//! the lookup beforehand only saves a failed insert.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use kodi_shared::types::JournalEntryId;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::error::LedgerError;
use super::rules::{self, EventContext};
use super::store::{LedgerStore, StoreError};
use super::types::{
    AccountInfo, JournalEntry, NewJournalEntry, NewJournalLine, PostingOutcome, PostingRequest,
    SourceType,
};
use super::validation::validate_request;

/// Ledger write service, generic over the storage port.
#[derive(Debug, Clone)]
pub struct PostingService<S> {
    store: S,
}

impl<S: LedgerStore> PostingService<S> {
    /// Creates a service over a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Posts a balanced journal entry, idempotently by correlation id.
    ///
    /// Steps:
    /// 1. Reject an empty correlation id or an empty line set
    /// 2. Return the existing entry if the correlation id is already posted
    /// 3. Validate every line and the balance (rounded to 2 places)
    /// 4. Resolve account codes against active accounts
    /// 5. Insert entry and lines in one storage transaction
    ///
    /// A concurrent writer that wins the insert race is reported as
    /// `created = false` with the winner's entry id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the request is invalid or storage fails.
    #[instrument(skip(self, request), fields(correlation_id = %request.correlation_id))]
    pub async fn post(&self, request: &PostingRequest) -> Result<PostingOutcome, LedgerError> {
        if request.correlation_id.trim().is_empty() {
            return Err(LedgerError::MissingCorrelationId);
        }
        if request.lines.is_empty() {
            return Err(LedgerError::NoLines);
        }

        if let Some(entry_id) = self.store.find_entry_id(&request.correlation_id).await? {
            debug!(%entry_id, "Correlation id already posted");
            return Ok(PostingOutcome::existing(entry_id));
        }

        let (amounts, totals) = validate_request(request)?;

        let codes: Vec<String> = request
            .lines
            .iter()
            .map(|line| line.account_code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let accounts: HashMap<String, AccountInfo> = self
            .store
            .find_accounts(&codes)
            .await?
            .into_iter()
            .map(|account| (account.code.clone(), account))
            .collect();

        let entry = Self::resolve(request, &amounts, |code| {
            accounts
                .get(code)
                .cloned()
                .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))
        })?;

        match self.store.insert_entry(entry).await {
            Ok(entry_id) => {
                info!(
                    %entry_id,
                    source_type = %request.source_type,
                    amount = %totals.debit,
                    lines = request.lines.len(),
                    "Journal entry posted"
                );
                Ok(PostingOutcome::created(entry_id))
            }
            Err(StoreError::DuplicateCorrelationId(_)) => {
                let entry_id = self
                    .store
                    .find_entry_id(&request.correlation_id)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::Storage(format!(
                            "correlation id {} reported as duplicate but not found",
                            request.correlation_id
                        ))
                    })?;
                warn!(%entry_id, "Lost insert race; returning existing entry");
                Ok(PostingOutcome::existing(entry_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves validated lines into a storable entry.
    ///
    /// `amounts` are the rounded `(debit, credit)` pairs from validation, in
    /// line order. `account_lookup` maps a code to its account.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` or `InactiveAccount` for the first bad code.
    pub fn resolve<A>(
        request: &PostingRequest,
        amounts: &[(Decimal, Decimal)],
        account_lookup: A,
    ) -> Result<NewJournalEntry, LedgerError>
    where
        A: Fn(&str) -> Result<AccountInfo, LedgerError>,
    {
        let lines = request
            .lines
            .iter()
            .zip(amounts)
            .map(|(line, &(debit, credit))| {
                let account = account_lookup(&line.account_code)?;
                if !account.is_active {
                    return Err(LedgerError::InactiveAccount(account.code));
                }
                Ok(NewJournalLine {
                    account_id: account.id,
                    debit,
                    credit,
                    dimensions: line.dimensions,
                    memo: line.memo.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewJournalEntry {
            correlation_id: request.correlation_id.clone(),
            source_type: request.source_type,
            source_id: request.source_id.clone(),
            description: request.description.clone(),
            entry_date: request.entry_date,
            lines,
        })
    }

    /// Fetches an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry has this id.
    pub async fn entry(&self, entry_id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        self.store
            .find_entry(entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))
    }

    /// Posts a reversing entry for `entry_id`.
    ///
    /// The original entry is never touched. Reversing the same entry again
    /// returns the first reversal.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for an unknown id, `CannotReverseReversal`
    /// when the target is itself a reversal.
    #[instrument(skip(self, reason))]
    pub async fn reverse_entry(
        &self,
        entry_id: JournalEntryId,
        reason: &str,
    ) -> Result<PostingOutcome, LedgerError> {
        let entry = self.entry(entry_id).await?;
        if entry.source_type == SourceType::Reversal {
            return Err(LedgerError::CannotReverseReversal(entry_id));
        }

        self.post(&rules::reversal_of(&entry, reason, Utc::now()))
            .await
    }

    /// Credits a tenant payment straight to a landlord wallet, without fees.
    ///
    /// Used by payment processing outside the reconciliation batch.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if posting fails.
    pub async fn post_wallet_deposit(
        &self,
        ctx: &EventContext,
        amount: Decimal,
    ) -> Result<PostingOutcome, LedgerError> {
        self.post(&rules::tenant_deposit(ctx, amount)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::rules::accounts;
    use crate::ledger::store::LedgerReader;
    use crate::ledger::types::{LineDimensions, PostingLine};
    use crate::testing::InMemoryLedger;
    use kodi_shared::types::{LandlordId, TenantId, WalletId};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn manual(correlation_id: &str, lines: Vec<PostingLine>) -> PostingRequest {
        PostingRequest {
            correlation_id: correlation_id.into(),
            source_type: SourceType::Manual,
            source_id: correlation_id.into(),
            description: "manual".into(),
            entry_date: Utc::now(),
            lines,
        }
    }

    fn opening_cash(correlation_id: &str, amount: Decimal) -> PostingRequest {
        manual(
            correlation_id,
            vec![
                PostingLine::debit(accounts::CASH, amount),
                PostingLine::credit(accounts::OWNER_EQUITY, amount),
            ],
        )
    }

    #[tokio::test]
    async fn test_post_creates_entry() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let outcome = service.post(&opening_cash("M:1", dec!(100))).await.unwrap();
        assert!(outcome.created);

        let entry = service.entry(outcome.entry_id).await.unwrap();
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.totals().is_balanced);
        assert_eq!(entry.lines[0].account_code, accounts::CASH);
    }

    #[tokio::test]
    async fn test_post_is_idempotent() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let first = service.post(&opening_cash("M:1", dec!(100))).await.unwrap();
        let second = service.post(&opening_cash("M:1", dec!(100))).await.unwrap();

        assert_eq!(first.entry_id, second.entry_id);
        assert!(!second.created);
        assert_eq!(service.store().entry_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_correlation_short_circuits_before_validation() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let first = service.post(&opening_cash("M:1", dec!(100))).await.unwrap();

        let unbalanced = manual("M:1", vec![PostingLine::debit(accounts::CASH, dec!(1))]);
        let outcome = service.post(&unbalanced).await.unwrap();
        assert_eq!(outcome.entry_id, first.entry_id);
    }

    #[tokio::test]
    async fn test_lost_race_returns_winner() {
        let ledger = Arc::new(InMemoryLedger::seeded());
        let service = PostingService::new(Arc::clone(&ledger));
        let winner = service.post(&opening_cash("M:race", dec!(10))).await.unwrap();

        // The pre-insert lookup misses, as if the winner committed in between.
        ledger.hide_lookups(true);
        let loser = service.post(&opening_cash("M:race", dec!(10))).await;
        ledger.hide_lookups(false);

        let loser = loser.unwrap();
        assert_eq!(loser.entry_id, winner.entry_id);
        assert!(!loser.created);
        assert_eq!(ledger.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_posts_share_one_entry() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let request = opening_cash("M:concurrent", dec!(25));

        let (a, b) = tokio::join!(service.post(&request), service.post(&request));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.entry_id, b.entry_id);
        assert_eq!(usize::from(a.created) + usize::from(b.created), 1);
        assert_eq!(service.store().entry_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_account_writes_nothing() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let request = manual(
            "M:bad",
            vec![
                PostingLine::debit(accounts::CASH, dec!(10)),
                PostingLine::credit("9999", dec!(10)),
            ],
        );

        let err = service.post(&request).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(code) if code == "9999"));
        assert_eq!(service.store().entry_count(), 0);
        assert!(service.store().lines(&Default::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_account_is_rejected() {
        let ledger = InMemoryLedger::seeded();
        ledger.deactivate(accounts::OWNER_EQUITY);
        let service = PostingService::new(ledger);

        let err = service.post(&opening_cash("M:1", dec!(10))).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InactiveAccount(code) if code == accounts::OWNER_EQUITY
        ));
        assert_eq!(service.store().entry_count(), 0);
    }

    #[tokio::test]
    async fn test_unbalanced_request_never_reaches_storage() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let request = manual(
            "M:unbalanced",
            vec![
                PostingLine::debit(accounts::CASH, dec!(10)),
                PostingLine::credit(accounts::OWNER_EQUITY, dec!(9.99)),
            ],
        );
        assert!(matches!(
            service.post(&request).await,
            Err(LedgerError::UnbalancedEntry { .. })
        ));
        assert_eq!(service.store().entry_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_correlation_id_and_empty_lines() {
        let service = PostingService::new(InMemoryLedger::seeded());
        assert!(matches!(
            service.post(&opening_cash("", dec!(1))).await,
            Err(LedgerError::MissingCorrelationId)
        ));
        assert!(matches!(
            service.post(&manual("M:empty", vec![])).await,
            Err(LedgerError::NoLines)
        ));
    }

    #[tokio::test]
    async fn test_reverse_entry_is_idempotent() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let original = service.post(&opening_cash("M:1", dec!(80))).await.unwrap();

        let first = service.reverse_entry(original.entry_id, "typo").await.unwrap();
        let second = service.reverse_entry(original.entry_id, "typo").await.unwrap();
        assert!(first.created);
        assert_eq!(first.entry_id, second.entry_id);
        assert!(!second.created);

        let reversal = service.entry(first.entry_id).await.unwrap();
        assert_eq!(reversal.source_type, SourceType::Reversal);
        assert_eq!(reversal.correlation_id, format!("REVERSAL:{}", original.entry_id));

        let cash: Decimal = service
            .store()
            .lines(&Default::default())
            .await
            .unwrap()
            .iter()
            .filter(|l| l.account_code == accounts::CASH)
            .map(|l| l.debit - l.credit)
            .sum();
        assert_eq!(cash, Decimal::ZERO);

        assert!(matches!(
            service.reverse_entry(first.entry_id, "again").await,
            Err(LedgerError::CannotReverseReversal(_))
        ));
    }

    #[tokio::test]
    async fn test_entry_not_found() {
        let service = PostingService::new(InMemoryLedger::seeded());
        assert!(matches!(
            service.entry(JournalEntryId::new(404)).await,
            Err(LedgerError::EntryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_post_wallet_deposit() {
        let service = PostingService::new(InMemoryLedger::seeded());
        let ctx = EventContext {
            source_id: "PAY-9".into(),
            description: "Rent".into(),
            entry_date: Utc::now(),
            dimensions: LineDimensions::wallet(WalletId::new(5), Some(LandlordId::new(2)))
                .with_tenant(TenantId::new(8)),
        };

        let outcome = service.post_wallet_deposit(&ctx, dec!(1500)).await.unwrap();
        let entry = service.entry(outcome.entry_id).await.unwrap();
        assert_eq!(entry.correlation_id, "TENANT_PAY:PAY-9");
        assert_eq!(entry.source_type, SourceType::TenantPayment);
        assert!(entry
            .lines
            .iter()
            .all(|l| l.dimensions.tenant_id == Some(TenantId::new(8))));
    }
}
