//! Storage ports for the ledger.
//!
//! The posting service writes through [`LedgerStore`], reports read through
//! [`LedgerReader`]. `kodi-db` implements both on PostgreSQL; tests use an
//! in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kodi_shared::types::{JournalEntryId, WalletId};
use thiserror::Error;

use super::types::{AccountInfo, JournalEntry, LedgerLine, NewJournalEntry};

/// Errors returned by storage adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry with this correlation id already exists.
    #[error("Correlation id already posted: {0}")]
    DuplicateCorrelationId(String),

    /// The backend failed; nothing was written.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Filter for reading journal lines.
///
/// Bounds are inclusive; `None` leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFilter {
    /// Only lines on this account.
    pub account_code: Option<String>,
    /// Only lines tagged with this wallet.
    pub wallet_id: Option<WalletId>,
    /// Entries dated at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Entries dated at or before this instant.
    pub to: Option<DateTime<Utc>>,
}

impl LineFilter {
    /// Lines within `[from, to]`.
    #[must_use]
    pub fn between(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    /// Restricts to one account.
    #[must_use]
    pub fn for_account(mut self, code: &str) -> Self {
        self.account_code = Some(code.to_string());
        self
    }

    /// Restricts to one wallet.
    #[must_use]
    pub fn for_wallet(mut self, wallet_id: WalletId) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    /// Returns true if the line passes the filter.
    #[must_use]
    pub fn matches(&self, line: &LedgerLine) -> bool {
        self.account_code
            .as_deref()
            .is_none_or(|code| line.account_code == code)
            && self
                .wallet_id
                .is_none_or(|id| line.dimensions.wallet_id == Some(id))
            && self.from.is_none_or(|from| line.entry_date >= from)
            && self.to.is_none_or(|to| line.entry_date <= to)
    }
}

/// Write side of the ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Looks up the entry posted under a correlation id.
    async fn find_entry_id(&self, correlation_id: &str)
    -> Result<Option<JournalEntryId>, StoreError>;

    /// Loads the accounts with the given codes. Unknown codes are omitted.
    async fn find_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, StoreError>;

    /// Loads one entry with its lines.
    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError>;

    /// Inserts the entry and all its lines atomically.
    ///
    /// Returns `DuplicateCorrelationId` if another writer already holds the
    /// correlation id; nothing is written in that case.
    async fn insert_entry(&self, entry: NewJournalEntry) -> Result<JournalEntryId, StoreError>;
}

/// Read side of the ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Lists the chart of accounts ordered by code.
    async fn accounts(&self) -> Result<Vec<AccountInfo>, StoreError>;

    /// Lists lines matching the filter ordered by `(entry_date, entry_id, line_id)`.
    async fn lines(&self, filter: &LineFilter) -> Result<Vec<LedgerLine>, StoreError>;
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn find_entry_id(
        &self,
        correlation_id: &str,
    ) -> Result<Option<JournalEntryId>, StoreError> {
        (**self).find_entry_id(correlation_id).await
    }

    async fn find_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, StoreError> {
        (**self).find_accounts(codes).await
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        (**self).find_entry(id).await
    }

    async fn insert_entry(&self, entry: NewJournalEntry) -> Result<JournalEntryId, StoreError> {
        (**self).insert_entry(entry).await
    }
}

#[async_trait]
impl<T: LedgerReader + ?Sized> LedgerReader for Arc<T> {
    async fn accounts(&self) -> Result<Vec<AccountInfo>, StoreError> {
        (**self).accounts().await
    }

    async fn lines(&self, filter: &LineFilter) -> Result<Vec<LedgerLine>, StoreError> {
        (**self).lines(filter).await
    }
}
