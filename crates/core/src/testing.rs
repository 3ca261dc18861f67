//! In-memory implementations of the storage ports.
//!
//! Used by unit tests here and, through the `test-support` feature, by the
//! HTTP layer's tests. A poisoned lock panics.

#![allow(clippy::missing_panics_doc)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kodi_shared::types::{AccountId, JournalEntryId, JournalLineId};

use crate::ledger::rules::STANDARD_CHART;
use crate::ledger::store::{LedgerReader, LedgerStore, LineFilter, StoreError};
use crate::ledger::types::{AccountInfo, JournalEntry, JournalLine, LedgerLine, NewJournalEntry};
use crate::reconciliation::{WalletFeed, WalletTransaction};

#[derive(Default)]
struct State {
    accounts: Vec<AccountInfo>,
    entries: Vec<JournalEntry>,
    next_line_id: i64,
}

/// Ledger kept in a vector. Inserts are all-or-nothing like the real store.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<State>,
    hide_lookups: AtomicBool,
    failing_correlation: Mutex<Option<String>>,
}

impl InMemoryLedger {
    /// Ledger with the standard chart of accounts.
    pub fn seeded() -> Self {
        let ledger = Self::default();
        {
            let mut state = ledger.state.lock().unwrap();
            state.accounts = STANDARD_CHART
                .iter()
                .zip(1..)
                .map(|(chart, id)| AccountInfo {
                    id: AccountId::new(id),
                    code: chart.code.to_string(),
                    name: chart.name.to_string(),
                    account_type: chart.account_type,
                    is_active: true,
                })
                .collect();
        }
        ledger
    }

    /// Number of stored entries.
    pub fn entry_count(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    /// Marks an account inactive.
    pub fn deactivate(&self, code: &str) {
        let mut state = self.state.lock().unwrap();
        for account in state.accounts.iter_mut().filter(|a| a.code == code) {
            account.is_active = false;
        }
    }

    /// Makes `find_entry_id` miss, simulating a concurrent insert after the lookup.
    pub fn hide_lookups(&self, hide: bool) {
        self.hide_lookups.store(hide, Ordering::SeqCst);
    }

    /// Fails inserts for this correlation id with a backend error.
    pub fn fail_inserts_for(&self, correlation_id: &str) {
        *self.failing_correlation.lock().unwrap() = Some(correlation_id.to_string());
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn find_entry_id(
        &self,
        correlation_id: &str,
    ) -> Result<Option<JournalEntryId>, StoreError> {
        if self.hide_lookups.load(Ordering::SeqCst) {
            // Only the pre-insert lookup is hidden; the post-conflict re-fetch sees the row.
            self.hide_lookups.store(false, Ordering::SeqCst);
            return Ok(None);
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .find(|e| e.correlation_id == correlation_id)
            .map(|e| e.id))
    }

    async fn find_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .filter(|a| codes.contains(&a.code))
            .cloned()
            .collect())
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_entry(&self, entry: NewJournalEntry) -> Result<JournalEntryId, StoreError> {
        let failing = self.failing_correlation.lock().unwrap().clone();
        if failing.as_deref() == Some(entry.correlation_id.as_str()) {
            return Err(StoreError::Backend("simulated outage".into()));
        }

        let mut state = self.state.lock().unwrap();
        if state
            .entries
            .iter()
            .any(|e| e.correlation_id == entry.correlation_id)
        {
            return Err(StoreError::DuplicateCorrelationId(entry.correlation_id));
        }

        let mut lines = Vec::with_capacity(entry.lines.len());
        for line in entry.lines {
            let code = state
                .accounts
                .iter()
                .find(|a| a.id == line.account_id)
                .map(|a| a.code.clone())
                .ok_or_else(|| StoreError::Backend(format!("no account {}", line.account_id)))?;
            state.next_line_id += 1;
            lines.push(JournalLine {
                id: JournalLineId::new(state.next_line_id),
                account_id: line.account_id,
                account_code: code,
                debit: line.debit,
                credit: line.credit,
                dimensions: line.dimensions,
                memo: line.memo,
            });
        }

        let id = JournalEntryId::new(i64::try_from(state.entries.len()).unwrap() + 1);
        state.entries.push(JournalEntry {
            id,
            entry_date: entry.entry_date,
            description: entry.description,
            correlation_id: entry.correlation_id,
            source_type: entry.source_type,
            source_id: entry.source_id,
            lines,
        });
        Ok(id)
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn accounts(&self) -> Result<Vec<AccountInfo>, StoreError> {
        let mut accounts = self.state.lock().unwrap().accounts.clone();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn lines(&self, filter: &LineFilter) -> Result<Vec<LedgerLine>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut lines: Vec<LedgerLine> = state
            .entries
            .iter()
            .flat_map(|entry| {
                entry.lines.iter().filter_map(|line| {
                    let account = state.accounts.iter().find(|a| a.id == line.account_id)?;
                    Some(LedgerLine {
                        entry_id: entry.id,
                        line_id: line.id,
                        entry_date: entry.entry_date,
                        correlation_id: entry.correlation_id.clone(),
                        description: entry.description.clone(),
                        account_code: account.code.clone(),
                        account_type: account.account_type,
                        debit: line.debit,
                        credit: line.credit,
                        dimensions: line.dimensions,
                        memo: line.memo.clone(),
                    })
                })
            })
            .filter(|line| filter.matches(line))
            .collect();
        lines.sort_by_key(LedgerLine::sort_key);
        Ok(lines)
    }
}

/// Wallet feed over a fixed list of rows whose status can be changed.
pub struct InMemoryFeed {
    rows: Mutex<Vec<WalletTransaction>>,
}

impl InMemoryFeed {
    /// Feed over the given rows.
    pub fn new(rows: Vec<WalletTransaction>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Simulates the provider updating a transaction's status.
    pub fn set_status(&self, transaction_id: &str, status: &str) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut().filter(|r| r.transaction_id == transaction_id) {
            row.status = status.to_string();
        }
    }
}

#[async_trait]
impl WalletFeed for InMemoryFeed {
    async fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WalletTransaction>, StoreError> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.transaction_date >= from && r.transaction_date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.transaction_date);
        Ok(rows)
    }
}
