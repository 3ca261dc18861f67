//! Double-entry bookkeeping logic.
//!
//! This module implements the write side of the ledger:
//! - Domain types for posting requests and stored entries
//! - Line and balance validation
//! - Posting rule templates over the fixed chart of accounts
//! - Storage ports implemented by the database layer
//! - The posting service (idempotent by correlation id)

pub mod balance;
pub mod error;
pub mod rules;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod rules_props;
#[cfg(test)]
mod service_props;

pub use balance::{AccountBalance, NormalSide, RunningBalance};
pub use error::LedgerError;
pub use rules::{ChartAccount, EventContext, STANDARD_CHART, accounts, correlation};
pub use service::PostingService;
pub use store::{LedgerReader, LedgerStore, LineFilter, StoreError};
pub use types::{
    AccountInfo, AccountType, JournalEntry, JournalLine, LedgerLine, LineDimensions,
    NewJournalEntry, NewJournalLine, PostingLine, PostingOutcome, PostingRequest, PostingTotals,
    SourceType,
};
