//! Repository abstractions for data access.
//!
//! Repositories implement the storage ports of `kodi-core` on top of `SeaORM`,
//! hiding the database details from the posting and reporting services.

pub mod account;
pub mod journal;
pub mod report;
pub mod wallet_transaction;

pub use account::AccountRepository;
pub use journal::JournalRepository;
pub use report::ReportRepository;
pub use wallet_transaction::{NewWalletTransaction, WalletTransactionRepository};

use kodi_core::ledger::StoreError;
use sea_orm::DbErr;

/// Maps a database failure onto the port error.
pub(crate) fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}
