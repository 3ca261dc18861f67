//! Core business logic for Kodi.
//!
//! This crate contains pure ledger logic with ZERO web or database dependencies.
//! Storage is reached through the async ports in [`ledger::store`] and
//! [`reconciliation::WalletFeed`].
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping, posting rules and the posting service
//! - `fees` - Deposit and withdrawal charge policy
//! - `reconciliation` - Wallet transaction feed to ledger postings
//! - `reports` - Statements, trial balance, balance sheet, profit summary

pub mod fees;
pub mod ledger;
pub mod reconciliation;
pub mod reports;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
