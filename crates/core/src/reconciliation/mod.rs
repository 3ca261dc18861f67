//! Wallet reconciliation.
//!
//! Scans the external wallet transaction feed and posts each transaction's
//! current state to the ledger. Safe to re-run over overlapping windows.

pub mod driver;
pub mod plan;
pub mod status;
pub mod types;

pub use driver::{ReconcileError, ReconciliationDriver, WalletFeed};
pub use plan::{Plan, plan_postings};
pub use status::WalletStatus;
pub use types::{ReconciliationSummary, SkipReason, SkippedTransaction, WalletTransaction};
