//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_lines::Entity as JournalLines;
pub use super::wallet_transactions::Entity as WalletTransactions;
