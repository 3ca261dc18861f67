//! Report data types.

use chrono::{DateTime, Utc};
use kodi_shared::types::{JournalEntryId, JournalLineId, WalletId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::types::AccountType;

/// Per-account totals for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

/// One line of an account statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Entry ID.
    pub entry_id: JournalEntryId,
    /// Line ID.
    pub line_id: JournalLineId,
    /// Entry date.
    pub entry_date: DateTime<Utc>,
    /// Entry description.
    pub description: String,
    /// Entry correlation id.
    pub correlation_id: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub memo: Option<String>,
    /// Balance after this line.
    pub running_balance: Decimal,
}

/// Account statement with opening and running balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatement {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Range start (inclusive), open when absent.
    pub from: Option<DateTime<Utc>>,
    /// Range end (inclusive), open when absent.
    pub to: Option<DateTime<Utc>>,
    /// Balance of all lines strictly before `from`.
    pub opening_balance: Decimal,
    /// Lines within the range.
    pub lines: Vec<StatementLine>,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}

/// Trial balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column (net when debits exceed credits).
    pub debit: Decimal,
    /// Credit column (absolute net otherwise).
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Range start.
    pub from: Option<DateTime<Utc>>,
    /// Range end.
    pub to: Option<DateTime<Utc>>,
    /// Accounts with activity in the range, by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountSummary>,
}

/// Balance sheet report.
///
/// Income and expense accounts are not folded into equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Cutoff (inclusive), open when absent.
    pub as_of: Option<DateTime<Utc>>,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section.
    pub equity: BalanceSheetSection,
}

/// Profit and loss summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitSummaryReport {
    /// Range start.
    pub from: Option<DateTime<Utc>>,
    /// Range end.
    pub to: Option<DateTime<Utc>>,
    /// Income accounts.
    pub income: Vec<AccountSummary>,
    /// Expense accounts.
    pub expenses: Vec<AccountSummary>,
    /// Total income.
    pub total_income: Decimal,
    /// Total expense.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net_profit: Decimal,
}

/// Wallet balance derived from Wallets Payable lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Wallet.
    pub wallet_id: WalletId,
    /// Credits minus debits on Wallets Payable for this wallet.
    pub balance: Decimal,
}
