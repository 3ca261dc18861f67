//! Report generation service.
//!
//! Pure functions over accounts and ledger lines already read from storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kodi_shared::types::WalletId;
use rust_decimal::Decimal;
use tracing::error;

use super::error::ReportError;
use super::types::{
    AccountStatement, AccountSummary, BalanceSheetReport, BalanceSheetSection,
    ProfitSummaryReport, StatementLine, TrialBalanceReport, TrialBalanceRow, WalletBalance,
};
use crate::ledger::balance::{AccountBalance, NormalSide, RunningBalance};
use crate::ledger::rules::accounts;
use crate::ledger::types::{AccountInfo, AccountType, LedgerLine};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Rejects a range whose start is after its end.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when both bounds are set and `from > to`.
    pub fn check_range(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<(), ReportError> {
        match (from, to) {
            (Some(from), Some(to)) if from > to => Err(ReportError::InvalidDateRange { from, to }),
            _ => Ok(()),
        }
    }

    /// Builds an account statement.
    ///
    /// `lines` are the account's lines up to `to`, in statement order. Lines
    /// dated before `from` make up the opening balance.
    #[must_use]
    pub fn account_statement(
        account: &AccountInfo,
        lines: &[LedgerLine],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AccountStatement {
        let side = account.account_type.normal_side();
        let before_from = |line: &&LedgerLine| from.is_some_and(|from| line.entry_date < from);

        let opening_balance: Decimal = lines
            .iter()
            .filter(|line| before_from(line))
            .map(|line| side.balance_change(line.debit, line.credit))
            .sum();

        let mut running: Option<RunningBalance> = None;
        let statement_lines: Vec<StatementLine> = lines
            .iter()
            .filter(|line| !before_from(line))
            .filter(|line| to.is_none_or(|to| line.entry_date <= to))
            .map(|line| {
                let change = side.balance_change(line.debit, line.credit);
                let next = match &running {
                    Some(previous) => RunningBalance::next_entry(previous, change),
                    None => RunningBalance::opening(opening_balance, change),
                };
                running = Some(next);
                StatementLine {
                    entry_id: line.entry_id,
                    line_id: line.line_id,
                    entry_date: line.entry_date,
                    description: line.description.clone(),
                    correlation_id: line.correlation_id.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    memo: line.memo.clone(),
                    running_balance: next.current_balance,
                }
            })
            .collect();

        AccountStatement {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            account_type: account.account_type,
            from,
            to,
            opening_balance,
            closing_balance: running.map_or(opening_balance, |r| r.current_balance),
            lines: statement_lines,
        }
    }

    /// Generates a trial balance over lines already restricted to the range.
    ///
    /// # Errors
    ///
    /// Returns `TrialBalanceMismatch` if the debit and credit columns differ.
    pub fn trial_balance(
        accounts: &[AccountInfo],
        lines: &[LedgerLine],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<TrialBalanceReport, ReportError> {
        let rows: Vec<TrialBalanceRow> = Self::summarize(accounts, lines, false)
            .into_iter()
            .map(|summary| {
                let net = summary.total_debit - summary.total_credit;
                let (debit, credit) = if net >= Decimal::ZERO {
                    (net, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, net.abs())
                };
                TrialBalanceRow {
                    code: summary.code,
                    name: summary.name,
                    account_type: summary.account_type,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        if total_debit != total_credit {
            error!(
                %total_debit,
                %total_credit,
                "Trial balance mismatch: stored lines do not balance"
            );
            return Err(ReportError::TrialBalanceMismatch {
                debit: total_debit,
                credit: total_credit,
            });
        }

        Ok(TrialBalanceReport {
            from,
            to,
            rows,
            total_debit,
            total_credit,
        })
    }

    /// Generates a balance sheet from lines up to the cutoff.
    #[must_use]
    pub fn balance_sheet(
        accounts: &[AccountInfo],
        lines: &[LedgerLine],
        as_of: Option<DateTime<Utc>>,
    ) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();

        for summary in Self::summarize(accounts, lines, true) {
            match summary.account_type {
                AccountType::Asset => Self::add_to_section(&mut assets, summary),
                AccountType::Liability => Self::add_to_section(&mut liabilities, summary),
                AccountType::Equity => Self::add_to_section(&mut equity, summary),
                AccountType::Income | AccountType::Expense => {}
            }
        }

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
        }
    }

    /// Generates a profit summary from lines within the range.
    #[must_use]
    pub fn profit_summary(
        accounts: &[AccountInfo],
        lines: &[LedgerLine],
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ProfitSummaryReport {
        let (income, expenses): (Vec<_>, Vec<_>) = Self::summarize(accounts, lines, true)
            .into_iter()
            .filter(|s| !s.account_type.is_balance_sheet())
            .partition(|s| s.account_type == AccountType::Income);

        let total_income: Decimal = income.iter().map(|s| s.balance).sum();
        let total_expense: Decimal = expenses.iter().map(|s| s.balance).sum();

        ProfitSummaryReport {
            from,
            to,
            income,
            expenses,
            total_income,
            total_expense,
            net_profit: total_income - total_expense,
        }
    }

    /// Wallet balance: credits minus debits on Wallets Payable for the wallet.
    #[must_use]
    pub fn wallet_balance(wallet_id: WalletId, lines: &[LedgerLine]) -> WalletBalance {
        let balance = lines
            .iter()
            .filter(|line| {
                line.account_code == accounts::WALLETS_PAYABLE
                    && line.dimensions.wallet_id == Some(wallet_id)
            })
            .map(|line| NormalSide::Credit.balance_change(line.debit, line.credit))
            .sum();

        WalletBalance { wallet_id, balance }
    }

    /// Totals per account, ordered by code.
    ///
    /// With `include_idle`, accounts without lines appear with zero totals.
    fn summarize(
        accounts: &[AccountInfo],
        lines: &[LedgerLine],
        include_idle: bool,
    ) -> Vec<AccountSummary> {
        let mut totals: BTreeMap<&str, AccountBalance> = BTreeMap::new();
        for line in lines {
            totals
                .entry(line.account_code.as_str())
                .or_insert_with(|| AccountBalance::new(line.account_type.normal_side()))
                .add(line.debit, line.credit);
        }

        let mut summaries: Vec<AccountSummary> = accounts
            .iter()
            .filter_map(|account| {
                let balance = match totals.get(account.code.as_str()) {
                    Some(balance) => *balance,
                    None if include_idle => AccountBalance::new(account.account_type.normal_side()),
                    None => return None,
                };
                Some(AccountSummary {
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    total_debit: balance.debit_total,
                    total_credit: balance.credit_total,
                    balance: balance.balance(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.code.cmp(&b.code));
        summaries
    }

    fn add_to_section(section: &mut BalanceSheetSection, account: AccountSummary) {
        section.total += account.balance;
        section.accounts.push(account);
    }
}
