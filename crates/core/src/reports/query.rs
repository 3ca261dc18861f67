//! Query service: reads the ledger through [`LedgerReader`] and builds reports.

use chrono::{DateTime, Utc};
use kodi_shared::types::WalletId;
use tracing::instrument;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{
    AccountStatement, BalanceSheetReport, ProfitSummaryReport, TrialBalanceReport, WalletBalance,
};
use crate::ledger::rules::accounts;
use crate::ledger::store::{LedgerReader, LineFilter};
use crate::ledger::types::AccountInfo;

/// Read-only reporting over committed ledger lines.
#[derive(Debug, Clone)]
pub struct QueryService<R> {
    reader: R,
}

impl<R: LedgerReader> QueryService<R> {
    /// Creates a query service over a reader.
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Lists the chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub async fn accounts(&self) -> Result<Vec<AccountInfo>, ReportError> {
        Ok(self.reader.accounts().await?)
    }

    /// Statement of one account with opening and running balances.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown code and `InvalidDateRange`
    /// when `from > to`.
    #[instrument(skip(self))]
    pub async fn account_statement(
        &self,
        code: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<AccountStatement, ReportError> {
        ReportService::check_range(from, to)?;

        let account = self
            .reader
            .accounts()
            .await?
            .into_iter()
            .find(|a| a.code == code)
            .ok_or_else(|| ReportError::AccountNotFound(code.to_string()))?;

        let lines = self
            .reader
            .lines(&LineFilter::between(None, to).for_account(code))
            .await?;

        Ok(ReportService::account_statement(&account, &lines, from, to))
    }

    /// Trial balance over `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `TrialBalanceMismatch` if stored lines do not balance.
    #[instrument(skip(self))]
    pub async fn trial_balance(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<TrialBalanceReport, ReportError> {
        ReportService::check_range(from, to)?;
        let accounts = self.reader.accounts().await?;
        let lines = self.reader.lines(&LineFilter::between(from, to)).await?;
        ReportService::trial_balance(&accounts, &lines, from, to)
    }

    /// Balance sheet as of a cutoff.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    #[instrument(skip(self))]
    pub async fn balance_sheet(
        &self,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<BalanceSheetReport, ReportError> {
        let accounts = self.reader.accounts().await?;
        let lines = self.reader.lines(&LineFilter::between(None, as_of)).await?;
        Ok(ReportService::balance_sheet(&accounts, &lines, as_of))
    }

    /// Profit summary over `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `from > to`.
    #[instrument(skip(self))]
    pub async fn profit_summary(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<ProfitSummaryReport, ReportError> {
        ReportService::check_range(from, to)?;
        let accounts = self.reader.accounts().await?;
        let lines = self.reader.lines(&LineFilter::between(from, to)).await?;
        Ok(ReportService::profit_summary(&accounts, &lines, from, to))
    }

    /// Wallet balance derived from Wallets Payable lines tagged with the wallet.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub async fn wallet_balance(&self, wallet_id: WalletId) -> Result<WalletBalance, ReportError> {
        let lines = self
            .reader
            .lines(
                &LineFilter::default()
                    .for_account(accounts::WALLETS_PAYABLE)
                    .for_wallet(wallet_id),
            )
            .await?;
        Ok(ReportService::wallet_balance(wallet_id, &lines))
    }
}
