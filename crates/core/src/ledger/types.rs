//! Ledger domain types for posting and reading journal entries.
//!
//! This module defines the core types used for creating and validating
//! journal entries in the double-entry bookkeeping system.

use chrono::{DateTime, Utc};
use kodi_shared::types::{AccountId, JournalEntryId, JournalLineId, LandlordId, TenantId, WalletId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::NormalSide;

/// Chart of accounts classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources held (debit-normal).
    Asset,
    /// Amounts owed (credit-normal).
    Liability,
    /// Owner's residual interest (credit-normal).
    Equity,
    /// Earned revenue (credit-normal).
    Income,
    /// Costs incurred (debit-normal).
    Expense,
}

impl AccountType {
    /// Returns the side on which this account type's balance is positive.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalSide::Credit,
        }
    }

    /// Returns true for accounts reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the lowercase name used in storage and responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "income" | "revenue" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Business action that produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// Tenant payment credited straight to a wallet, no fees.
    TenantPayment,
    /// Wallet credit with PSP, commission and SMS charges.
    WalletDeposit,
    /// Withdrawal moved from the wallet into clearing.
    WithdrawalInitiated,
    /// Withdrawal paid out with all charges.
    WithdrawalSettled,
    /// Failed or reversed withdrawal returned to the wallet.
    WithdrawalReversed,
    /// Reversing entry for an earlier journal entry.
    Reversal,
    /// Entry posted directly through the API.
    Manual,
}

impl SourceType {
    /// Returns the tag stored with the entry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TenantPayment => "TENANT_PAYMENT",
            Self::WalletDeposit => "WALLET_DEPOSIT",
            Self::WithdrawalInitiated => "WITHDRAWAL_INITIATED",
            Self::WithdrawalSettled => "WITHDRAWAL_SETTLED",
            Self::WithdrawalReversed => "WITHDRAWAL_REVERSED",
            Self::Reversal => "REVERSAL",
            Self::Manual => "MANUAL",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TENANT_PAYMENT" => Ok(Self::TenantPayment),
            "WALLET_DEPOSIT" => Ok(Self::WalletDeposit),
            "WITHDRAWAL_INITIATED" => Ok(Self::WithdrawalInitiated),
            "WITHDRAWAL_SETTLED" => Ok(Self::WithdrawalSettled),
            "WITHDRAWAL_REVERSED" => Ok(Self::WithdrawalReversed),
            "REVERSAL" => Ok(Self::Reversal),
            "MANUAL" => Ok(Self::Manual),
            _ => Err(format!("Unknown source type: {s}")),
        }
    }
}

/// Optional reporting dimensions attached to a journal line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDimensions {
    /// Wallet the line belongs to.
    #[serde(default)]
    pub wallet_id: Option<WalletId>,
    /// Landlord owning the wallet.
    #[serde(default)]
    pub landlord_id: Option<LandlordId>,
    /// Tenant whose payment produced the line.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
}

impl LineDimensions {
    /// Dimensions for a landlord wallet.
    #[must_use]
    pub const fn wallet(wallet_id: WalletId, landlord_id: Option<LandlordId>) -> Self {
        Self {
            wallet_id: Some(wallet_id),
            landlord_id,
            tenant_id: None,
        }
    }

    /// Adds the paying tenant.
    #[must_use]
    pub const fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }
}

/// One requested debit or credit, referencing an account by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// Chart of accounts code.
    pub account_code: String,
    /// Debit amount (>= 0).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (>= 0).
    #[serde(default)]
    pub credit: Decimal,
    /// Reporting dimensions.
    #[serde(default)]
    pub dimensions: LineDimensions,
    /// Optional line memo.
    #[serde(default)]
    pub memo: Option<String>,
}

impl PostingLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_code: &str, amount: Decimal) -> Self {
        Self {
            account_code: account_code.to_string(),
            debit: amount,
            credit: Decimal::ZERO,
            dimensions: LineDimensions::default(),
            memo: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_code: &str, amount: Decimal) -> Self {
        Self {
            account_code: account_code.to_string(),
            debit: Decimal::ZERO,
            credit: amount,
            dimensions: LineDimensions::default(),
            memo: None,
        }
    }

    /// Sets the reporting dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: LineDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the memo.
    #[must_use]
    pub fn with_memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo;
        self
    }
}

/// A request to record one business event as a balanced journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRequest {
    /// Idempotency key, deterministic in the source event.
    pub correlation_id: String,
    /// Business action that produced the event.
    pub source_type: SourceType,
    /// External identifier of the source event.
    pub source_id: String,
    /// Human-readable description.
    pub description: String,
    /// Event timestamp (not the posting wall-clock).
    #[serde(default = "Utc::now")]
    pub entry_date: DateTime<Utc>,
    /// Requested lines (must not be empty).
    pub lines: Vec<PostingLine>,
}

/// Posting totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl PostingTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Result of a posting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingOutcome {
    /// The entry holding this correlation id.
    pub entry_id: JournalEntryId,
    /// False when the correlation id had already been posted.
    pub created: bool,
}

impl PostingOutcome {
    /// A freshly inserted entry.
    #[must_use]
    pub const fn created(entry_id: JournalEntryId) -> Self {
        Self {
            entry_id,
            created: true,
        }
    }

    /// An entry that already existed for the correlation id.
    #[must_use]
    pub const fn existing(entry_id: JournalEntryId) -> Self {
        Self {
            entry_id,
            created: false,
        }
    }
}

/// Chart of accounts entry as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Surrogate key.
    pub id: AccountId,
    /// Unique account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether lines may be posted to the account.
    pub is_active: bool,
}

/// A validated entry ready to be inserted, with account codes resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// Idempotency key.
    pub correlation_id: String,
    /// Source tag.
    pub source_type: SourceType,
    /// External identifier.
    pub source_id: String,
    /// Description.
    pub description: String,
    /// Event timestamp.
    pub entry_date: DateTime<Utc>,
    /// Lines in request order.
    pub lines: Vec<NewJournalLine>,
}

/// A validated line ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalLine {
    /// Resolved account.
    pub account_id: AccountId,
    /// Debit amount, rounded to the money scale.
    pub debit: Decimal,
    /// Credit amount, rounded to the money scale.
    pub credit: Decimal,
    /// Reporting dimensions.
    pub dimensions: LineDimensions,
    /// Optional memo.
    pub memo: Option<String>,
}

/// A persisted journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Surrogate key.
    pub id: JournalEntryId,
    /// Event timestamp.
    pub entry_date: DateTime<Utc>,
    /// Description.
    pub description: String,
    /// Idempotency key.
    pub correlation_id: String,
    /// Source tag.
    pub source_type: SourceType,
    /// External identifier.
    pub source_id: String,
    /// Lines in insertion order.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Computes debit and credit totals of the stored lines.
    #[must_use]
    pub fn totals(&self) -> PostingTotals {
        PostingTotals::new(
            self.lines.iter().map(|l| l.debit).sum(),
            self.lines.iter().map(|l| l.credit).sum(),
        )
    }
}

/// A persisted journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Surrogate key.
    pub id: JournalLineId,
    /// Account key.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Reporting dimensions.
    pub dimensions: LineDimensions,
    /// Optional memo.
    pub memo: Option<String>,
}

/// A journal line joined with its entry and account, as read for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Line key.
    pub line_id: JournalLineId,
    /// Entry timestamp.
    pub entry_date: DateTime<Utc>,
    /// Entry correlation id.
    pub correlation_id: String,
    /// Entry description.
    pub description: String,
    /// Account code.
    pub account_code: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Reporting dimensions.
    pub dimensions: LineDimensions,
    /// Optional memo.
    pub memo: Option<String>,
}

impl LedgerLine {
    /// Ordering key used by statements: `(entry_date, entry_id, line_id)`.
    #[must_use]
    pub fn sort_key(&self) -> (DateTime<Utc>, JournalEntryId, JournalLineId) {
        (self.entry_date, self.entry_id, self.line_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_normal_sides() {
        assert_eq!(AccountType::Asset.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::Expense.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::Liability.normal_side(), NormalSide::Credit);
        assert_eq!(AccountType::Equity.normal_side(), NormalSide::Credit);
        assert_eq!(AccountType::Income.normal_side(), NormalSide::Credit);
    }

    #[test]
    fn test_account_type_from_str() {
        assert_eq!(AccountType::from_str("Asset").unwrap(), AccountType::Asset);
        assert_eq!(AccountType::from_str("revenue").unwrap(), AccountType::Income);
        assert!(AccountType::from_str("contra").is_err());
    }

    #[test]
    fn test_source_type_tags_round_trip() {
        for source in [
            SourceType::TenantPayment,
            SourceType::WalletDeposit,
            SourceType::WithdrawalInitiated,
            SourceType::WithdrawalSettled,
            SourceType::WithdrawalReversed,
            SourceType::Reversal,
            SourceType::Manual,
        ] {
            assert_eq!(SourceType::from_str(source.as_str()).unwrap(), source);
        }
    }

    #[test]
    fn test_posting_totals_balanced() {
        let totals = PostingTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_posting_totals_unbalanced() {
        let totals = PostingTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }

    #[test]
    fn test_posting_request_deserializes_with_defaults() {
        let json = r#"{
            "correlation_id": "MANUAL:1",
            "source_type": "MANUAL",
            "source_id": "1",
            "description": "Opening cash",
            "lines": [
                {"account_code": "1000", "debit": "50.00"},
                {"account_code": "3000", "credit": "50.00", "memo": "capital"}
            ]
        }"#;
        let request: PostingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.lines[0].credit, Decimal::ZERO);
        assert_eq!(request.lines[1].credit, dec!(50.00));
        assert_eq!(request.lines[1].memo.as_deref(), Some("capital"));
        assert_eq!(request.lines[0].dimensions, LineDimensions::default());
    }
}
