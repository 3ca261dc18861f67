//! Posting rule templates.
//!
//! Each template is a pure function from a business event to a balanced
//! [`PostingRequest`] over the fixed chart of accounts. Zero-valued fee lines
//! are left out. The posting service re-checks the balance independently.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::types::{
    AccountType, JournalEntry, LineDimensions, PostingLine, PostingRequest, SourceType,
};
use crate::fees::{DepositCharges, WithdrawalCharges};

/// Fixed account codes.
pub mod accounts {
    /// Cash (Asset).
    pub const CASH: &str = "1000";
    /// Wallets Payable (Liability): money held for landlords.
    pub const WALLETS_PAYABLE: &str = "2000";
    /// Withdrawals Clearing (Liability): withdrawals in flight.
    pub const WITHDRAWALS_CLEARING: &str = "2100";
    /// Owner Equity (Equity).
    pub const OWNER_EQUITY: &str = "3000";
    /// Commission Income.
    pub const COMMISSION_INCOME: &str = "4100";
    /// SMS Income.
    pub const SMS_INCOME: &str = "4200";
    /// Withdrawal Fee Income.
    pub const WITHDRAWAL_FEE_INCOME: &str = "4300";
    /// PSP Fee Expense.
    pub const PSP_FEE_EXPENSE: &str = "5100";
    /// SMS Expense.
    pub const SMS_EXPENSE: &str = "5200";
    /// USSD Expense.
    pub const USSD_EXPENSE: &str = "5300";
}

/// Seed definition of one chart-of-accounts row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartAccount {
    /// Account code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Classification.
    pub account_type: AccountType,
}

/// The chart of accounts every template posts to.
pub const STANDARD_CHART: [ChartAccount; 10] = [
    chart(accounts::CASH, "Cash", AccountType::Asset),
    chart(accounts::WALLETS_PAYABLE, "Wallets Payable", AccountType::Liability),
    chart(accounts::WITHDRAWALS_CLEARING, "Withdrawals Clearing", AccountType::Liability),
    chart(accounts::OWNER_EQUITY, "Owner Equity", AccountType::Equity),
    chart(accounts::COMMISSION_INCOME, "Commission Income", AccountType::Income),
    chart(accounts::SMS_INCOME, "SMS Income", AccountType::Income),
    chart(accounts::WITHDRAWAL_FEE_INCOME, "Withdrawal Fee Income", AccountType::Income),
    chart(accounts::PSP_FEE_EXPENSE, "PSP Fee Expense", AccountType::Expense),
    chart(accounts::SMS_EXPENSE, "SMS Expense", AccountType::Expense),
    chart(accounts::USSD_EXPENSE, "USSD Expense", AccountType::Expense),
];

const fn chart(code: &'static str, name: &'static str, account_type: AccountType) -> ChartAccount {
    ChartAccount {
        code,
        name,
        account_type,
    }
}

/// Correlation id builders. Each is a deterministic function of the source id.
pub mod correlation {
    use kodi_shared::types::JournalEntryId;

    /// Direct tenant payment credited to a wallet.
    #[must_use]
    pub fn tenant_payment(payment_id: &str) -> String {
        format!("TENANT_PAY:{payment_id}")
    }

    /// Wallet credit with charges.
    #[must_use]
    pub fn wallet_deposit(transaction_id: &str) -> String {
        format!("WALLET_DEP:{transaction_id}")
    }

    /// Withdrawal moved into clearing.
    #[must_use]
    pub fn withdrawal_initiated(transaction_id: &str) -> String {
        format!("WALLET_WD_INIT:{transaction_id}")
    }

    /// Withdrawal paid out.
    #[must_use]
    pub fn withdrawal_settled(transaction_id: &str) -> String {
        format!("WALLET_WD_SETTLED:{transaction_id}")
    }

    /// Withdrawal returned to the wallet.
    #[must_use]
    pub fn withdrawal_reversed(transaction_id: &str) -> String {
        format!("WALLET_WD_INIT_REV:{transaction_id}")
    }

    /// Reversal of a journal entry.
    #[must_use]
    pub fn reversal(entry_id: JournalEntryId) -> String {
        format!("REVERSAL:{entry_id}")
    }
}

/// Source event data shared by all templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    /// External identifier of the event (transaction or payment id).
    pub source_id: String,
    /// Free-text description of the event.
    pub description: String,
    /// Event timestamp.
    pub entry_date: DateTime<Utc>,
    /// Dimensions copied onto every line.
    pub dimensions: LineDimensions,
}

impl EventContext {
    fn request(
        &self,
        correlation_id: String,
        source_type: SourceType,
        label: &str,
        lines: Vec<PostingLine>,
    ) -> PostingRequest {
        let description = if self.description.trim().is_empty() {
            format!("{label} {}", self.source_id)
        } else {
            format!("{label}: {}", self.description.trim())
        };

        PostingRequest {
            correlation_id,
            source_type,
            source_id: self.source_id.clone(),
            description,
            entry_date: self.entry_date,
            lines: lines
                .into_iter()
                .map(|line| line.with_dimensions(self.dimensions))
                .collect(),
        }
    }
}

/// Pushes the line unless both sides are zero.
fn push_nonzero(lines: &mut Vec<PostingLine>, line: PostingLine) {
    if !(line.debit.is_zero() && line.credit.is_zero()) {
        lines.push(line);
    }
}

/// Wallet deposit with no fees: Dr Cash / Cr Wallets Payable.
#[must_use]
pub fn tenant_deposit(ctx: &EventContext, amount: Decimal) -> PostingRequest {
    ctx.request(
        correlation::tenant_payment(&ctx.source_id),
        SourceType::TenantPayment,
        "Tenant payment",
        vec![
            PostingLine::debit(accounts::CASH, amount),
            PostingLine::credit(accounts::WALLETS_PAYABLE, amount),
        ],
    )
}

/// Wallet credit with charges.
///
/// Cash receives the gross less the PSP fee; the wallet is credited the gross,
/// then debited for commission and SMS, which move to income.
#[must_use]
pub fn wallet_credit(ctx: &EventContext, charges: &DepositCharges) -> PostingRequest {
    let mut lines = Vec::with_capacity(7);
    push_nonzero(&mut lines, PostingLine::debit(accounts::CASH, charges.net_cash()));
    push_nonzero(&mut lines, PostingLine::debit(accounts::PSP_FEE_EXPENSE, charges.psp_fee));
    lines.push(PostingLine::credit(accounts::WALLETS_PAYABLE, charges.gross));

    if charges.commission > Decimal::ZERO {
        lines.push(PostingLine::debit(accounts::WALLETS_PAYABLE, charges.commission));
        lines.push(PostingLine::credit(accounts::COMMISSION_INCOME, charges.commission));
    }
    if charges.sms_fee > Decimal::ZERO {
        lines.push(PostingLine::debit(accounts::WALLETS_PAYABLE, charges.sms_fee));
        lines.push(PostingLine::credit(accounts::SMS_INCOME, charges.sms_fee));
    }

    ctx.request(
        correlation::wallet_deposit(&ctx.source_id),
        SourceType::WalletDeposit,
        "Wallet deposit",
        lines,
    )
}

/// Withdrawal initiated: Dr Wallets Payable / Cr Withdrawals Clearing.
#[must_use]
pub fn withdrawal_initiated(ctx: &EventContext, amount: Decimal) -> PostingRequest {
    ctx.request(
        correlation::withdrawal_initiated(&ctx.source_id),
        SourceType::WithdrawalInitiated,
        "Withdrawal initiated",
        vec![
            PostingLine::debit(accounts::WALLETS_PAYABLE, amount),
            PostingLine::credit(accounts::WITHDRAWALS_CLEARING, amount),
        ],
    )
}

/// Withdrawal settled with all charges.
///
/// Clearing is emptied, fees are expensed, the platform charge is taken from
/// the wallet into income, and cash leaves for the payout plus fees.
#[must_use]
pub fn withdrawal_settled(ctx: &EventContext, charges: &WithdrawalCharges) -> PostingRequest {
    let mut lines = vec![PostingLine::debit(accounts::WITHDRAWALS_CLEARING, charges.amount)];
    push_nonzero(&mut lines, PostingLine::debit(accounts::PSP_FEE_EXPENSE, charges.psp_fee));
    push_nonzero(&mut lines, PostingLine::debit(accounts::SMS_EXPENSE, charges.sms_fee));
    push_nonzero(&mut lines, PostingLine::debit(accounts::USSD_EXPENSE, charges.ussd_fee));
    push_nonzero(&mut lines, PostingLine::debit(accounts::WALLETS_PAYABLE, charges.charge));
    lines.push(PostingLine::credit(accounts::CASH, charges.cash_out()));
    push_nonzero(
        &mut lines,
        PostingLine::credit(accounts::WITHDRAWAL_FEE_INCOME, charges.charge),
    );

    ctx.request(
        correlation::withdrawal_settled(&ctx.source_id),
        SourceType::WithdrawalSettled,
        "Withdrawal settled",
        lines,
    )
}

/// Withdrawal initiation reversed: Dr Withdrawals Clearing / Cr Wallets Payable.
#[must_use]
pub fn withdrawal_reversed(
    ctx: &EventContext,
    amount: Decimal,
    memo: Option<String>,
) -> PostingRequest {
    ctx.request(
        correlation::withdrawal_reversed(&ctx.source_id),
        SourceType::WithdrawalReversed,
        "Withdrawal reversed",
        vec![
            PostingLine::debit(accounts::WITHDRAWALS_CLEARING, amount).with_memo(memo.clone()),
            PostingLine::credit(accounts::WALLETS_PAYABLE, amount).with_memo(memo),
        ],
    )
}

/// Reversing entry: every line of `entry` with debit and credit swapped.
#[must_use]
pub fn reversal_of(
    entry: &JournalEntry,
    reason: &str,
    entry_date: DateTime<Utc>,
) -> PostingRequest {
    let memo = (!reason.trim().is_empty()).then(|| reason.trim().to_string());

    PostingRequest {
        correlation_id: correlation::reversal(entry.id),
        source_type: SourceType::Reversal,
        source_id: entry.id.to_string(),
        description: format!("Reversal of entry {}: {}", entry.id, entry.description),
        entry_date,
        lines: entry
            .lines
            .iter()
            .map(|line| PostingLine {
                account_code: line.account_code.clone(),
                debit: line.credit,
                credit: line.debit,
                dimensions: line.dimensions,
                memo: memo.clone().or_else(|| line.memo.clone()),
            })
            .collect(),
    }
}
