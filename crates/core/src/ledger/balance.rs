//! Account balance calculations.
//!
//! - Asset/Expense: balance += debit - credit (debit-normal)
//! - Liability/Equity/Income: balance += credit - debit (credit-normal)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side on which an account's balance grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalSide {
    /// Debit-normal accounts (Asset, Expense).
    Debit,
    /// Credit-normal accounts (Liability, Equity, Income).
    Credit,
}

impl NormalSide {
    /// Calculates the signed balance change of one line.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Debit and credit totals of an account, with the signed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Side the balance is measured on.
    pub normal_side: NormalSide,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub const fn new(normal_side: NormalSide) -> Self {
        Self {
            normal_side,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
        }
    }

    /// Adds one line.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
    }

    /// Net balance on the account's normal side.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.normal_side
            .balance_change(self.debit_total, self.credit_total)
    }
}

/// Running balance after one statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position of the line in the statement (1-based).
    pub sequence: u64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a chain from an opening balance.
    #[must_use]
    pub fn opening(opening_balance: Decimal, balance_change: Decimal) -> Self {
        Self {
            sequence: 1,
            previous_balance: opening_balance,
            current_balance: opening_balance + balance_change,
        }
    }

    /// Continues the chain.
    ///
    /// `previous_balance[N] = current_balance[N-1]`.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            sequence: previous.sequence + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}
