//! Fee breakdowns for wallet deposits and withdrawals.

pub mod policy;

#[cfg(test)]
mod policy_props;

pub use policy::{ChargePolicy, DepositCharges, WithdrawalCharges};
