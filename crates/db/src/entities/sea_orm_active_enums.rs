//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use kodi_core::ledger::AccountType as DomainAccountType;

/// The `account_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for DomainAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<DomainAccountType> for AccountType {
    fn from(value: DomainAccountType) -> Self {
        match value {
            DomainAccountType::Asset => Self::Asset,
            DomainAccountType::Liability => Self::Liability,
            DomainAccountType::Equity => Self::Equity,
            DomainAccountType::Income => Self::Income,
            DomainAccountType::Expense => Self::Expense,
        }
    }
}
