//! Report repository: the read side of the ledger store.
//!
//! Reads committed lines joined with their entry header and account, in the
//! order reports consume them.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use kodi_core::ledger::{
    AccountInfo, LedgerLine, LedgerReader, LineDimensions, LineFilter, StoreError,
};
use kodi_shared::types::{JournalEntryId, JournalLineId, LandlordId, TenantId, WalletId};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use super::account::AccountRepository;
use super::backend;
use crate::entities::sea_orm_active_enums::AccountType;
use crate::entities::{accounts, journal_entries, journal_lines};

/// Joined row: one line with its header and account columns.
#[derive(Debug, FromQueryResult)]
struct LineRow {
    id: i64,
    entry_id: i64,
    debit: Decimal,
    credit: Decimal,
    wallet_id: Option<i64>,
    landlord_id: Option<i64>,
    tenant_id: Option<i64>,
    memo: Option<String>,
    entry_date: DateTime<FixedOffset>,
    correlation_id: String,
    entry_description: String,
    account_code: String,
    account_type: AccountType,
}

impl From<LineRow> for LedgerLine {
    fn from(row: LineRow) -> Self {
        Self {
            entry_id: JournalEntryId::new(row.entry_id),
            line_id: JournalLineId::new(row.id),
            entry_date: row.entry_date.with_timezone(&Utc),
            correlation_id: row.correlation_id,
            description: row.entry_description,
            account_code: row.account_code,
            account_type: row.account_type.into(),
            debit: row.debit,
            credit: row.credit,
            dimensions: LineDimensions {
                wallet_id: row.wallet_id.map(WalletId::new),
                landlord_id: row.landlord_id.map(LandlordId::new),
                tenant_id: row.tenant_id.map(TenantId::new),
            },
            memo: row.memo,
        }
    }
}

/// Report repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerReader for ReportRepository {
    async fn accounts(&self) -> Result<Vec<AccountInfo>, StoreError> {
        AccountRepository::new(self.db.clone())
            .list()
            .await
            .map_err(backend)
    }

    async fn lines(&self, filter: &LineFilter) -> Result<Vec<LedgerLine>, StoreError> {
        let mut query = journal_lines::Entity::find()
            .join(
                JoinType::InnerJoin,
                journal_lines::Relation::JournalEntries.def(),
            )
            .join(JoinType::InnerJoin, journal_lines::Relation::Accounts.def())
            .column_as(journal_entries::Column::EntryDate, "entry_date")
            .column_as(journal_entries::Column::CorrelationId, "correlation_id")
            .column_as(journal_entries::Column::Description, "entry_description")
            .column_as(accounts::Column::Code, "account_code")
            .column_as(
                Expr::col((accounts::Entity, accounts::Column::AccountType))
                    .cast_as(Alias::new("text")),
                "account_type",
            );

        if let Some(code) = &filter.account_code {
            query = query.filter(accounts::Column::Code.eq(code.as_str()));
        }
        if let Some(wallet_id) = filter.wallet_id {
            query = query.filter(journal_lines::Column::WalletId.eq(wallet_id.into_inner()));
        }
        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        let rows = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_lines::Column::EntryId)
            .order_by_asc(journal_lines::Column::Id)
            .into_model::<LineRow>()
            .all(&self.db)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(LedgerLine::from).collect())
    }
}
