//! Journal repository: the write side of the ledger store.
//!
//! Each posting is written in one database transaction. The unique constraint
//! on `journal_entries.correlation_id` decides concurrent races, and the
//! deferred balance trigger rejects an unbalanced entry at commit.

use async_trait::async_trait;
use chrono::Utc;
use kodi_core::ledger::{
    AccountInfo, JournalEntry, JournalLine, LedgerStore, LineDimensions, NewJournalEntry,
    SourceType, StoreError,
};
use kodi_shared::types::{
    AccountId, JournalEntryId, JournalLineId, LandlordId, TenantId, WalletId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, instrument};

use super::account::AccountRepository;
use super::backend;
use crate::entities::{accounts, journal_entries, journal_lines};

/// Journal repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn insert_in_transaction(&self, entry: NewJournalEntry) -> Result<i64, DbErr> {
        let txn = self.db.begin().await?;

        let header = journal_entries::ActiveModel {
            correlation_id: Set(entry.correlation_id),
            source_type: Set(entry.source_type.as_str().to_string()),
            source_id: Set(entry.source_id),
            description: Set(entry.description),
            entry_date: Set(entry.entry_date.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let lines = entry.lines.into_iter().map(|line| journal_lines::ActiveModel {
            entry_id: Set(header.id),
            account_id: Set(line.account_id.into_inner()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            wallet_id: Set(line.dimensions.wallet_id.map(WalletId::into_inner)),
            landlord_id: Set(line.dimensions.landlord_id.map(LandlordId::into_inner)),
            tenant_id: Set(line.dimensions.tenant_id.map(TenantId::into_inner)),
            memo: Set(line.memo),
            ..Default::default()
        });
        journal_lines::Entity::insert_many(lines)
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(header.id)
    }
}

#[async_trait]
impl LedgerStore for JournalRepository {
    async fn find_entry_id(
        &self,
        correlation_id: &str,
    ) -> Result<Option<JournalEntryId>, StoreError> {
        let id: Option<i64> = journal_entries::Entity::find()
            .select_only()
            .column(journal_entries::Column::Id)
            .filter(journal_entries::Column::CorrelationId.eq(correlation_id))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(id.map(JournalEntryId::new))
    }

    async fn find_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, StoreError> {
        AccountRepository::new(self.db.clone())
            .find_by_codes(codes)
            .await
            .map_err(backend)
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError> {
        let Some(header) = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };

        let rows = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(header.id))
            .order_by_asc(journal_lines::Column::Id)
            .find_also_related(accounts::Entity)
            .all(&self.db)
            .await
            .map_err(backend)?;

        let source_type: SourceType = header.source_type.parse().map_err(StoreError::Backend)?;

        let lines = rows
            .into_iter()
            .map(|(line, account)| JournalLine {
                id: JournalLineId::new(line.id),
                account_id: AccountId::new(line.account_id),
                account_code: account.map(|a| a.code).unwrap_or_default(),
                debit: line.debit,
                credit: line.credit,
                dimensions: LineDimensions {
                    wallet_id: line.wallet_id.map(WalletId::new),
                    landlord_id: line.landlord_id.map(LandlordId::new),
                    tenant_id: line.tenant_id.map(TenantId::new),
                },
                memo: line.memo,
            })
            .collect();

        Ok(Some(JournalEntry {
            id: JournalEntryId::new(header.id),
            entry_date: header.entry_date.with_timezone(&Utc),
            description: header.description,
            correlation_id: header.correlation_id,
            source_type,
            source_id: header.source_id,
            lines,
        }))
    }

    #[instrument(
        skip(self, entry),
        fields(correlation_id = %entry.correlation_id, lines = entry.lines.len())
    )]
    async fn insert_entry(&self, entry: NewJournalEntry) -> Result<JournalEntryId, StoreError> {
        let correlation_id = entry.correlation_id.clone();
        match self.insert_in_transaction(entry).await {
            Ok(id) => {
                debug!(entry_id = id, "Journal entry committed");
                Ok(JournalEntryId::new(id))
            }
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(StoreError::DuplicateCorrelationId(correlation_id))
                }
                _ => Err(backend(err)),
            },
        }
    }
}
