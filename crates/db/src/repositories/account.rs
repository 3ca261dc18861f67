//! Account repository for chart of accounts database operations.

use kodi_core::ledger::{AccountInfo, ChartAccount};
use kodi_shared::types::AccountId;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TryInsertResult,
};
use tracing::info;

use crate::entities::accounts;

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the given chart, leaving existing codes untouched.
    ///
    /// Returns the number of accounts actually inserted, so a second run
    /// returns zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn seed_chart(&self, chart: &[ChartAccount]) -> Result<u64, DbErr> {
        let models = chart.iter().map(|account| accounts::ActiveModel {
            code: Set(account.code.to_string()),
            name: Set(account.name.to_string()),
            account_type: Set(account.account_type.into()),
            is_active: Set(true),
            ..Default::default()
        });

        let result = accounts::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(accounts::Column::Code)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec_without_returning(&self.db)
            .await?;

        let inserted = match result {
            TryInsertResult::Inserted(rows) => rows,
            TryInsertResult::Empty | TryInsertResult::Conflicted => 0,
        };
        info!(inserted, total = chart.len(), "Chart of accounts seeded");
        Ok(inserted)
    }

    /// Lists all accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<AccountInfo>, DbErr> {
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(account_info).collect())
    }

    /// Finds accounts by code. Unknown codes are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<AccountInfo>, DbErr> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::Code.is_in(codes.iter().cloned()))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(account_info).collect())
    }
}

pub(crate) fn account_info(model: accounts::Model) -> AccountInfo {
    AccountInfo {
        id: AccountId::new(model.id),
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        is_active: model.is_active,
    }
}
