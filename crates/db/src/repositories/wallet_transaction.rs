//! Wallet transaction repository.
//!
//! The reconciliation driver reads the feed through [`WalletFeed`]. Inserts
//! exist for the seeder and integration tests; the ledger never writes here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kodi_core::ledger::StoreError;
use kodi_core::reconciliation::{WalletFeed, WalletTransaction};
use kodi_shared::types::{LandlordId, WalletId};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::backend;
use crate::entities::wallet_transactions;

/// A wallet transaction as reported by the payment provider.
#[derive(Debug, Clone)]
pub struct NewWalletTransaction {
    /// Provider transaction id.
    pub transaction_id: String,
    /// Signed amount; negative for withdrawals.
    pub amount: Decimal,
    /// Raw provider status.
    pub status: String,
    /// Wallet id.
    pub wallet_id: WalletId,
    /// Owning landlord.
    pub landlord_id: Option<LandlordId>,
    /// When the transaction happened.
    pub transaction_date: DateTime<Utc>,
    /// Free-text description.
    pub description: Option<String>,
    /// Failure reason reported by the telecom.
    pub reason_at_telecom: Option<String>,
}

/// Wallet transaction repository.
#[derive(Debug, Clone)]
pub struct WalletTransactionRepository {
    db: DatabaseConnection,
}

impl WalletTransactionRepository {
    /// Creates a new wallet transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a transaction, or refreshes status and reason when the
    /// provider id is already known.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(&self, tx: NewWalletTransaction) -> Result<(), DbErr> {
        let model = wallet_transactions::ActiveModel {
            transaction_id: Set(tx.transaction_id),
            amount: Set(tx.amount),
            status: Set(tx.status),
            wallet_id: Set(tx.wallet_id.into_inner()),
            landlord_id: Set(tx.landlord_id.map(LandlordId::into_inner)),
            transaction_date: Set(tx.transaction_date.into()),
            description: Set(tx.description),
            reason_at_telecom: Set(tx.reason_at_telecom),
            ..Default::default()
        };

        wallet_transactions::Entity::insert(model)
            .on_conflict(
                OnConflict::column(wallet_transactions::Column::TransactionId)
                    .update_columns([
                        wallet_transactions::Column::Status,
                        wallet_transactions::Column::ReasonAtTelecom,
                    ])
                    .value(wallet_transactions::Column::UpdatedAt, Expr::current_timestamp())
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}

impl From<wallet_transactions::Model> for WalletTransaction {
    fn from(model: wallet_transactions::Model) -> Self {
        Self {
            transaction_id: model.transaction_id,
            amount: model.amount,
            status: model.status,
            wallet_id: WalletId::new(model.wallet_id),
            landlord_id: model.landlord_id.map(LandlordId::new),
            transaction_date: model.transaction_date.with_timezone(&Utc),
            description: model.description,
            reason_at_telecom: model.reason_at_telecom,
        }
    }
}

#[async_trait]
impl WalletFeed for WalletTransactionRepository {
    async fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WalletTransaction>, StoreError> {
        let rows = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::TransactionDate.between(from, to))
            .order_by_asc(wallet_transactions::Column::TransactionDate)
            .order_by_asc(wallet_transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(WalletTransaction::from).collect())
    }
}
