//! Wallet transaction feed migration.
//!
//! The table is owned by the payment integration; the ledger only reads it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(WALLET_TRANSACTIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS wallet_transactions CASCADE;")
            .await?;
        Ok(())
    }
}

const WALLET_TRANSACTIONS_SQL: &str = r"
CREATE TABLE wallet_transactions (
    id                  BIGSERIAL PRIMARY KEY,
    transaction_id      VARCHAR(255) NOT NULL,
    amount              NUMERIC(19, 2) NOT NULL,
    status              VARCHAR(64) NOT NULL,
    wallet_id           BIGINT NOT NULL,
    landlord_id         BIGINT,
    transaction_date    TIMESTAMPTZ NOT NULL,
    description         TEXT,
    reason_at_telecom   TEXT,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_wallet_transactions_txid UNIQUE (transaction_id)
);

CREATE INDEX idx_wallet_transactions_date ON wallet_transactions(transaction_date, id);
CREATE INDEX idx_wallet_transactions_wallet ON wallet_transactions(wallet_id, transaction_date);
";
