//! Ledger store migration.
//!
//! Creates the chart of accounts, journal entries and journal lines together
//! with the guards that keep the ledger append-only and balanced.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'income',
    'expense'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id              BIGSERIAL PRIMARY KEY,
    code            VARCHAR(20) NOT NULL,
    name            VARCHAR(255) NOT NULL,
    account_type    account_type NOT NULL,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_code UNIQUE (code)
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id              BIGSERIAL PRIMARY KEY,
    correlation_id  VARCHAR(255) NOT NULL,
    source_type     VARCHAR(32) NOT NULL,
    source_id       VARCHAR(255) NOT NULL,
    description     TEXT NOT NULL,
    entry_date      TIMESTAMPTZ NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_journal_entries_correlation UNIQUE (correlation_id),
    CONSTRAINT chk_correlation_not_blank CHECK (length(trim(correlation_id)) > 0),
    CONSTRAINT chk_source_type CHECK (source_type IN (
        'TENANT_PAYMENT',
        'WALLET_DEPOSIT',
        'WITHDRAWAL_INITIATED',
        'WITHDRAWAL_SETTLED',
        'WITHDRAWAL_REVERSED',
        'REVERSAL',
        'MANUAL'
    ))
);

CREATE INDEX idx_journal_entries_date ON journal_entries(entry_date, id);
CREATE INDEX idx_journal_entries_source ON journal_entries(source_type, source_id);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id              BIGSERIAL PRIMARY KEY,
    entry_id        BIGINT NOT NULL REFERENCES journal_entries(id),
    account_id      BIGINT NOT NULL REFERENCES accounts(id),
    debit           NUMERIC(19, 2) NOT NULL DEFAULT 0,
    credit          NUMERIC(19, 2) NOT NULL DEFAULT 0,
    wallet_id       BIGINT,
    landlord_id     BIGINT,
    tenant_id       BIGINT,
    memo            TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_amounts_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_one_side_only CHECK ((debit > 0) <> (credit > 0))
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id, entry_id);
CREATE INDEX idx_journal_lines_wallet ON journal_lines(wallet_id, account_id)
    WHERE wallet_id IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_entry_balance
-- Debit total must equal credit total once the posting commits
-- ============================================================
CREATE OR REPLACE FUNCTION check_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    total_debit NUMERIC(19, 2);
    total_credit NUMERIC(19, 2);
BEGIN
    SELECT
        COALESCE(SUM(debit), 0),
        COALESCE(SUM(credit), 0)
    INTO total_debit, total_credit
    FROM journal_lines
    WHERE entry_id = NEW.entry_id;

    IF total_debit <> total_credit THEN
        RAISE EXCEPTION 'Journal entry % is not balanced. Debit: %, Credit: %',
            NEW.entry_id, total_debit, total_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER INSERT ON journal_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_entry_balance();

-- ============================================================
-- FUNCTION: check_entry_has_lines
-- An entry header cannot be committed without its lines
-- ============================================================
CREATE OR REPLACE FUNCTION check_entry_has_lines()
RETURNS TRIGGER AS $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM journal_lines WHERE entry_id = NEW.id) THEN
        RAISE EXCEPTION 'Journal entry % has no lines', NEW.id;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_entry_has_lines
AFTER INSERT ON journal_entries
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_entry_has_lines();

-- ============================================================
-- FUNCTION: prevent_ledger_modification
-- Entries and lines are append-only; corrections are reversing entries
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_ledger_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Cannot % %: the ledger is append-only. Post a reversing entry instead.',
        lower(TG_OP), TG_TABLE_NAME;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_journal_entries_append_only
BEFORE UPDATE OR DELETE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_ledger_modification();

CREATE TRIGGER trg_journal_lines_append_only
BEFORE UPDATE OR DELETE ON journal_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_ledger_modification();

-- ============================================================
-- FUNCTION: prevent_referenced_account_change
-- Account code and type are frozen once a line references the account
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_referenced_account_change()
RETURNS TRIGGER AS $$
BEGIN
    IF (OLD.code <> NEW.code OR OLD.account_type <> NEW.account_type)
        AND EXISTS (SELECT 1 FROM journal_lines WHERE account_id = OLD.id) THEN
        RAISE EXCEPTION 'Account % is referenced by posted lines and cannot change code or type',
            OLD.code;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_accounts_frozen_when_referenced
BEFORE UPDATE ON accounts
FOR EACH ROW
EXECUTE FUNCTION prevent_referenced_account_change();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_accounts_frozen_when_referenced ON accounts;
DROP TRIGGER IF EXISTS trg_journal_lines_append_only ON journal_lines;
DROP TRIGGER IF EXISTS trg_journal_entries_append_only ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_entry_has_lines ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON journal_lines;

DROP FUNCTION IF EXISTS prevent_referenced_account_change();
DROP FUNCTION IF EXISTS prevent_ledger_modification();
DROP FUNCTION IF EXISTS check_entry_has_lines();
DROP FUNCTION IF EXISTS check_entry_balance();

DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP TYPE IF EXISTS account_type CASCADE;
";
