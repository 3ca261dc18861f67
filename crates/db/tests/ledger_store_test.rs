//! Integration tests for the PostgreSQL ledger store.
//!
//! Run with `cargo test -p kodi-db -- --ignored` against a database given by
//! `DATABASE_URL`.

mod common;

use std::sync::Arc;

use chrono::Utc;
use kodi_core::ledger::{
    EventContext, LedgerError, LedgerStore, LineDimensions, NewJournalEntry, NewJournalLine,
    PostingLine, PostingRequest, PostingService, STANDARD_CHART, SourceType, StoreError,
    accounts,
};
use kodi_db::entities::{journal_entries, journal_lines};
use kodi_db::{AccountRepository, JournalRepository};
use kodi_shared::types::{LandlordId, TenantId, WalletId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};

fn manual(correlation_id: &str, amount: Decimal) -> PostingRequest {
    PostingRequest {
        correlation_id: correlation_id.to_string(),
        source_type: SourceType::Manual,
        source_id: correlation_id.to_string(),
        description: "integration".to_string(),
        entry_date: Utc::now(),
        lines: vec![
            PostingLine::debit(accounts::CASH, amount),
            PostingLine::credit(accounts::OWNER_EQUITY, amount),
        ],
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_seed_chart_is_idempotent() {
    let db = common::setup().await;
    let repo = AccountRepository::new(db);

    assert_eq!(repo.seed_chart(&STANDARD_CHART).await.unwrap(), 0);

    let listed = repo.list().await.unwrap();
    for account in &STANDARD_CHART {
        assert!(listed.iter().any(|a| a.code == account.code));
    }
    assert!(listed.windows(2).all(|w| w[0].code < w[1].code));
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_post_and_read_back_entry() {
    let db = common::setup().await;
    let service = PostingService::new(JournalRepository::new(db));
    let wallet = common::unique_wallet();

    let ctx = EventContext {
        source_id: common::unique("PAY"),
        description: "rent".to_string(),
        entry_date: Utc::now(),
        dimensions: LineDimensions::wallet(WalletId::new(wallet), Some(LandlordId::new(7)))
            .with_tenant(TenantId::new(11)),
    };
    let outcome = service.post_wallet_deposit(&ctx, dec!(2500.00)).await.unwrap();
    assert!(outcome.created);

    let entry = service.entry(outcome.entry_id).await.unwrap();
    assert_eq!(entry.source_type, SourceType::TenantPayment);
    assert_eq!(entry.lines.len(), 2);
    assert!(entry.totals().is_balanced);
    let payable = entry
        .lines
        .iter()
        .find(|l| l.account_code == accounts::WALLETS_PAYABLE)
        .unwrap();
    assert_eq!(payable.credit, dec!(2500.00));
    assert_eq!(payable.dimensions.wallet_id, Some(WalletId::new(wallet)));
    assert_eq!(payable.dimensions.tenant_id, Some(TenantId::new(11)));

    let again = service.post_wallet_deposit(&ctx, dec!(2500.00)).await.unwrap();
    assert!(!again.created);
    assert_eq!(again.entry_id, outcome.entry_id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_duplicate_insert_maps_to_duplicate_correlation_id() {
    let db = common::setup().await;
    let repo = JournalRepository::new(db);
    let service = PostingService::new(repo.clone());
    let correlation_id = common::unique("DUP");

    service.post(&manual(&correlation_id, dec!(10))).await.unwrap();

    let resolved = repo
        .find_accounts(&[accounts::CASH.to_string(), accounts::OWNER_EQUITY.to_string()])
        .await
        .unwrap();
    let entry = NewJournalEntry {
        correlation_id: correlation_id.clone(),
        source_type: SourceType::Manual,
        source_id: correlation_id.clone(),
        description: "second writer".to_string(),
        entry_date: Utc::now(),
        lines: resolved
            .iter()
            .map(|account| {
                let is_cash = account.code == accounts::CASH;
                NewJournalLine {
                    account_id: account.id,
                    debit: if is_cash { dec!(10) } else { Decimal::ZERO },
                    credit: if is_cash { Decimal::ZERO } else { dec!(10) },
                    dimensions: LineDimensions::default(),
                    memo: None,
                }
            })
            .collect(),
    };

    let err = repo.insert_entry(entry).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateCorrelationId(id) if id == correlation_id
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_concurrent_posts_create_one_entry() {
    let db = common::setup().await;
    let service = Arc::new(PostingService::new(JournalRepository::new(db.clone())));
    let correlation_id = common::unique("RACE");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let request = manual(&correlation_id, dec!(99.99));
            tokio::spawn(async move { service.post(&request).await })
        })
        .collect();

    let outcomes: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| o.created).count(), 1);
    assert!(outcomes.iter().all(|o| o.entry_id == outcomes[0].entry_id));

    let stored = journal_entries::Entity::find()
        .filter(journal_entries::Column::CorrelationId.eq(correlation_id.as_str()))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_unknown_account_writes_nothing() {
    let db = common::setup().await;
    let service = PostingService::new(JournalRepository::new(db.clone()));
    let correlation_id = common::unique("UNK");

    let mut request = manual(&correlation_id, dec!(5));
    request.lines[1].account_code = "9999".to_string();

    let err = service.post(&request).await.unwrap_err();
    assert!(matches!(err, LedgerError::UnknownAccount(code) if code == "9999"));

    let stored = journal_entries::Entity::find()
        .filter(journal_entries::Column::CorrelationId.eq(correlation_id.as_str()))
        .one(&db)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_reversal_is_idempotent() {
    let db = common::setup().await;
    let service = PostingService::new(JournalRepository::new(db));

    let original = service
        .post(&manual(&common::unique("REV"), dec!(40)))
        .await
        .unwrap();
    let first = service
        .reverse_entry(original.entry_id, "entered twice")
        .await
        .unwrap();
    let second = service
        .reverse_entry(original.entry_id, "entered twice")
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.entry_id, second.entry_id);

    let reversal = service.entry(first.entry_id).await.unwrap();
    assert_eq!(reversal.source_type, SourceType::Reversal);
    let cash = reversal
        .lines
        .iter()
        .find(|l| l.account_code == accounts::CASH)
        .unwrap();
    assert_eq!(cash.credit, dec!(40));
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_lines_cannot_be_updated_or_deleted() {
    let db = common::setup().await;
    let service = PostingService::new(JournalRepository::new(db.clone()));
    let outcome = service
        .post(&manual(&common::unique("RO"), dec!(12)))
        .await
        .unwrap();

    let line = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(outcome.entry_id.into_inner()))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let mut active: journal_lines::ActiveModel = line.clone().into();
    active.memo = Set(Some("edited".to_string()));
    assert!(active.update(&db).await.is_err());

    assert!(
        journal_lines::Entity::delete_by_id(line.id)
            .exec(&db)
            .await
            .is_err()
    );
    assert!(
        journal_entries::Entity::delete_by_id(outcome.entry_id.into_inner())
            .exec(&db)
            .await
            .is_err()
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_unbalanced_entry_is_rejected_at_commit() {
    let db = common::setup().await;
    let cash = AccountRepository::new(db.clone())
        .find_by_codes(&[accounts::CASH.to_string()])
        .await
        .unwrap()
        .remove(0);
    let correlation_id = common::unique("UNBAL");

    let txn = db.begin().await.unwrap();
    let header = journal_entries::ActiveModel {
        correlation_id: Set(correlation_id.clone()),
        source_type: Set("MANUAL".to_string()),
        source_id: Set(correlation_id.clone()),
        description: Set("one-sided".to_string()),
        entry_date: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .unwrap();
    journal_lines::ActiveModel {
        entry_id: Set(header.id),
        account_id: Set(cash.id.into_inner()),
        debit: Set(dec!(50)),
        credit: Set(Decimal::ZERO),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .unwrap();

    assert!(txn.commit().await.is_err());

    let stored = journal_entries::Entity::find()
        .filter(journal_entries::Column::CorrelationId.eq(correlation_id.as_str()))
        .one(&db)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_line_with_both_sides_violates_check() {
    let db = common::setup().await;
    let cash = AccountRepository::new(db.clone())
        .find_by_codes(&[accounts::CASH.to_string()])
        .await
        .unwrap()
        .remove(0);
    let correlation_id = common::unique("BOTH");

    let txn = db.begin().await.unwrap();
    let header = journal_entries::ActiveModel {
        correlation_id: Set(correlation_id.clone()),
        source_type: Set("MANUAL".to_string()),
        source_id: Set(correlation_id),
        description: Set("both sides".to_string()),
        entry_date: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .unwrap();

    let result = journal_lines::ActiveModel {
        entry_id: Set(header.id),
        account_id: Set(cash.id.into_inner()),
        debit: Set(dec!(5)),
        credit: Set(dec!(5)),
        ..Default::default()
    }
    .insert(&txn)
    .await;
    assert!(result.is_err());
    txn.rollback().await.unwrap();
}
