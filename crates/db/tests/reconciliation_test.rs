//! Integration tests for reconciliation and reporting over PostgreSQL.

mod common;

use chrono::Duration;
use kodi_core::fees::ChargePolicy;
use kodi_core::ledger::PostingService;
use kodi_core::reconciliation::{ReconciliationDriver, WalletFeed};
use kodi_core::reports::QueryService;
use kodi_db::{
    JournalRepository, NewWalletTransaction, ReportRepository, WalletTransactionRepository,
};
use kodi_shared::types::{LandlordId, WalletId};
use rust_decimal_macros::dec;

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_reconcile_feed_into_wallet_balance() {
    let db = common::setup().await;
    let feed = WalletTransactionRepository::new(db.clone());
    let wallet = WalletId::new(common::unique_wallet());
    let start = common::unique_instant();

    let row = |id: &str, amount, status: &str, minutes| NewWalletTransaction {
        transaction_id: id.to_string(),
        amount,
        status: status.to_string(),
        wallet_id: wallet,
        landlord_id: Some(LandlordId::new(3)),
        transaction_date: start + Duration::minutes(minutes),
        description: None,
        reason_at_telecom: None,
    };

    let deposit = common::unique("DEP");
    let withdrawal = common::unique("WD");
    feed.upsert(row(&deposit, dec!(10000), "SUCCESSFUL", 1))
        .await
        .unwrap();
    feed.upsert(row(&withdrawal, dec!(-1000), "Pending At Telecom", 2))
        .await
        .unwrap();

    let driver = ReconciliationDriver::new(
        feed.clone(),
        PostingService::new(JournalRepository::new(db.clone())),
        ChargePolicy::default(),
    );
    let from = start;
    let to = start + Duration::minutes(5);

    let first = driver.reconcile(from, to).await.unwrap();
    assert_eq!(first.scanned, 2);
    assert_eq!(first.posted, 2);
    assert_eq!(first.skipped, 0);

    let query = QueryService::new(ReportRepository::new(db.clone()));
    assert_eq!(query.wallet_balance(wallet).await.unwrap().balance, dec!(8965));

    feed.upsert(row(&withdrawal, dec!(-1000), "SUCCESSFUL", 2))
        .await
        .unwrap();
    let second = driver.reconcile(from, to).await.unwrap();
    assert_eq!(second.posted, 1);
    assert_eq!(query.wallet_balance(wallet).await.unwrap().balance, dec!(8865));

    let third = driver.reconcile(from, to).await.unwrap();
    assert_eq!(third.scanned, 2);
    assert_eq!(third.posted, 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_feed_window_is_inclusive_and_ordered() {
    let db = common::setup().await;
    let feed = WalletTransactionRepository::new(db);
    let wallet = WalletId::new(common::unique_wallet());
    let start = common::unique_instant();

    for (offset, id) in [(2, "B"), (0, "A"), (4, "C")] {
        feed.upsert(NewWalletTransaction {
            transaction_id: common::unique(id),
            amount: dec!(1),
            status: "PENDING".to_string(),
            wallet_id: wallet,
            landlord_id: None,
            transaction_date: start + Duration::seconds(offset),
            description: Some(id.to_string()),
            reason_at_telecom: None,
        })
        .await
        .unwrap();
    }

    let rows = feed
        .transactions_between(start, start + Duration::seconds(2))
        .await
        .unwrap();
    let ours: Vec<_> = rows
        .iter()
        .filter(|tx| tx.wallet_id == wallet)
        .map(|tx| tx.description.clone().unwrap_or_default())
        .collect();
    assert_eq!(ours, vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_trial_balance_balances_over_database() {
    let db = common::setup().await;
    let query = QueryService::new(ReportRepository::new(db));

    let report = query.trial_balance(None, None).await.unwrap();
    assert_eq!(report.total_debit, report.total_credit);

    let statement = query
        .account_statement(kodi_core::ledger::accounts::CASH, None, None)
        .await
        .unwrap();
    assert!(
        statement
            .lines
            .windows(2)
            .all(|w| (w[0].entry_date, w[0].entry_id) <= (w[1].entry_date, w[1].entry_id))
    );
}
