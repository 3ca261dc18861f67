//! Database seeder for Kodi development and testing.
//!
//! Seeds the standard chart of accounts. With `--demo` it also loads a small
//! wallet feed dated in the last hour, so the server's next scheduled run has
//! deposits and withdrawals to post.
//!
//! Usage: cargo run --bin seeder [-- --demo]

use anyhow::Context;
use chrono::{Duration, Utc};
use kodi_core::ledger::STANDARD_CHART;
use kodi_db::{AccountRepository, NewWalletTransaction, WalletTransactionRepository};
use kodi_shared::AppConfig;
use kodi_shared::types::{LandlordId, WalletId};
use rust_decimal::Decimal;

/// Wallet used by the demo feed.
const DEMO_WALLET_ID: i64 = 1001;
/// Landlord owning the demo wallet.
const DEMO_LANDLORD_ID: i64 = 501;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = kodi_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    println!("Seeding chart of accounts...");
    let inserted = AccountRepository::new(db.clone())
        .seed_chart(&STANDARD_CHART)
        .await?;
    println!(
        "  {inserted} of {} accounts inserted",
        STANDARD_CHART.len()
    );

    if std::env::args().any(|arg| arg == "--demo") {
        println!("Seeding demo wallet feed...");
        let feed = WalletTransactionRepository::new(db);
        for tx in demo_feed() {
            let id = tx.transaction_id.clone();
            feed.upsert(tx)
                .await
                .with_context(|| format!("failed to upsert {id}"))?;
            println!("  {id}");
        }
    }

    println!("Seeding complete!");
    Ok(())
}

fn demo_feed() -> Vec<NewWalletTransaction> {
    let now = Utc::now();
    let row = |id: &str, amount: i64, status: &str, minutes_ago: i64, reason: Option<&str>| {
        NewWalletTransaction {
            transaction_id: id.to_string(),
            amount: Decimal::new(amount, 0),
            status: status.to_string(),
            wallet_id: WalletId::new(DEMO_WALLET_ID),
            landlord_id: Some(LandlordId::new(DEMO_LANDLORD_ID)),
            transaction_date: now - Duration::minutes(minutes_ago),
            description: Some(format!("demo {id}")),
            reason_at_telecom: reason.map(str::to_string),
        }
    };

    vec![
        row("DEMO-DEP-1", 10_000, "SUCCESSFUL", 50, None),
        row("DEMO-DEP-2", 2_500, "SUCCESSFUL", 40, None),
        row("DEMO-WD-1", -1_000, "Successful at Telecom", 30, None),
        row("DEMO-WD-2", -400, "Pending At Telecom", 20, None),
        row("DEMO-WD-3", -300, "FAILED", 10, Some("Insufficient float")),
    ]
}
