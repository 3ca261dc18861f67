//! Property tests for the posting service.
//!
//! - Every accepted entry is balanced when read back from the store.
//! - Posting the same correlation id twice yields one entry.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rules::accounts;
use super::service::PostingService;
use super::store::{LedgerReader, LineFilter};
use super::types::{PostingLine, PostingRequest, SourceType};
use crate::testing::InMemoryLedger;

const CODES: [&str; 6] = [
    accounts::CASH,
    accounts::WALLETS_PAYABLE,
    accounts::WITHDRAWALS_CLEARING,
    accounts::OWNER_EQUITY,
    accounts::SMS_INCOME,
    accounts::PSP_FEE_EXPENSE,
];

/// Debit amounts spread over random accounts, balanced by credits that split
/// the same total differently.
fn balanced_lines_strategy() -> impl Strategy<Value = Vec<PostingLine>> {
    (
        prop::collection::vec((0usize..CODES.len(), 1i64..1_000_000i64), 1..5),
        prop::collection::vec(0usize..CODES.len(), 1..4),
    )
        .prop_map(|(debits, credit_codes)| {
            let total: i64 = debits.iter().map(|(_, cents)| cents).sum();
            let mut lines: Vec<PostingLine> = debits
                .iter()
                .map(|(code, cents)| PostingLine::debit(CODES[*code], Decimal::new(*cents, 2)))
                .collect();

            let parts = i64::try_from(credit_codes.len()).unwrap_or(1);
            let share = total / parts;
            let mut remaining = total;
            for (i, code) in credit_codes.iter().enumerate() {
                let cents = if i + 1 == credit_codes.len() { remaining } else { share };
                remaining -= cents;
                if cents > 0 {
                    lines.push(PostingLine::credit(CODES[*code], Decimal::new(cents, 2)));
                }
            }
            lines
        })
}

fn request(correlation_id: String, lines: Vec<PostingLine>) -> PostingRequest {
    PostingRequest {
        correlation_id,
        source_type: SourceType::Manual,
        source_id: "prop".into(),
        description: "property".into(),
        entry_date: Utc::now(),
        lines,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_posted_entries_are_balanced_when_reread(
        batches in prop::collection::vec(balanced_lines_strategy(), 1..6),
    ) {
        let rt = runtime();
        let service = PostingService::new(InMemoryLedger::seeded());

        rt.block_on(async {
            for (i, lines) in batches.into_iter().enumerate() {
                service.post(&request(format!("P:{i}"), lines)).await.unwrap();
            }
        });

        let lines = rt.block_on(service.store().lines(&LineFilter::default())).unwrap();
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();
        prop_assert_eq!(debit, credit);
    }

    #[test]
    fn prop_same_correlation_id_yields_one_entry(
        lines in balanced_lines_strategy(),
        repeats in 2usize..5,
    ) {
        let rt = runtime();
        let service = PostingService::new(InMemoryLedger::seeded());
        let req = request("P:same".into(), lines);

        let ids: Vec<_> = rt.block_on(async {
            let mut ids = Vec::new();
            for _ in 0..repeats {
                ids.push(service.post(&req).await.unwrap().entry_id);
            }
            ids
        });

        prop_assert!(ids.windows(2).all(|w| w[0] == w[1]));
        prop_assert_eq!(service.store().entry_count(), 1);
    }
}
