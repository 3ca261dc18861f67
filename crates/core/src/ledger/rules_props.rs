//! Property tests: every template output passes posting validation.

use chrono::Utc;
use kodi_shared::types::{LandlordId, WalletId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rules::{self, EventContext};
use super::types::LineDimensions;
use super::validation::validate_request;
use crate::fees::{DepositCharges, WithdrawalCharges};

fn money(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..max).prop_map(|n| Decimal::new(n, 2))
}

fn positive_money(max: i64) -> impl Strategy<Value = Decimal> {
    (1i64..max).prop_map(|n| Decimal::new(n, 2))
}

fn ctx() -> EventContext {
    EventContext {
        source_id: "TX-P".into(),
        description: String::new(),
        entry_date: Utc::now(),
        dimensions: LineDimensions::wallet(WalletId::new(1), Some(LandlordId::new(1))),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_wallet_credit_balances(
        gross in positive_money(100_000_000),
        psp_pct in 0i64..100,
        commission in money(1_000_000),
        sms_fee in money(10_000),
    ) {
        let psp_fee = kodi_shared::types::percent_of(gross, Decimal::from(psp_pct));
        let charges = DepositCharges { gross, psp_fee, commission, sms_fee };
        let request = rules::wallet_credit(&ctx(), &charges);
        let (_, totals) = validate_request(&request)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(totals.credit, gross + commission + sms_fee);
    }

    #[test]
    fn prop_withdrawal_settled_balances(
        amount in positive_money(100_000_000),
        psp_fee in money(1_000_000),
        charge in money(1_000_000),
        sms_fee in money(10_000),
        ussd_fee in money(10_000),
    ) {
        let charges = WithdrawalCharges { amount, psp_fee, charge, sms_fee, ussd_fee };
        let request = rules::withdrawal_settled(&ctx(), &charges);
        let (_, totals) = validate_request(&request)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(totals.debit, charges.cash_out() + charge);
    }

    #[test]
    fn prop_initiated_then_reversed_nets_to_zero(amount in positive_money(100_000_000)) {
        let initiated = rules::withdrawal_initiated(&ctx(), amount);
        let reversed = rules::withdrawal_reversed(&ctx(), amount, None);
        prop_assert!(validate_request(&initiated).is_ok());
        prop_assert!(validate_request(&reversed).is_ok());

        for code in [rules::accounts::WALLETS_PAYABLE, rules::accounts::WITHDRAWALS_CLEARING] {
            let net: Decimal = initiated
                .lines
                .iter()
                .chain(reversed.lines.iter())
                .filter(|l| l.account_code == code)
                .map(|l| l.debit - l.credit)
                .sum();
            prop_assert_eq!(net, Decimal::ZERO);
        }
    }
}
