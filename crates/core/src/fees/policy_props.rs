//! Property tests for the charge policy.

use kodi_shared::types::MONEY_SCALE;
use kodi_shared::{DepositFees, FeeConfig, WithdrawalFees};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::policy::ChargePolicy;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64)
        .prop_filter("non-zero", |n| *n != 0)
        .prop_map(|n| Decimal::new(n, 2))
}

fn percent_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn flat_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn policy_strategy() -> impl Strategy<Value = ChargePolicy> {
    (
        percent_strategy(),
        flat_strategy(),
        percent_strategy(),
        percent_strategy(),
        percent_strategy(),
        flat_strategy(),
        flat_strategy(),
    )
        .prop_map(|(dp, ds, dc, wp, wc, ws, wu)| {
            ChargePolicy::new(FeeConfig {
                deposit: DepositFees {
                    psp_fee_percent: dp,
                    sms_fee_flat: ds,
                    commission_percent: dc,
                },
                withdrawal: WithdrawalFees {
                    psp_fee_percent: wp,
                    charge_percent: wc,
                    sms_fee_flat: ws,
                    ussd_fee_flat: wu,
                },
            })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_deposit_charges_are_rounded_and_non_negative(
        policy in policy_strategy(),
        amount in amount_strategy(),
    ) {
        let charges = policy.deposit_charges(amount);
        prop_assert_eq!(charges.gross, amount.abs());
        for value in [charges.psp_fee, charges.commission, charges.sms_fee] {
            prop_assert!(value >= Decimal::ZERO);
            prop_assert!(value.scale() <= MONEY_SCALE);
        }
        prop_assert_eq!(charges.net_cash() + charges.psp_fee, charges.gross);
    }

    #[test]
    fn prop_withdrawal_cash_out_is_amount_plus_expenses(
        policy in policy_strategy(),
        amount in amount_strategy(),
    ) {
        let charges = policy.withdrawal_charges(amount);
        prop_assert_eq!(charges.amount, amount.abs());
        prop_assert_eq!(charges.cash_out(), charges.amount + charges.expenses());
        prop_assert!(charges.charge.scale() <= MONEY_SCALE);
        prop_assert!(charges.psp_fee.scale() <= MONEY_SCALE);
    }

    #[test]
    fn prop_sign_of_amount_does_not_matter(
        policy in policy_strategy(),
        amount in amount_strategy(),
    ) {
        prop_assert_eq!(policy.deposit_charges(amount), policy.deposit_charges(-amount));
        prop_assert_eq!(policy.withdrawal_charges(amount), policy.withdrawal_charges(-amount));
    }
}
