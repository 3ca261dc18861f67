//! Charge policy: computes fee breakdowns from [`FeeConfig`].
//!
//! All results are rounded with [`round_money`], the same function the
//! posting balance check uses.

use kodi_shared::FeeConfig;
use kodi_shared::types::{percent_of, round_money};
use rust_decimal::Decimal;
use serde::Serialize;

/// Charges on a wallet credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepositCharges {
    /// Amount received from the payer.
    pub gross: Decimal,
    /// Payment service provider fee, withheld before cash arrives.
    pub psp_fee: Decimal,
    /// Platform commission recovered from the wallet.
    pub commission: Decimal,
    /// Notification fee recovered from the wallet.
    pub sms_fee: Decimal,
}

impl DepositCharges {
    /// Cash actually received (`gross - psp_fee`).
    #[must_use]
    pub fn net_cash(&self) -> Decimal {
        self.gross - self.psp_fee
    }

    /// Net increase of the landlord's wallet.
    #[must_use]
    pub fn wallet_credit(&self) -> Decimal {
        self.gross - self.commission - self.sms_fee
    }
}

/// Charges on a settled withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WithdrawalCharges {
    /// Amount paid out to the landlord.
    pub amount: Decimal,
    /// Payment service provider fee.
    pub psp_fee: Decimal,
    /// Platform withdrawal charge, taken from the wallet.
    pub charge: Decimal,
    /// Notification fee.
    pub sms_fee: Decimal,
    /// USSD session fee.
    pub ussd_fee: Decimal,
}

impl WithdrawalCharges {
    /// Total cash leaving the platform (`amount + psp + sms + ussd`).
    #[must_use]
    pub fn cash_out(&self) -> Decimal {
        self.amount + self.psp_fee + self.sms_fee + self.ussd_fee
    }

    /// Total platform expense borne on this withdrawal.
    #[must_use]
    pub fn expenses(&self) -> Decimal {
        self.psp_fee + self.sms_fee + self.ussd_fee
    }
}

/// Fee calculator built from explicit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargePolicy {
    config: FeeConfig,
}

impl ChargePolicy {
    /// Creates a policy from fee configuration.
    #[must_use]
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the policy was built from.
    #[must_use]
    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    /// Computes deposit charges on `abs(amount)`.
    #[must_use]
    pub fn deposit_charges(&self, amount: Decimal) -> DepositCharges {
        let fees = &self.config.deposit;
        let gross = round_money(amount.abs());

        DepositCharges {
            gross,
            psp_fee: percent_of(gross, fees.psp_fee_percent),
            commission: percent_of(gross, fees.commission_percent),
            sms_fee: round_money(fees.sms_fee_flat),
        }
    }

    /// Computes withdrawal charges on `abs(amount)`.
    #[must_use]
    pub fn withdrawal_charges(&self, amount: Decimal) -> WithdrawalCharges {
        let fees = &self.config.withdrawal;
        let amount = round_money(amount.abs());

        WithdrawalCharges {
            amount,
            psp_fee: percent_of(amount, fees.psp_fee_percent),
            charge: percent_of(amount, fees.charge_percent),
            sms_fee: round_money(fees.sms_fee_flat),
            ussd_fee: round_money(fees.ussd_fee_flat),
        }
    }
}
