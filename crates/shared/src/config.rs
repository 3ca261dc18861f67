//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Fee configuration for deposits and withdrawals.
    #[serde(default)]
    pub fees: FeeConfig,
    /// Scheduled reconciliation configuration.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Fee configuration (`fees` namespace).
///
/// Percentages are in percent units (`2.55` means 2.55 %), flat fees are
/// amounts in the settlement currency. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeeConfig {
    /// Charges applied to wallet credits.
    #[serde(default)]
    pub deposit: DepositFees,
    /// Charges applied to settled withdrawals.
    #[serde(default)]
    pub withdrawal: WithdrawalFees,
}

/// Deposit charges (`fees.deposit.*`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepositFees {
    /// `Deposit.PspFeePercent`: payment service provider fee.
    #[serde(default = "default_deposit_psp_percent")]
    pub psp_fee_percent: Decimal,
    /// `Deposit.SmsFeeFlat`: notification fee recovered from the landlord.
    #[serde(default = "default_sms_fee")]
    pub sms_fee_flat: Decimal,
    /// `Deposit.CommissionPercent`: platform commission.
    #[serde(default)]
    pub commission_percent: Decimal,
}

impl Default for DepositFees {
    fn default() -> Self {
        Self {
            psp_fee_percent: default_deposit_psp_percent(),
            sms_fee_flat: default_sms_fee(),
            commission_percent: Decimal::ZERO,
        }
    }
}

/// Withdrawal charges (`fees.withdrawal.*`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WithdrawalFees {
    /// `Withdrawal.PspFeePercent`: payment service provider fee.
    #[serde(default = "default_withdrawal_psp_percent")]
    pub psp_fee_percent: Decimal,
    /// `Withdrawal.ChargePercent`: platform withdrawal charge.
    #[serde(default = "default_withdrawal_charge_percent")]
    pub charge_percent: Decimal,
    /// `Withdrawal.SmsFeeFlat`: notification fee.
    #[serde(default = "default_sms_fee")]
    pub sms_fee_flat: Decimal,
    /// `Withdrawal.UssdFeeFlat`: USSD session fee.
    #[serde(default = "default_ussd_fee")]
    pub ussd_fee_flat: Decimal,
}

impl Default for WithdrawalFees {
    fn default() -> Self {
        Self {
            psp_fee_percent: default_withdrawal_psp_percent(),
            charge_percent: default_withdrawal_charge_percent(),
            sms_fee_flat: default_sms_fee(),
            ussd_fee_flat: default_ussd_fee(),
        }
    }
}

fn default_deposit_psp_percent() -> Decimal {
    Decimal::TWO
}

fn default_withdrawal_psp_percent() -> Decimal {
    Decimal::new(255, 2)
}

fn default_withdrawal_charge_percent() -> Decimal {
    Decimal::TEN
}

fn default_sms_fee() -> Decimal {
    Decimal::new(35, 0)
}

fn default_ussd_fee() -> Decimal {
    Decimal::TEN
}

/// Scheduled reconciliation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReconciliationConfig {
    /// Whether the server runs the reconciliation job.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Seconds between two runs.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Width of the window re-scanned on every run, in hours.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
            lookback_hours: default_lookback_hours(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_lookback_hours() -> u32 {
    48
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KODI").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
