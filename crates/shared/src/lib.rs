//! Shared types, errors, and configuration for Kodi.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for ledger rows and wallet dimensions
//! - Money rounding shared by fee calculation and balance checks
//! - Application-wide error types
//! - Configuration management (server, database, fees, reconciliation)

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DepositFees, FeeConfig, ReconciliationConfig, WithdrawalFees};
pub use error::AppError;
