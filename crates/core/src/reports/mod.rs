//! Financial report generation.
//!
//! Read-only aggregations over committed journal lines:
//! - Account statement with running balance
//! - Trial balance
//! - Balance sheet
//! - Profit summary
//! - Wallet balance

pub mod error;
pub mod query;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use query::QueryService;
pub use service::ReportService;
pub use types::*;
