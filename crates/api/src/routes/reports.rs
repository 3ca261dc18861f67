//! Report routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use kodi_core::reports::{BalanceSheetReport, ProfitSummaryReport, TrialBalanceReport};
use serde::Deserialize;

use super::ledger::RangeQuery;
use crate::{AppState, error::ApiError, extract::ApiQuery};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/profit-summary", get(profit_summary))
}

/// Query parameters for the balance sheet.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    /// Cutoff; defaults to everything posted so far.
    pub as_of: Option<DateTime<Utc>>,
}

async fn trial_balance(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<TrialBalanceReport>, ApiError> {
    Ok(Json(state.queries.trial_balance(range.from, range.to).await?))
}

async fn balance_sheet(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<BalanceSheetReport>, ApiError> {
    Ok(Json(state.queries.balance_sheet(query.as_of).await?))
}

async fn profit_summary(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<ProfitSummaryReport>, ApiError> {
    Ok(Json(state.queries.profit_summary(range.from, range.to).await?))
}
