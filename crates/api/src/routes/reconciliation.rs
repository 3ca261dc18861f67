//! Reconciliation routes.
//!
//! Lets operators re-run a window by hand; the scheduled job in the server
//! binary calls the same driver.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use kodi_core::reconciliation::ReconciliationSummary;
use serde::Deserialize;

use crate::{AppState, error::ApiError, extract::ApiJson};

/// Creates the reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reconciliation/runs", post(run_reconciliation))
}

/// Window to reconcile.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// Inclusive start.
    pub from: DateTime<Utc>,
    /// Inclusive end.
    pub to: DateTime<Utc>,
}

async fn run_reconciliation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RunRequest>,
) -> Result<Json<ReconciliationSummary>, ApiError> {
    let summary = state.reconciler.reconcile(request.from, request.to).await?;
    Ok(Json(summary))
}
