//! Ledger routes: posting, entry lookup, reversal, chart of accounts and
//! account statements.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use kodi_core::ledger::{AccountInfo, JournalEntry, PostingOutcome, PostingRequest};
use kodi_core::reports::AccountStatement;
use kodi_shared::types::JournalEntryId;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger/entries", post(create_entry))
        .route("/ledger/entries/{entry_id}", get(get_entry))
        .route("/ledger/entries/{entry_id}/reversal", post(reverse_entry))
        .route("/ledger/accounts", get(list_accounts))
        .route("/ledger/accounts/{code}/statement", get(account_statement))
}

/// Body of a reversal request.
#[derive(Debug, Default, Deserialize)]
pub struct ReversalRequest {
    /// Why the entry is reversed; copied to the reversal lines.
    #[serde(default)]
    pub reason: String,
}

/// Optional date range.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    /// Inclusive start.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive end.
    pub to: Option<DateTime<Utc>>,
}

/// `201 Created` for a new entry, `200 OK` when the correlation id was
/// already posted.
fn outcome_status(outcome: &PostingOutcome) -> StatusCode {
    if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

async fn create_entry(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PostingRequest>,
) -> Result<(StatusCode, Json<PostingOutcome>), ApiError> {
    let outcome = state.postings.post(&request).await?;
    if outcome.created {
        info!(
            entry_id = %outcome.entry_id,
            correlation_id = %request.correlation_id,
            "Entry posted via API"
        );
    }
    Ok((outcome_status(&outcome), Json(outcome)))
}

async fn get_entry(
    State(state): State<AppState>,
    ApiPath(entry_id): ApiPath<i64>,
) -> Result<Json<JournalEntry>, ApiError> {
    let entry = state.postings.entry(JournalEntryId::new(entry_id)).await?;
    Ok(Json(entry))
}

async fn reverse_entry(
    State(state): State<AppState>,
    ApiPath(entry_id): ApiPath<i64>,
    body: Result<Option<Json<ReversalRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<PostingOutcome>), ApiError> {
    let reason = body?.map(|Json(request)| request.reason).unwrap_or_default();
    let outcome = state
        .postings
        .reverse_entry(JournalEntryId::new(entry_id), &reason)
        .await?;
    Ok((outcome_status(&outcome), Json(outcome)))
}

async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<AccountInfo>>, ApiError> {
    Ok(Json(state.queries.accounts().await?))
}

async fn account_statement(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<AccountStatement>, ApiError> {
    let statement = state
        .queries
        .account_statement(&code, range.from, range.to)
        .await?;
    Ok(Json(statement))
}
