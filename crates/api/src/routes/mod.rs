//! API route definitions.

use axum::{Router, http::Uri};
use kodi_shared::AppError;

use crate::{AppState, error::ApiError};

pub mod health;
pub mod ledger;
pub mod reconciliation;
pub mod reports;
pub mod wallets;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(ledger::routes())
        .merge(reports::routes())
        .merge(wallets::routes())
        .merge(reconciliation::routes())
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> ApiError {
    AppError::NotFound(format!("No route for {uri}")).into()
}
