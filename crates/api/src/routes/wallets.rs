//! Wallet routes.

use axum::{Json, Router, extract::State, routing::get};
use kodi_core::reports::WalletBalance;
use kodi_shared::types::WalletId;

use crate::{AppState, error::ApiError, extract::ApiPath};

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/wallets/{wallet_id}/balance", get(wallet_balance))
}

/// Balance owed to a wallet, derived from Wallets Payable lines.
async fn wallet_balance(
    State(state): State<AppState>,
    ApiPath(wallet_id): ApiPath<i64>,
) -> Result<Json<WalletBalance>, ApiError> {
    Ok(Json(
        state.queries.wallet_balance(WalletId::new(wallet_id)).await?,
    ))
}
