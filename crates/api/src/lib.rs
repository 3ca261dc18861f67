//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for posting, entry lookup, reversal and reports
//! - A manual trigger for reconciliation runs
//! - JSON error mapping for the domain errors and extractor rejections

pub mod error;
pub mod extract;
pub mod routes;


use std::sync::Arc;

use axum::Router;
use kodi_core::fees::ChargePolicy;
use kodi_core::ledger::{LedgerReader, LedgerStore, PostingService};
use kodi_core::reconciliation::{ReconciliationDriver, WalletFeed};
use kodi_core::reports::QueryService;
use kodi_db::{JournalRepository, ReportRepository, WalletTransactionRepository};
use kodi_shared::FeeConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Write port shared by handlers.
pub type SharedStore = Arc<dyn LedgerStore>;
/// Read port shared by handlers.
pub type SharedReader = Arc<dyn LedgerReader>;
/// Wallet feed shared by handlers.
pub type SharedFeed = Arc<dyn WalletFeed>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Posting service.
    pub postings: Arc<PostingService<SharedStore>>,
    /// Report queries.
    pub queries: Arc<QueryService<SharedReader>>,
    /// Reconciliation driver.
    pub reconciler: Arc<ReconciliationDriver<SharedFeed, SharedStore>>,
}

impl AppState {
    /// Wires the services over the given ports.
    pub fn new(
        store: SharedStore,
        reader: SharedReader,
        feed: SharedFeed,
        policy: ChargePolicy,
    ) -> Self {
        Self {
            postings: Arc::new(PostingService::new(Arc::clone(&store))),
            queries: Arc::new(QueryService::new(reader)),
            reconciler: Arc::new(ReconciliationDriver::new(
                feed,
                PostingService::new(store),
                policy,
            )),
        }
    }

    /// Wires the services over the PostgreSQL repositories.
    pub fn from_database(db: &DatabaseConnection, fees: FeeConfig) -> Self {
        Self::new(
            Arc::new(JournalRepository::new(db.clone())),
            Arc::new(ReportRepository::new(db.clone())),
            Arc::new(WalletTransactionRepository::new(db.clone())),
            ChargePolicy::new(fees),
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
