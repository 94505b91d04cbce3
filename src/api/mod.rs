//! HTTP API layer (spec §6): the four endpoints, backed by an in-memory
//! single-flight/cooldown cache rather than a real relational store (see
//! DESIGN.md for the grounding on that substitution).

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let batch_concurrency = state.config.batch_concurrency;
    Router::new()
        .route("/api/v2/scan", post(handlers::scan))
        .route("/api/v2/scanFullDetails", post(handlers::scan_full_details))
        .route(
            "/api/v2/analyze",
            get(handlers::analyze_get).post(handlers::analyze_post),
        )
        .route(
            "/api/v2/scanBatchFullDetails",
            post(handlers::scan_batch_full_details)
                .layer(ConcurrencyLimitLayer::new(batch_concurrency)),
        )
        .with_state(state)
}
