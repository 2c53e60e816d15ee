pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/match", get(handlers::match_entity))
        .route("/match/", get(handlers::match_entity))
        .route("/audit", post(handlers::audit_candidates))
}
