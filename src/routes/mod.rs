pub mod debug;
pub mod navigate;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", post(search::search))
        .route("/navigate", get(navigate::navigation_link))
        .route("/debug/health", get(debug::health_check))
        .route("/debug/cache", get(debug::cache_stats))
        .with_state(state)
}
