use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    pub lat: f64,
    pub lng: f64,
    /// "search" (default) drops a pin; "directions" starts navigation.
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub url: String,
}

/// Produce a map deep link for a validated in-region coordinate.
pub async fn navigation_link(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NavigateQuery>,
) -> Result<Json<NavigateResponse>> {
    let location = state.region.sanitize(query.lat, query.lng)?;

    let url = match query.mode.as_deref() {
        None | Some("search") => state.navigation.search_url(&location)?,
        Some("directions") => state.navigation.directions_url(&location)?,
        Some(other) => {
            return Err(AppError::InvalidRequest(format!(
                "Unknown navigation mode: '{}' (expected 'search' or 'directions')",
                other
            )))
        }
    };

    Ok(Json(NavigateResponse { url }))
}
