use crate::error::Result;
use crate::models::{Candidate, Coordinates, SearchRequest, SearchResponse};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Rank candidate residences against a reference point.
///
/// The reference and user locations must be inside the service region; the
/// request fails otherwise. Candidates with out-of-region coordinates are
/// dropped with a warning rather than failing everyone else's results.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let reference = state
        .region
        .sanitize(request.reference_location.lat, request.reference_location.lng)?;
    let user_location = match request.user_location {
        Some(raw) => Some(state.region.sanitize(raw.lat, raw.lng)?),
        None => None,
    };

    let candidates: Vec<Candidate> = request
        .candidates
        .into_iter()
        .filter_map(|mut candidate| {
            match state
                .region
                .sanitize(candidate.location.lat, candidate.location.lng)
            {
                Ok(clean) => {
                    candidate.location = clean;
                    Some(candidate)
                }
                Err(e) => {
                    tracing::warn!(candidate = %candidate.name, "Dropping candidate: {}", e);
                    None
                }
            }
        })
        .collect();

    tracing::info!(
        candidates = candidates.len(),
        profile = %request.profile,
        "Search request"
    );

    let destinations: Vec<Coordinates> = candidates.iter().map(|c| c.location).collect();
    let routes = state
        .resolver
        .resolve_many(&reference, &destinations, request.profile, &request.options)
        .await;

    let results = state
        .scorer
        .rank(&candidates, &routes, user_location.as_ref(), &request.filters);

    tracing::info!(results = results.len(), "Search complete");
    Ok(Json(SearchResponse { results }))
}
