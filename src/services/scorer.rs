use crate::config::ScoringConfig;
use crate::constants::PRICE_NORMALIZATION;
use crate::models::{
    Candidate, Coordinates, GenderPolicy, RouteResult, ScoredCandidate, SearchFilters,
};
use std::cmp::Ordering;

/// Multi-criteria ranking of candidate residences.
///
/// Stateless and pure: ranking never blocks and identical inputs always
/// produce identical output order.
pub struct RecommendationScorer {
    config: ScoringConfig,
}

impl RecommendationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Weighted cost of one candidate; lower is better.
    pub fn score(
        &self,
        candidate: &Candidate,
        distance_to_reference_km: f64,
        distance_to_user_km: Option<f64>,
        amenity_match_ratio: f64,
    ) -> f64 {
        self.config.weight_reference_distance * distance_to_reference_km
            + self.config.weight_user_distance * distance_to_user_km.unwrap_or(0.0)
            + self.config.weight_price * (candidate.price_monthly / PRICE_NORMALIZATION)
            + self.config.weight_rating * (5.0 - candidate.rating)
            + self.config.weight_amenities * (1.0 - amenity_match_ratio)
    }

    /// Filter by hard constraints, score survivors, sort ascending by score.
    /// Ties break by ascending reference distance, then descending rating;
    /// the stable sort keeps any remaining ties in input order.
    ///
    /// `routes` is the resolver output for `candidates`, in the same order.
    pub fn rank(
        &self,
        candidates: &[Candidate],
        routes: &[RouteResult],
        user_location: Option<&Coordinates>,
        filters: &SearchFilters,
    ) -> Vec<ScoredCandidate> {
        debug_assert_eq!(candidates.len(), routes.len());

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .zip(routes.iter())
            .filter_map(|(candidate, route)| {
                let distance_km = route.distance_km();
                if !passes_filters(candidate, filters, distance_km.as_km()) {
                    tracing::debug!(candidate = %candidate.name, "Excluded by hard filters");
                    return None;
                }

                let amenity_ratio =
                    amenity_match_ratio(&candidate.amenities, &filters.required_amenities);
                let distance_to_user = user_location
                    .map(|user| user.distance_to(&candidate.location).as_km());
                let score = self.score(
                    candidate,
                    distance_km.as_km(),
                    distance_to_user,
                    amenity_ratio,
                );

                Some(ScoredCandidate {
                    candidate_id: candidate.id,
                    name: candidate.name.clone(),
                    distance_to_reference_km: distance_km.as_km(),
                    distance_display: distance_km.format_human(),
                    route: route.clone(),
                    score,
                    price_monthly: candidate.price_monthly,
                    rating: candidate.rating,
                    amenity_match_ratio: amenity_ratio,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.distance_to_reference_km
                        .partial_cmp(&b.distance_to_reference_km)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
        });

        scored
    }
}

/// Share of the required amenities the candidate offers, 1.0 when nothing is
/// required. Matching is case-insensitive.
pub fn amenity_match_ratio(offered: &[String], required: &[String]) -> f64 {
    if required.is_empty() {
        return 1.0;
    }
    let offered_lower: Vec<String> = offered.iter().map(|a| a.to_lowercase()).collect();
    let matched = required
        .iter()
        .filter(|r| offered_lower.contains(&r.to_lowercase()))
        .count();
    matched as f64 / required.len() as f64
}

fn passes_filters(candidate: &Candidate, filters: &SearchFilters, distance_km: f64) -> bool {
    if let Some(min_price) = filters.min_price {
        if candidate.price_monthly < min_price {
            return false;
        }
    }
    if let Some(max_price) = filters.max_price {
        if candidate.price_monthly > max_price {
            return false;
        }
    }
    if let Some(min_rating) = filters.min_rating {
        if candidate.rating < min_rating {
            return false;
        }
    }
    if let Some(max_distance) = filters.max_distance_km {
        if distance_km > max_distance {
            return false;
        }
    }
    if let Some(wanted) = filters.accommodation_type {
        if candidate.accommodation_type != Some(wanted) {
            return false;
        }
    }
    if let Some(wanted) = filters.room_type {
        if candidate.room_type != Some(wanted) {
            return false;
        }
    }
    if let Some(wanted) = filters.gender_policy {
        // Co-ed residences satisfy any gender preference
        match candidate.gender_policy {
            Some(policy) if policy == wanted || policy == GenderPolicy::Coed => {}
            _ => return false,
        }
    }
    if !filters.required_amenities.is_empty()
        && amenity_match_ratio(&candidate.amenities, &filters.required_amenities) < 1.0
    {
        return false;
    }
    true
}
