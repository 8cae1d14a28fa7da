use crate::models::{Coordinates, RouteOptions, RouteResult, TransportProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationType {
    Hostel,
    Pg,
    Flat,
    Dormitory,
}

impl fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccommodationType::Hostel => write!(f, "hostel"),
            AccommodationType::Pg => write!(f, "pg"),
            AccommodationType::Flat => write!(f, "flat"),
            AccommodationType::Dormitory => write!(f, "dormitory"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenderPolicy {
    Male,
    Female,
    Coed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Single,
    Shared,
    Studio,
}

/// A candidate residence as supplied by the orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub location: Coordinates,
    pub price_monthly: f64,
    /// Rating out of 5.
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation_type: Option<AccommodationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_policy: Option<GenderPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
}

/// Hard constraints applied before any scoring. A candidate violating any
/// populated filter is excluded outright, regardless of its score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub required_amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation_type: Option<AccommodationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_policy: Option<GenderPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// Campus or candidate residence the student measures distances from.
    pub reference_location: Coordinates,
    /// Current student position, when known. Contributes to scoring only.
    #[serde(default)]
    pub user_location: Option<Coordinates>,
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub profile: TransportProfile,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub options: RouteOptions,
}

/// One ranked search result. Transient per search; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub candidate_id: Uuid,
    pub name: String,
    pub distance_to_reference_km: f64,
    pub distance_display: String,
    pub route: RouteResult,
    /// Weighted cost; lower is better.
    pub score: f64,
    pub price_monthly: f64,
    pub rating: f64,
    pub amenity_match_ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_minimal_json() {
        let json = r#"{
            "reference_location": {"lat": 21.2181, "lng": 81.3248},
            "candidates": []
        }"#;
        let req: SearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.profile, TransportProfile::Walking);
        assert!(req.user_location.is_none());
        assert!(req.filters.max_price.is_none());
        assert!(!req.options.avoid_tolls);
    }

    #[test]
    fn candidate_json_round_trip() {
        let candidate = Candidate {
            id: Uuid::new_v4(),
            name: "Shanti Niwas PG".to_string(),
            location: Coordinates::new(21.2156, 81.3201).unwrap(),
            price_monthly: 4500.0,
            rating: 4.2,
            amenities: vec!["wifi".to_string(), "mess".to_string()],
            accommodation_type: Some(AccommodationType::Pg),
            gender_policy: Some(GenderPolicy::Female),
            room_type: Some(RoomType::Shared),
        };

        let json = serde_json::to_string(&candidate).unwrap();
        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, candidate.id);
        assert_eq!(back.accommodation_type, Some(AccommodationType::Pg));
        assert_eq!(back.amenities.len(), 2);
    }
}
