use crate::error::{AppError, Result};
use crate::models::{
    CongestionLevel, Coordinates, RouteOptions, RouteResult, RouteSource, RouteStep,
    TransportProfile,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;

use super::provider::RouteProvider;

const DIRECTIONS_BASE_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

/// How the client authenticates with the directions API.
#[derive(Clone, Debug)]
pub enum AuthMode {
    /// Current default: send `access_token` query param (direct API access).
    DirectToken,
    /// Proxy mode: send `Authorization: Bearer` header.
    BearerHeader,
}

/// Reqwest-backed [`RouteProvider`] against a Mapbox-style directions API.
#[derive(Clone)]
pub struct DirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    auth_mode: AuthMode,
}

impl DirectionsClient {
    pub fn new(api_key: String) -> Self {
        DirectionsClient {
            client: Client::new(),
            api_key,
            base_url: DIRECTIONS_BASE_URL.to_string(),
            auth_mode: AuthMode::DirectToken,
        }
    }

    pub fn with_config(api_key: String, base_url: String, auth_mode: AuthMode) -> Self {
        DirectionsClient {
            client: Client::new(),
            api_key,
            base_url,
            auth_mode,
        }
    }
}

#[async_trait]
impl RouteProvider for DirectionsClient {
    async fn fetch_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
        options: &RouteOptions,
    ) -> Result<RouteResult> {
        // Coordinates go on the path as "lng,lat;lng,lat"
        let url = format!(
            "{}/{}/{},{};{},{}",
            self.base_url,
            profile.directions_profile(),
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat
        );

        tracing::debug!(
            profile = %profile.directions_profile(),
            "Directions API request"
        );

        let mut request = self.client.get(&url).query(&[
            ("overview", "false"),
            ("steps", "true"),
            ("annotations", "duration"),
        ]);

        if options.avoid_tolls {
            request = request.query(&[("exclude", "toll")]);
        }
        if let Some(depart_at) = options.depart_at {
            let formatted = depart_at
                .format(&Rfc3339)
                .map_err(|e| AppError::Provider(format!("Invalid departure time: {}", e)))?;
            request = request.query(&[("depart_at", formatted.as_str())]);
        }

        match self.auth_mode {
            AuthMode::DirectToken => {
                request = request.query(&[("access_token", &self.api_key)]);
            }
            AuthMode::BearerHeader => {
                request = request.bearer_auth(&self.api_key);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "Directions API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::Provider(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: DirectionsApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse response: {}", e)))?;

        let route = directions
            .routes
            .first()
            .ok_or_else(|| AppError::Provider("No routes found".to_string()))?;

        Ok(build_result(route, profile))
    }
}

fn build_result(route: &ApiRoute, profile: TransportProfile) -> RouteResult {
    // Traffic-aware profiles report `duration` under live traffic and
    // `duration_typical` without it; static profiles only have `duration`.
    let (nominal, traffic) = if profile.is_traffic_sensitive() {
        (
            route.duration_typical.or(Some(route.duration)),
            Some(route.duration),
        )
    } else {
        (Some(route.duration), None)
    };

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| &leg.steps)
        .map(|step| RouteStep {
            instruction: step.maneuver.instruction.clone(),
            distance_meters: step.distance,
        })
        .collect();

    tracing::debug!(
        distance_km = %format!("{:.2}", route.distance / 1000.0),
        duration_min = %format!("{:.0}", route.duration / 60.0),
        "Directions API response"
    );

    RouteResult {
        distance_meters: route.distance,
        nominal_duration_seconds: nominal,
        traffic_duration_seconds: traffic,
        congestion: CongestionLevel::from_durations(nominal, traffic),
        source: RouteSource::Provider,
        steps,
    }
}

// Directions API response types

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    routes: Vec<ApiRoute>,
    #[allow(dead_code)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    distance: f64, // meters
    duration: f64, // seconds
    duration_typical: Option<f64>,
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    distance: f64,
    maneuver: ApiManeuver,
}

#[derive(Debug, Deserialize)]
struct ApiManeuver {
    instruction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_direct_token() {
        let client = DirectionsClient::new("pk.test123".to_string());
        assert_eq!(client.base_url, DIRECTIONS_BASE_URL);
        assert!(matches!(client.auth_mode, AuthMode::DirectToken));
    }

    #[test]
    fn with_config_bearer_mode() {
        let client = DirectionsClient::with_config(
            "my-key".to_string(),
            "http://localhost:4000/v1/directions".to_string(),
            AuthMode::BearerHeader,
        );
        assert_eq!(client.base_url, "http://localhost:4000/v1/directions");
        assert!(matches!(client.auth_mode, AuthMode::BearerHeader));
    }

    #[test]
    fn traffic_profile_splits_durations() {
        let api_route = ApiRoute {
            distance: 5240.0,
            duration: 1320.0,
            duration_typical: Some(1000.0),
            legs: vec![],
        };

        let result = build_result(&api_route, TransportProfile::Driving);
        assert_eq!(result.nominal_duration_seconds, Some(1000.0));
        assert_eq!(result.traffic_duration_seconds, Some(1320.0));
        // ratio 1.32 sits above the 1.3 moderate cutoff
        assert_eq!(result.congestion, CongestionLevel::Heavy);
        assert_eq!(result.source, RouteSource::Provider);
    }

    #[test]
    fn static_profile_has_no_traffic_duration() {
        let api_route = ApiRoute {
            distance: 550.0,
            duration: 396.0,
            duration_typical: None,
            legs: vec![],
        };

        let result = build_result(&api_route, TransportProfile::Walking);
        assert_eq!(result.nominal_duration_seconds, Some(396.0));
        assert_eq!(result.traffic_duration_seconds, None);
        assert_eq!(result.congestion, CongestionLevel::Unknown);
    }

    #[test]
    fn steps_flatten_across_legs() {
        let json = r#"{
            "routes": [{
                "distance": 1200.0,
                "duration": 900.0,
                "legs": [{
                    "steps": [
                        {"distance": 700.0, "maneuver": {"instruction": "Head north"}},
                        {"distance": 500.0, "maneuver": {"instruction": "Turn right"}}
                    ]
                }]
            }],
            "code": "Ok"
        }"#;
        let parsed: DirectionsApiResponse = serde_json::from_str(json).unwrap();
        let result = build_result(&parsed.routes[0], TransportProfile::Walking);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].instruction, "Head north");
        assert_eq!(result.steps[1].distance_meters, 500.0);
    }
}
