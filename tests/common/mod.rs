use async_trait::async_trait;
use stayfinder::cache::RouteCache;
use stayfinder::config::{CacheConfig, ResolverConfig, ScoringConfig};
use stayfinder::constants::DEFAULT_MAPS_HOST;
use stayfinder::error::Result;
use stayfinder::models::{
    CongestionLevel, Coordinates, Region, RouteOptions, RouteResult, RouteSource,
    TransportProfile,
};
use stayfinder::services::{
    NavigationLinks, RecommendationScorer, RouteProvider, RouteResolver,
};
use stayfinder::AppState;
use std::sync::Arc;

/// Service region used across integration tests (Bhilai / Durg).
#[allow(dead_code)]
pub fn test_region() -> Region {
    Region {
        min_lat: 21.1,
        max_lat: 21.3,
        min_lng: 81.2,
        max_lng: 81.4,
    }
}

/// Provider stub returning a plausible road route: haversine distance with a
/// 25% detour factor and a speed-table duration.
pub struct StubProvider;

#[async_trait]
impl RouteProvider for StubProvider {
    async fn fetch_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
        _options: &RouteOptions,
    ) -> Result<RouteResult> {
        let crow_flies = origin.distance_to(destination);
        let road_meters = crow_flies.as_meters() * 1.25;
        let speed_kmh = profile.nominal_speed_kmh().unwrap_or(30.0);
        let nominal = road_meters / 1000.0 / speed_kmh * 3600.0;

        Ok(RouteResult {
            distance_meters: road_meters,
            nominal_duration_seconds: Some(nominal),
            traffic_duration_seconds: profile.is_traffic_sensitive().then_some(nominal * 1.2),
            congestion: CongestionLevel::from_durations(
                Some(nominal),
                profile.is_traffic_sensitive().then_some(nominal * 1.2),
            ),
            source: RouteSource::Provider,
            steps: vec![],
        })
    }
}

/// Provider stub simulating a total backend outage.
pub struct OutageProvider;

#[async_trait]
impl RouteProvider for OutageProvider {
    async fn fetch_route(
        &self,
        _origin: &Coordinates,
        _destination: &Coordinates,
        _profile: TransportProfile,
        _options: &RouteOptions,
    ) -> Result<RouteResult> {
        Err(stayfinder::AppError::Provider(
            "connection refused".to_string(),
        ))
    }
}

#[allow(dead_code)]
pub fn setup_test_app(provider: Arc<dyn RouteProvider>) -> axum::Router {
    let region = test_region();
    let cache = Arc::new(RouteCache::new(5));
    let resolver = RouteResolver::new(
        Arc::clone(&cache),
        provider,
        CacheConfig::default(),
        ResolverConfig::default(),
    );

    let state = Arc::new(AppState {
        cache,
        resolver,
        scorer: RecommendationScorer::new(ScoringConfig::default()),
        navigation: NavigationLinks::new(DEFAULT_MAPS_HOST.to_string(), region),
        region,
    });

    stayfinder::routes::create_router(state)
}

/// JSON body for one candidate residence.
#[allow(dead_code)]
pub fn candidate_json(
    name: &str,
    lat: f64,
    lng: f64,
    price: f64,
    rating: f64,
    amenities: &[&str],
) -> serde_json::Value {
    serde_json::json!({
        "id": uuid::Uuid::new_v4(),
        "name": name,
        "location": {"lat": lat, "lng": lng},
        "price_monthly": price,
        "rating": rating,
        "amenities": amenities,
    })
}
