use crate::constants::CACHE_KEY_PRECISION_DECIMALS;
use crate::models::{Coordinates, TransportProfile};
use std::fmt;

/// Deterministic fingerprint of a route request.
///
/// Coordinates are rounded to a fixed precision (~11 m) before keying so that
/// near-duplicate queries collapse onto the same cache entry. Stored as
/// scaled integers to keep `Eq`/`Hash` exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    origin_lat: i64,
    origin_lng: i64,
    dest_lat: i64,
    dest_lng: i64,
    profile: TransportProfile,
    avoid_tolls: bool,
}

impl RouteKey {
    pub fn new(
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
        avoid_tolls: bool,
    ) -> Self {
        let scale = 10_f64.powi(CACHE_KEY_PRECISION_DECIMALS as i32);
        RouteKey {
            origin_lat: (origin.lat * scale).round() as i64,
            origin_lng: (origin.lng * scale).round() as i64,
            dest_lat: (destination.lat * scale).round() as i64,
            dest_lng: (destination.lng * scale).round() as i64,
            profile,
            avoid_tolls,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "route:{}:{}:{}:{}:{}:{}",
            self.origin_lat,
            self.origin_lng,
            self.dest_lat,
            self.dest_lng,
            self.profile,
            if self.avoid_tolls { "notolls" } else { "tolls" }
        )
    }
}
