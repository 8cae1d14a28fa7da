use crate::constants::{
    CONGESTION_HEAVY_MAX_RATIO, CONGESTION_LOW_MAX_RATIO, CONGESTION_MODERATE_MAX_RATIO,
};
use crate::models::DistanceKm;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where a route result came from. `Fallback` marks a degraded local
/// estimate produced while the routing provider was unavailable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    Provider,
    Fallback,
}

/// Discretized slowdown of a route under live traffic versus its nominal
/// duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Moderate,
    Heavy,
    Severe,
    Unknown,
}

impl CongestionLevel {
    /// Classify from nominal and traffic-adjusted durations. `Unknown` when
    /// either half is missing or nonsensical.
    pub fn from_durations(nominal_seconds: Option<f64>, traffic_seconds: Option<f64>) -> Self {
        let (nominal, traffic) = match (nominal_seconds, traffic_seconds) {
            (Some(n), Some(t)) if n > 0.0 && t >= 0.0 => (n, t),
            _ => return CongestionLevel::Unknown,
        };

        let ratio = traffic / nominal;
        if ratio <= CONGESTION_LOW_MAX_RATIO {
            CongestionLevel::Low
        } else if ratio <= CONGESTION_MODERATE_MAX_RATIO {
            CongestionLevel::Moderate
        } else if ratio <= CONGESTION_HEAVY_MAX_RATIO {
            CongestionLevel::Heavy
        } else {
            CongestionLevel::Severe
        }
    }
}

/// One maneuver of a provider route. Optional detail; fallback results carry
/// no steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance_meters: f64,
    /// Trafficless travel time. Absent only for degraded driving estimates,
    /// which have no trustworthy nominal speed.
    pub nominal_duration_seconds: Option<f64>,
    /// Travel time under live traffic, when the provider supplies one.
    pub traffic_duration_seconds: Option<f64>,
    pub congestion: CongestionLevel,
    pub source: RouteSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<RouteStep>,
}

impl RouteResult {
    pub fn distance_km(&self) -> DistanceKm {
        DistanceKm::from_meters(self.distance_meters)
    }

    /// Best available duration: traffic-adjusted when present, nominal
    /// otherwise.
    pub fn effective_duration_seconds(&self) -> Option<f64> {
        self.traffic_duration_seconds
            .or(self.nominal_duration_seconds)
    }

    pub fn is_degraded(&self) -> bool {
        self.source == RouteSource::Fallback
    }
}

/// Caller preferences forwarded to the routing provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    #[serde(default)]
    pub avoid_tolls: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub depart_at: Option<OffsetDateTime>,
}
