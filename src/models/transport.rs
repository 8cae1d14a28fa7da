use crate::constants::{CYCLING_SPEED_KMH, TRANSIT_SPEED_KMH, WALKING_SPEED_KMH};
use crate::models::DistanceKm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportProfile {
    #[default]
    Walking,
    Cycling,
    Driving,
    Transit,
}

impl TransportProfile {
    /// Profile identifier sent to the external directions API.
    pub fn directions_profile(&self) -> &'static str {
        match self {
            TransportProfile::Walking => "walking",
            TransportProfile::Cycling => "cycling",
            TransportProfile::Driving => "driving-traffic",
            TransportProfile::Transit => "transit",
        }
    }

    /// Whether routes for this profile depend on live traffic. Determines
    /// which cache TTL a provider result receives.
    pub fn is_traffic_sensitive(&self) -> bool {
        matches!(self, TransportProfile::Driving | TransportProfile::Transit)
    }

    /// Nominal speed for degraded local estimation. `None` for driving:
    /// without live traffic data a driving speed is guesswork, so the
    /// fallback reports an unknown duration instead.
    pub fn nominal_speed_kmh(&self) -> Option<f64> {
        match self {
            TransportProfile::Walking => Some(WALKING_SPEED_KMH),
            TransportProfile::Cycling => Some(CYCLING_SPEED_KMH),
            TransportProfile::Transit => Some(TRANSIT_SPEED_KMH),
            TransportProfile::Driving => None,
        }
    }

    /// Straight-line travel-time estimate from the nominal speed table.
    pub fn estimated_duration(&self, distance: DistanceKm) -> Option<Duration> {
        self.nominal_speed_kmh()
            .map(|speed| Duration::from_secs_f64(distance.as_km() / speed * 3600.0))
    }
}

impl fmt::Display for TransportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProfile::Walking => write!(f, "walking"),
            TransportProfile::Cycling => write!(f, "cycling"),
            TransportProfile::Driving => write!(f, "driving"),
            TransportProfile::Transit => write!(f, "transit"),
        }
    }
}

impl FromStr for TransportProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" | "walking" => Ok(TransportProfile::Walking),
            "bike" | "cycling" | "bicycle" => Ok(TransportProfile::Cycling),
            "drive" | "driving" | "car" => Ok(TransportProfile::Driving),
            "transit" | "bus" => Ok(TransportProfile::Transit),
            _ => Err(format!("Invalid transport profile: '{}'", s)),
        }
    }
}
