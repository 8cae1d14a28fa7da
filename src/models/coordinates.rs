use crate::constants::EARTH_RADIUS_KM;
use crate::error::{AppError, Result};
use crate::models::DistanceKm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(AppError::InvalidCoordinate(format!(
                "Coordinates must be finite numbers, got ({}, {})",
                lat, lng
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidCoordinate(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidCoordinate(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            )));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Great-circle distance to another point via the haversine formula.
    pub fn distance_to(&self, other: &Coordinates) -> DistanceKm {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        DistanceKm::from_raw(EARTH_RADIUS_KM * c)
    }

    /// Initial bearing towards another point, in degrees [0, 360).
    pub fn bearing_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let y = delta_lng.sin() * lat2_rad.cos();
        let x = lat1_rad.cos() * lat2_rad.sin()
            - lat1_rad.sin() * lat2_rad.cos() * delta_lng.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Round coordinates to the given number of decimal places. Used for
    /// input sanitizing and cache-key fingerprinting.
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }
}
