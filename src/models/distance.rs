use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Distance in kilometers
/// Prevents mixing up units and provides type safety
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub fn new(km: f64) -> Result<Self, String> {
        if km < 0.0 {
            return Err("Distance cannot be negative".to_string());
        }
        if !km.is_finite() {
            return Err("Distance must be a finite number".to_string());
        }
        Ok(DistanceKm(km))
    }

    /// Create from raw value without validation (use carefully)
    pub fn from_raw(km: f64) -> Self {
        DistanceKm(km)
    }

    pub fn from_meters(meters: f64) -> Self {
        DistanceKm(meters / 1000.0)
    }

    pub fn as_km(self) -> f64 {
        self.0
    }

    pub fn as_meters(self) -> f64 {
        self.0 * 1000.0
    }

    /// Human-readable rendering: sub-kilometer distances in meters, long
    /// distances in whole kilometers, one decimal in between.
    pub fn format_human(self) -> String {
        if self.0 < 1.0 {
            format!("{} m", (self.0 * 1000.0).round() as i64)
        } else if self.0 >= 10.0 {
            format!("{} km", self.0.round() as i64)
        } else {
            format!("{:.1} km", self.0)
        }
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}km", self.0)
    }
}

impl Add for DistanceKm {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        DistanceKm(self.0 + other.0)
    }
}

impl Sub for DistanceKm {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        DistanceKm(self.0 - other.0)
    }
}
