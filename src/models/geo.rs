use crate::constants::SANITIZE_PRECISION_DECIMALS;
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Axis-aligned geofence for the configured service area.
///
/// Every coordinate accepted into the engine must pass [`Region::sanitize`];
/// downstream components rely on that invariant and do not re-validate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Region {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Region {
    pub fn contains(&self, c: &Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat)
            && (self.min_lng..=self.max_lng).contains(&c.lng)
    }

    /// Validate and normalize raw coordinate input.
    ///
    /// Rejects non-finite values, rounds to a fixed precision, and rejects
    /// points outside the region rather than clamping them.
    pub fn sanitize(&self, lat_raw: f64, lng_raw: f64) -> Result<Coordinates> {
        let coord = Coordinates::new(lat_raw, lng_raw)?.round(SANITIZE_PRECISION_DECIMALS);
        if !self.contains(&coord) {
            return Err(AppError::OutOfRegion(format!(
                "({:.4}, {:.4}) is outside the service area",
                coord.lat, coord.lng
            )));
        }
        Ok(coord)
    }

    /// Region grown by `padding_km` on every side. Used for map viewports
    /// only; validation always uses the strict bounds.
    pub fn expanded(&self, padding_km: f64) -> Region {
        let lat_delta = padding_km / 111.0;
        let mid_lat = (self.min_lat + self.max_lat) / 2.0;
        let lng_delta = if mid_lat.abs() > 85.0 {
            lat_delta
        } else {
            padding_km / (111.0 * mid_lat.to_radians().cos())
        };

        Region {
            min_lat: self.min_lat - lat_delta,
            max_lat: self.max_lat + lat_delta,
            min_lng: self.min_lng - lng_delta,
            max_lng: self.max_lng + lng_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_region() -> Region {
        Region {
            min_lat: 21.1,
            max_lat: 21.3,
            min_lng: 81.2,
            max_lng: 81.4,
        }
    }

    #[test]
    fn contains_center_and_edges() {
        let region = service_region();
        assert!(region.contains(&Coordinates::new(21.2181, 81.3248).unwrap()));
        assert!(region.contains(&Coordinates::new(21.1, 81.2).unwrap()));
        assert!(region.contains(&Coordinates::new(21.3, 81.4).unwrap()));
        assert!(!region.contains(&Coordinates::new(21.05, 81.30).unwrap()));
    }

    #[test]
    fn sanitize_accepts_center() {
        let coord = service_region().sanitize(21.2181, 81.3248).unwrap();
        assert_eq!(coord.lat, 21.2181);
        assert_eq!(coord.lng, 81.3248);
    }

    #[test]
    fn sanitize_rejects_out_of_region() {
        let err = service_region().sanitize(21.05, 81.30).unwrap_err();
        assert!(matches!(err, AppError::OutOfRegion(_)));
    }

    #[test]
    fn sanitize_rejects_non_finite() {
        let region = service_region();
        assert!(matches!(
            region.sanitize(f64::NAN, 81.3).unwrap_err(),
            AppError::InvalidCoordinate(_)
        ));
        assert!(matches!(
            region.sanitize(21.2, f64::INFINITY).unwrap_err(),
            AppError::InvalidCoordinate(_)
        ));
    }

    #[test]
    fn sanitize_rounds_to_fixed_precision() {
        let coord = service_region().sanitize(21.21813579, 81.32482468).unwrap();
        assert_eq!(coord.lat, 21.218136);
        assert_eq!(coord.lng, 81.324825);
    }

    #[test]
    fn expanded_grows_all_sides() {
        let region = service_region();
        let expanded = region.expanded(2.0);
        assert!(expanded.min_lat < region.min_lat);
        assert!(expanded.max_lat > region.max_lat);
        assert!(expanded.min_lng < region.min_lng);
        assert!(expanded.max_lng > region.max_lng);

        // Display padding must not loosen validation
        assert!(!region.contains(&Coordinates::new(21.09, 81.3).unwrap()));
        assert!(expanded.contains(&Coordinates::new(21.09, 81.3).unwrap()));
    }
}
