use crate::error::{AppError, Result};
use crate::models::{Coordinates, Region};

/// Deep-link builder for an external map-navigation application.
///
/// Refuses to produce links for coordinates outside the service region, so a
/// stale or forged coordinate can never leak into a shared URL.
pub struct NavigationLinks {
    maps_host: String,
    region: Region,
}

impl NavigationLinks {
    pub fn new(maps_host: String, region: Region) -> Self {
        Self { maps_host, region }
    }

    /// Link that drops a search pin on the coordinate.
    pub fn search_url(&self, location: &Coordinates) -> Result<String> {
        self.check_region(location)?;
        Ok(format!(
            "https://{}/search/?api=1&query={}",
            self.maps_host,
            urlencoding::encode(&format!("{},{}", location.lat, location.lng))
        ))
    }

    /// Link that starts turn-by-turn navigation to the coordinate.
    pub fn directions_url(&self, destination: &Coordinates) -> Result<String> {
        self.check_region(destination)?;
        Ok(format!(
            "https://{}/dir/?api=1&destination={}",
            self.maps_host,
            urlencoding::encode(&format!("{},{}", destination.lat, destination.lng))
        ))
    }

    fn check_region(&self, location: &Coordinates) -> Result<()> {
        if !self.region.contains(location) {
            return Err(AppError::OutOfRegion(format!(
                "({:.4}, {:.4}) is outside the service area",
                location.lat, location.lng
            )));
        }
        Ok(())
    }
}
