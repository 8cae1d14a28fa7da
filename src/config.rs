use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Region};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub directions_api_key: String,
    /// Optional proxy base URL; when set the directions client authenticates
    /// with a bearer header instead of a token query param.
    pub directions_base_url: Option<String>,
    pub maps_host: String,
    pub region: RegionConfig,
    pub cache: CacheConfig,
    pub resolver: ResolverConfig,
    pub scoring: ScoringConfig,
}

/// Service region supplied by deployment configuration, so the same engine
/// can serve a different city without a code change.
#[derive(Debug, Clone)]
pub struct RegionConfig {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub center_lat: f64,
    pub center_lng: f64,
}

impl RegionConfig {
    pub fn from_env() -> Result<Self> {
        let cfg = Self {
            min_lat: require_parsed("REGION_MIN_LAT")?,
            max_lat: require_parsed("REGION_MAX_LAT")?,
            min_lng: require_parsed("REGION_MIN_LNG")?,
            max_lng: require_parsed("REGION_MAX_LNG")?,
            center_lat: require_parsed("REGION_CENTER_LAT")?,
            center_lng: require_parsed("REGION_CENTER_LNG")?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.min_lat >= self.max_lat || self.min_lng >= self.max_lng {
            return Err(AppError::Internal(
                "Region bounds are inverted or empty".to_string(),
            ));
        }
        let region = self.region();
        let center = self.center()?;
        if !region.contains(&center) {
            return Err(AppError::Internal(
                "Region center lies outside the region bounds".to_string(),
            ));
        }
        Ok(())
    }

    pub fn region(&self) -> Region {
        Region {
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lng: self.min_lng,
            max_lng: self.max_lng,
        }
    }

    pub fn center(&self) -> Result<Coordinates> {
        Coordinates::new(self.center_lat, self.center_lng)
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for traffic-sensitive provider results (driving/transit).
    pub traffic_ttl: Duration,
    /// TTL for static provider results (walking/cycling).
    pub static_ttl: Duration,
    /// TTL for degraded locally-computed results.
    pub fallback_ttl: Duration,
    /// Maximum entry age enforced by the cleanup sweep.
    pub max_age: Duration,
    /// Hit count at which an entry earns a retention grace during cleanup.
    pub hit_promotion_threshold: u64,
    /// Interval between cleanup sweeps.
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            traffic_ttl: Duration::from_secs(DEFAULT_TRAFFIC_TTL_SECONDS),
            static_ttl: Duration::from_secs(DEFAULT_STATIC_TTL_SECONDS),
            fallback_ttl: Duration::from_secs(DEFAULT_FALLBACK_TTL_SECONDS),
            max_age: Duration::from_secs(DEFAULT_CACHE_MAX_AGE_SECONDS),
            hit_promotion_threshold: DEFAULT_HIT_PROMOTION_THRESHOLD,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECONDS),
        }
    }
}

impl CacheConfig {
    /// TTL policy: fallback estimates expire fastest, traffic-sensitive
    /// provider results fast, static geometry slow.
    pub fn ttl_for(
        &self,
        profile: crate::models::TransportProfile,
        source: crate::models::RouteSource,
    ) -> Duration {
        if source == crate::models::RouteSource::Fallback {
            self.fallback_ttl
        } else if profile.is_traffic_sensitive() {
            self.traffic_ttl
        } else {
            self.static_ttl
        }
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            traffic_ttl: Duration::from_secs(parsed_or(
                "CACHE_TRAFFIC_TTL_SECONDS",
                defaults.traffic_ttl.as_secs(),
            )?),
            static_ttl: Duration::from_secs(parsed_or(
                "CACHE_STATIC_TTL_SECONDS",
                defaults.static_ttl.as_secs(),
            )?),
            fallback_ttl: Duration::from_secs(parsed_or(
                "CACHE_FALLBACK_TTL_SECONDS",
                defaults.fallback_ttl.as_secs(),
            )?),
            max_age: Duration::from_secs(parsed_or(
                "CACHE_MAX_AGE_SECONDS",
                defaults.max_age.as_secs(),
            )?),
            hit_promotion_threshold: parsed_or(
                "CACHE_HIT_PROMOTION_THRESHOLD",
                defaults.hit_promotion_threshold,
            )?,
            cleanup_interval: Duration::from_secs(parsed_or(
                "CACHE_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval.as_secs(),
            )?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Destinations resolved concurrently per batch in `resolve_many`.
    pub batch_size: usize,
    /// Upper bound on a single provider fetch before falling back.
    pub provider_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_RESOLVE_BATCH_SIZE,
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let batch_size: usize = parsed_or("RESOLVE_BATCH_SIZE", defaults.batch_size)?;
        if batch_size == 0 {
            return Err(AppError::Internal(
                "RESOLVE_BATCH_SIZE must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            batch_size,
            provider_timeout: Duration::from_secs(parsed_or(
                "PROVIDER_TIMEOUT_SECONDS",
                defaults.provider_timeout.as_secs(),
            )?),
        })
    }
}

/// Weights for the multi-criteria recommendation score. Carried over from the
/// legacy 40/20/20/10/10 split; tunable rather than re-derived since the
/// original does not document a rationale.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weight_reference_distance: f64,
    pub weight_user_distance: f64,
    pub weight_price: f64,
    pub weight_rating: f64,
    pub weight_amenities: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weight_reference_distance: 0.4,
            weight_user_distance: 0.2,
            weight_price: 0.2,
            weight_rating: 0.1,
            weight_amenities: 0.1,
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            weight_reference_distance: parsed_or(
                "SCORE_WEIGHT_REFERENCE_DISTANCE",
                defaults.weight_reference_distance,
            )?,
            weight_user_distance: parsed_or(
                "SCORE_WEIGHT_USER_DISTANCE",
                defaults.weight_user_distance,
            )?,
            weight_price: parsed_or("SCORE_WEIGHT_PRICE", defaults.weight_price)?,
            weight_rating: parsed_or("SCORE_WEIGHT_RATING", defaults.weight_rating)?,
            weight_amenities: parsed_or("SCORE_WEIGHT_AMENITIES", defaults.weight_amenities)?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| AppError::Internal("Invalid PORT".to_string()))?,
            directions_api_key: env::var("DIRECTIONS_API_KEY")
                .map_err(|_| AppError::Internal("DIRECTIONS_API_KEY must be set".to_string()))?,
            directions_base_url: env::var("DIRECTIONS_BASE_URL").ok(),
            maps_host: env::var("MAPS_HOST").unwrap_or_else(|_| DEFAULT_MAPS_HOST.to_string()),
            region: RegionConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            resolver: ResolverConfig::from_env()?,
            scoring: ScoringConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn require_parsed<T: std::str::FromStr>(var: &str) -> Result<T> {
    env::var(var)
        .map_err(|_| AppError::Internal(format!("{} must be set", var)))?
        .parse()
        .map_err(|_| AppError::Internal(format!("Invalid {}", var)))
}

fn parsed_or<T: std::str::FromStr + ToString>(var: &str, default: T) -> Result<T> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Internal(format!("Invalid {}", var)))
}
