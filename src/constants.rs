//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that benefit from runtime experimentation (scoring
//! weights, TTLs), see [`Config`](crate::config::Config) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Geodesy ---

/// Mean Earth radius used by the haversine distance calculation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// --- Coordinate precision ---

/// Decimal places kept when sanitizing raw input coordinates (~0.1 m).
pub const SANITIZE_PRECISION_DECIMALS: u32 = 6;
/// Decimal places used in route cache keys (~11 m). Near-duplicate queries
/// collapse onto the same cache entry at this resolution.
pub const CACHE_KEY_PRECISION_DECIMALS: u32 = 4;

// --- Nominal fallback speeds (km/h) ---
// Used only for degraded local duration estimates when the routing provider
// is unavailable. Driving has no entry: a trafficless driving speed is not
// trustworthy, so the driving fallback reports an unknown duration.

/// Nominal walking speed.
pub const WALKING_SPEED_KMH: f64 = 5.0;
/// Nominal cycling speed.
pub const CYCLING_SPEED_KMH: f64 = 15.0;
/// Nominal transit speed, including stop dwell time.
pub const TRANSIT_SPEED_KMH: f64 = 20.0;

// --- Cache TTL defaults (seconds, used when env vars are absent) ---

/// Traffic-sensitive entries (driving/transit provider results): 30 minutes.
/// Congestion is volatile, so these go stale fast.
pub const DEFAULT_TRAFFIC_TTL_SECONDS: u64 = 1_800;
/// Static entries (walking/cycling): 24 hours. Road geometry rarely changes.
pub const DEFAULT_STATIC_TTL_SECONDS: u64 = 86_400;
/// Locally computed fallback entries: 10 minutes, so a healthy provider
/// response replaces the approximation soon.
pub const DEFAULT_FALLBACK_TTL_SECONDS: u64 = 600;

// --- Cache retention ---

/// Default maximum entry age for the cleanup sweep: 7 days. Entries older
/// than this are removed regardless of `expires_at`.
pub const DEFAULT_CACHE_MAX_AGE_SECONDS: u64 = 604_800;
/// Hit count at or above which an entry is considered hot and granted a
/// retention grace during cleanup.
pub const DEFAULT_HIT_PROMOTION_THRESHOLD: u64 = 5;
/// Age-grace multiplier applied to hot entries during cleanup.
pub const PROMOTED_MAX_AGE_MULTIPLIER: u32 = 2;
/// Keys processed per cleanup chunk, so a sweep never holds a cache shard
/// for the full duration.
pub const CLEANUP_CHUNK_SIZE: usize = 64;
/// Default interval between cleanup sweeps: 15 minutes.
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 900;

// --- Resolver ---

/// Default number of destinations resolved concurrently per batch. Bounded
/// to respect provider rate limits.
pub const DEFAULT_RESOLVE_BATCH_SIZE: usize = 5;
/// Default timeout for a single provider fetch (seconds). On expiry the
/// resolver falls back to a local estimate.
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 8;

// --- Congestion classification ---
// Ratio of traffic-adjusted duration to nominal duration.

/// Upper bound of the `Low` congestion band.
pub const CONGESTION_LOW_MAX_RATIO: f64 = 1.1;
/// Upper bound of the `Moderate` congestion band.
pub const CONGESTION_MODERATE_MAX_RATIO: f64 = 1.3;
/// Upper bound of the `Heavy` congestion band; anything above is `Severe`.
pub const CONGESTION_HEAVY_MAX_RATIO: f64 = 1.6;

// --- Scoring defaults ---

/// Divisor normalizing monthly price into the same magnitude as kilometers.
pub const PRICE_NORMALIZATION: f64 = 1000.0;

// --- Navigation links ---

/// Default host for generated map deep links.
pub const DEFAULT_MAPS_HOST: &str = "www.google.com/maps";
