use crate::cache::{CacheEntry, RouteCache, RouteKey};
use crate::config::{CacheConfig, ResolverConfig};
use crate::models::{
    CongestionLevel, Coordinates, RouteOptions, RouteResult, RouteSource, TransportProfile,
};
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::broadcast;

use super::provider::RouteProvider;

/// Orchestrates route resolution: cache check, provider fetch on miss or
/// expiry, degraded local estimate on provider failure, write-through.
///
/// Resolution never errors. A provider outage surfaces only as
/// `source: Fallback` on the returned result.
pub struct RouteResolver {
    cache: Arc<RouteCache>,
    provider: Arc<dyn RouteProvider>,
    cache_config: CacheConfig,
    config: ResolverConfig,
    /// In-flight fetches by key. Concurrent resolutions of the same uncached
    /// key wait on the first caller's broadcast instead of issuing duplicate
    /// provider calls.
    in_flight: DashMap<RouteKey, broadcast::Sender<RouteResult>>,
}

enum FlightSlot {
    /// This caller fetches and broadcasts when done.
    Leader(broadcast::Sender<RouteResult>),
    /// Another caller is already fetching this key; wait for its result.
    Follower(broadcast::Receiver<RouteResult>),
}

/// Removes the in-flight entry when dropped. The leader future can be
/// cancelled at any await point (a client disconnect drops the handler), and
/// an orphaned entry would otherwise park every later resolve of the key on
/// a channel that never fires. Dropping the entry closes the channel, so
/// waiting followers observe `RecvError::Closed` and degrade locally.
struct FlightGuard<'a> {
    in_flight: &'a DashMap<RouteKey, broadcast::Sender<RouteResult>>,
    key: RouteKey,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

impl RouteResolver {
    pub fn new(
        cache: Arc<RouteCache>,
        provider: Arc<dyn RouteProvider>,
        cache_config: CacheConfig,
        config: ResolverConfig,
    ) -> Self {
        RouteResolver {
            cache,
            provider,
            cache_config,
            config,
            in_flight: DashMap::new(),
        }
    }

    /// Resolve one origin-destination pair.
    ///
    /// Coordinates are assumed in-region; sanitizing happened at the edge.
    pub async fn resolve(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
        options: &RouteOptions,
    ) -> RouteResult {
        let key = RouteKey::new(origin, destination, profile, options.avoid_tolls);
        let now = OffsetDateTime::now_utc();

        if let Some(entry) = self.cache.get(&key, now) {
            if entry.is_valid(now) {
                // Hit path never touches the provider
                self.cache.record_hit(&key, now);
                return entry.route.clone();
            }
        }

        match self.register_flight(key) {
            FlightSlot::Leader(tx) => {
                let guard = FlightGuard {
                    in_flight: &self.in_flight,
                    key,
                };
                let route = self
                    .fetch_or_fallback(origin, destination, profile, options)
                    .await;

                let ttl = self.cache_config.ttl_for(profile, route.source);
                self.cache
                    .put(CacheEntry::new(key, route.clone(), OffsetDateTime::now_utc(), ttl));

                // Entry comes out before the broadcast so late arrivals start
                // a fresh flight instead of following a finished one
                drop(guard);
                // Waiters may have given up; a send error is fine
                let _ = tx.send(route.clone());
                route
            }
            FlightSlot::Follower(mut rx) => match rx.recv().await {
                Ok(route) => {
                    tracing::debug!(key = %key, "Joined in-flight resolution");
                    route
                }
                // Leader dropped without broadcasting; degrade locally
                Err(_) => self.fallback_route(origin, destination, profile),
            },
        }
    }

    /// Resolve one origin against many destinations.
    ///
    /// Destinations are processed in bounded batches to respect provider
    /// rate limits; a failure for one destination degrades that result only
    /// and never aborts the rest. Output order matches input order.
    pub async fn resolve_many(
        &self,
        origin: &Coordinates,
        destinations: &[Coordinates],
        profile: TransportProfile,
        options: &RouteOptions,
    ) -> Vec<RouteResult> {
        let mut results = Vec::with_capacity(destinations.len());
        for batch in destinations.chunks(self.config.batch_size) {
            let resolved = futures::future::join_all(
                batch
                    .iter()
                    .map(|dest| self.resolve(origin, dest, profile, options)),
            )
            .await;
            results.extend(resolved);
        }
        results
    }

    /// Atomic check-and-insert on the in-flight map. Entry API avoids the
    /// check-then-insert race; no await happens while the shard is held.
    fn register_flight(&self, key: RouteKey) -> FlightSlot {
        match self.in_flight.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                FlightSlot::Follower(entry.get().subscribe())
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let (tx, _rx) = broadcast::channel(16);
                entry.insert(tx.clone());
                FlightSlot::Leader(tx)
            }
        }
    }

    async fn fetch_or_fallback(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
        options: &RouteOptions,
    ) -> RouteResult {
        let fetch = self
            .provider
            .fetch_route(origin, destination, profile, options);

        match tokio::time::timeout(self.config.provider_timeout, fetch).await {
            Ok(Ok(route)) => route,
            Ok(Err(e)) => {
                tracing::warn!(
                    profile = %profile,
                    "Provider failed, using local estimate: {}",
                    e
                );
                self.fallback_route(origin, destination, profile)
            }
            Err(_) => {
                tracing::warn!(
                    profile = %profile,
                    timeout_s = self.config.provider_timeout.as_secs(),
                    "Provider timed out, using local estimate"
                );
                self.fallback_route(origin, destination, profile)
            }
        }
    }

    /// Degraded estimate from straight-line distance and the nominal speed
    /// table. A value, not a failure.
    fn fallback_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
    ) -> RouteResult {
        let distance = origin.distance_to(destination);
        let nominal = profile
            .estimated_duration(distance)
            .map(|d| d.as_secs_f64());

        RouteResult {
            distance_meters: distance.as_meters(),
            nominal_duration_seconds: nominal,
            traffic_duration_seconds: None,
            congestion: CongestionLevel::Unknown,
            source: RouteSource::Fallback,
            steps: vec![],
        }
    }
}
