use crate::error::Result;
use crate::models::{Coordinates, RouteOptions, RouteResult, TransportProfile};
use async_trait::async_trait;

/// Contract the engine requires from a routing backend.
///
/// The backend is a replaceable external dependency. The resolver treats any
/// error uniformly as "provider failure" and degrades to a local estimate;
/// error subtypes are never special-cased.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn fetch_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: TransportProfile,
        options: &RouteOptions,
    ) -> Result<RouteResult>;
}
