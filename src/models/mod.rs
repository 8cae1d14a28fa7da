pub mod candidate;
pub mod coordinates;
pub mod distance;
pub mod geo;
pub mod route;
pub mod transport;

pub use candidate::{
    AccommodationType, Candidate, GenderPolicy, RoomType, ScoredCandidate, SearchFilters,
    SearchRequest, SearchResponse,
};
pub use coordinates::Coordinates;
pub use distance::DistanceKm;
pub use geo::Region;
pub use route::{CongestionLevel, RouteOptions, RouteResult, RouteSource, RouteStep};
pub use transport::TransportProfile;
