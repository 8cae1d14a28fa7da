pub mod directions;
pub mod navigation;
pub mod provider;
pub mod resolver;
pub mod scorer;

pub use directions::DirectionsClient;
pub use navigation::NavigationLinks;
pub use provider::RouteProvider;
pub use resolver::RouteResolver;
pub use scorer::RecommendationScorer;
