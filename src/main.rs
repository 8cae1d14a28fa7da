use axum::Router;
use stayfinder::cache::RouteCache;
use stayfinder::config::Config;
use stayfinder::services::directions::{AuthMode, DirectionsClient};
use stayfinder::services::{NavigationLinks, RecommendationScorer, RouteProvider, RouteResolver};
use stayfinder::AppState;
use std::sync::Arc;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stayfinder=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Stayfinder search engine");
    tracing::info!(
        region = ?config.region.region(),
        "Configuration loaded successfully"
    );

    // One shared cache instance; constructed here, never a global
    let cache = Arc::new(RouteCache::new(config.cache.hit_promotion_threshold));

    // Periodic retention sweep, independent of request-serving tasks
    {
        let cache = Arc::clone(&cache);
        let max_age = config.cache.max_age;
        let mut interval = tokio::time::interval(config.cache.cleanup_interval);
        tokio::spawn(async move {
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                cache.cleanup(max_age, OffsetDateTime::now_utc());
            }
        });
    }

    let provider: Arc<dyn RouteProvider> = if let Some(ref base_url) = config.directions_base_url {
        Arc::new(DirectionsClient::with_config(
            config.directions_api_key.clone(),
            base_url.clone(),
            AuthMode::BearerHeader,
        ))
    } else {
        Arc::new(DirectionsClient::new(config.directions_api_key.clone()))
    };

    let resolver = RouteResolver::new(
        Arc::clone(&cache),
        provider,
        config.cache.clone(),
        config.resolver.clone(),
    );
    let scorer = RecommendationScorer::new(config.scoring.clone());
    let navigation = NavigationLinks::new(config.maps_host.clone(), config.region.region());

    // Create application state
    let state = Arc::new(AppState {
        cache,
        resolver,
        scorer,
        navigation,
        region: config.region.region(),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", stayfinder::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
