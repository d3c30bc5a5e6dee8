use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_api::{
    cache::CacheService, config::Config, controllers, database::Database,
    redis_client::RedisClient, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema booking API ({})", config.app.environment);

    let db = Database::new(&config.database).await?;
    info!("Database connected");

    db.run_migrations().await?;

    let redis = RedisClient::new(&config.redis.url).await?;
    info!("Redis connected");

    let cache = CacheService::new(redis.clone(), db.clone(), config.redis.listing_ttl_secs);

    let app_state = Arc::new(AppState {
        db,
        redis,
        cache,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/", get(|| async { "Cinema booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.app.host, config.app.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
