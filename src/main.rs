mod aggregator;
mod cache;
mod config;
mod fetcher;
mod model;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::aggregator::Aggregator;
use crate::cache::{SnapshotCache, SystemClock};
use crate::config::Config;
use crate::fetcher::HttpFetcher;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_brief=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load_or_default("sections.toml")?;
    info!("Loaded {} sections from configuration", config.sections.len());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.port);

    // Wire up the cache with its collaborators
    let fetcher = Arc::new(HttpFetcher::new()?);
    let aggregator = Aggregator::new(fetcher, config.fetch_delay());
    let cache = Arc::new(SnapshotCache::new(
        Arc::new(SystemClock),
        config.timezone()?,
        aggregator,
        config.sections.clone(),
    ));

    // Background warmer: builds each new day's snapshot ahead of the
    // first request. Refresh stays request-triggered otherwise.
    let warm_cache = cache.clone();
    let warm_interval = Duration::from_secs(config.refresh_interval * 60);
    tokio::spawn(async move {
        cache::keep_warm(warm_cache, warm_interval).await;
    });

    // Create app state
    let state = Arc::new(AppState { cache });

    // Build router
    let app = Router::new()
        .route("/", get(routes::index))
        .route("/api/news", get(routes::news))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Daily Brief backend running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
