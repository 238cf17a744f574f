mod api;
mod config;
mod error;
mod models;
mod services;

use crate::api::AppState;
use crate::config::Config;
use crate::services::{ClaudeClient, MusicCatalog, Recommender, SpotifyClient};
use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_playlist=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let timeout = Duration::from_secs(config.http_timeout_secs);

    // Initialize services
    let claude = Arc::new(ClaudeClient::new(
        config.anthropic_api_url.clone(),
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
        timeout,
    )?);
    let recommender = Recommender::new(claude, config.song_count);

    let catalog: Option<Arc<dyn MusicCatalog>> = match &config.spotify_auth {
        Some(auth) => {
            let spotify = SpotifyClient::new(
                &config.spotify_api_url,
                config.spotify_accounts_url.clone(),
                auth.clone(),
                timeout,
            )?;
            Some(Arc::new(spotify) as Arc<dyn MusicCatalog>)
        }
        None => {
            tracing::warn!("Spotify credentials not set, playlist creation is disabled");
            None
        }
    };

    let app_state = Arc::new(AppState {
        recommender,
        catalog,
    });

    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .cors_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    // Build router
    let app = api::app_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
