use super::AppState;
use crate::error::HandlerResult;
use crate::models::ProviderStatus;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

const PROBE_FAILED: &str = "Failed to connect to Claude API";

pub fn provider_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test-claude", get(test_provider))
        .route("/test-provider", get(test_provider))
}

/// Liveness check against the language model provider
async fn test_provider(State(state): State<Arc<AppState>>) -> HandlerResult<Json<ProviderStatus>> {
    state
        .recommender
        .check_availability()
        .await
        .map_err(|e| e.labeled(PROBE_FAILED))?;

    Ok(Json(ProviderStatus {
        status: "success".to_string(),
        message: "Claude API connection successful".to_string(),
    }))
}
