pub mod playlists;
pub mod provider;

use crate::services::{MusicCatalog, Recommender};
use axum::Router;
use std::sync::Arc;

pub use playlists::playlist_routes;
pub use provider::provider_routes;

pub struct AppState {
    pub recommender: Recommender,
    /// Absent when no Spotify token is configured
    pub catalog: Option<Arc<dyn MusicCatalog>>,
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(playlist_routes())
        .merge(provider_routes())
        .with_state(state)
}
