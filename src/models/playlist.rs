use super::Recipe;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRequest {
    pub recipe: Recipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub playlist_name: String,
    pub songs: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistRequest {
    pub recipe: Recipe,
    /// Overrides the name derived from the recipe
    pub playlist_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub playlist: Playlist,
    pub tracks: Vec<ResolvedTrack>,
    pub message: String,
}

/// A song suggestion matched to a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
}

/// Playlist as handed back to the caller after the provider created it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub url: String,
    pub track_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub status: String,
    pub message: String,
}
