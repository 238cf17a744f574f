pub mod playlist;
pub mod recipe;

pub use playlist::{
    CatalogUser, CreatePlaylistRequest, CreatePlaylistResponse, Playlist, PlaylistRequest,
    PlaylistResponse, ProviderStatus, ResolvedTrack,
};
pub use recipe::{Difficulty, Recipe};
