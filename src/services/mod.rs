pub mod catalog_matcher;
pub mod claude;
pub mod playlist_assembler;
pub mod recommender;
pub mod song_parser;
pub mod spotify;

#[cfg(test)]
pub mod fakes;

pub use claude::{ClaudeClient, TextGenerator};
pub use recommender::Recommender;
pub use spotify::{CreatedPlaylist, MusicCatalog, SpotifyClient};
