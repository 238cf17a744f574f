//! In-memory providers for tests.

use super::{CreatedPlaylist, MusicCatalog, TextGenerator};
use crate::error::{AppError, Result};
use crate::models::{CatalogUser, ResolvedTrack};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub struct FakeGenerator {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        self.reply.clone().map_err(AppError::ProviderUnavailable)
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    tracks: HashMap<String, String>,
    failing_searches: HashSet<String>,
    fail_user: bool,
    fail_create: bool,
    fail_add: bool,
    created: Mutex<Vec<(String, String)>>,
    added: Mutex<Vec<Vec<String>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `query` resolve to a track with `id`.
    pub fn with_track(mut self, query: &str, id: &str) -> Self {
        self.tracks.insert(query.to_string(), id.to_string());
        self
    }

    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn failing_user(mut self) -> Self {
        self.fail_user = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_add(mut self) -> Self {
        self.fail_add = true;
        self
    }

    pub fn created_playlists(&self) -> Vec<(String, String)> {
        self.created.lock().unwrap().clone()
    }

    pub fn added_batches(&self) -> Vec<Vec<String>> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl MusicCatalog for FakeCatalog {
    async fn current_user(&self) -> Result<CatalogUser> {
        if self.fail_user {
            return Err(AppError::ProviderUnavailable(
                "Spotify API returned status: 401 Unauthorized".to_string(),
            ));
        }

        Ok(CatalogUser {
            id: "user-1".to_string(),
            display_name: Some("Test Cook".to_string()),
        })
    }

    async fn search_track(&self, query: &str) -> Result<Option<ResolvedTrack>> {
        if self.failing_searches.contains(query) {
            return Err(AppError::ProviderUnavailable("search timed out".to_string()));
        }

        Ok(self.tracks.get(query).map(|id| ResolvedTrack {
            id: id.clone(),
            name: query.to_string(),
            artist: "Fake Artist".to_string(),
        }))
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        _description: &str,
    ) -> Result<CreatedPlaylist> {
        if self.fail_create {
            return Err(AppError::ProviderUnavailable("quota exceeded".to_string()));
        }

        let mut created = self.created.lock().unwrap();
        created.push((user_id.to_string(), name.to_string()));
        let id = format!("playlist-{}", created.len());

        Ok(CreatedPlaylist {
            url: format!("https://open.spotify.com/playlist/{}", id),
            id,
            name: name.to_string(),
        })
    }

    async fn add_tracks(&self, _playlist_id: &str, track_ids: &[String]) -> Result<()> {
        if self.fail_add {
            return Err(AppError::ProviderUnavailable("playlist not found".to_string()));
        }

        self.added.lock().unwrap().push(track_ids.to_vec());
        Ok(())
    }
}
