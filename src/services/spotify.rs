use crate::config::SpotifyAuth;
use crate::error::{AppError, Result};
use crate::models::{CatalogUser, ResolvedTrack};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// Spotify caps track insertion at 100 ids per request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// A music-streaming catalog that can search tracks and own playlists.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    async fn current_user(&self) -> Result<CatalogUser>;

    /// Best match for a free-text query, if the catalog has any.
    async fn search_track(&self, query: &str) -> Result<Option<ResolvedTrack>>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatedPlaylist>;

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug)]
pub struct SpotifyClient {
    api_url: Url,
    accounts_url: String,
    auth: SpotifyAuth,
    /// Bearer token currently in use. Empty until the first refresh in refresh-token mode.
    access_token: RwLock<Option<String>>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyUser {
    id: String,
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewPlaylist<'a> {
    name: &'a str,
    description: &'a str,
    public: bool,
}

#[derive(Debug, Deserialize)]
struct SpotifyPlaylist {
    id: String,
    name: String,
    #[serde(default)]
    external_urls: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct AddTracks {
    uris: Vec<String>,
}

impl From<SpotifyTrack> for ResolvedTrack {
    fn from(track: SpotifyTrack) -> Self {
        ResolvedTrack {
            id: track.id,
            name: track.name,
            artist: track
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
        }
    }
}

impl From<SpotifyPlaylist> for CreatedPlaylist {
    fn from(playlist: SpotifyPlaylist) -> Self {
        let url = playlist
            .external_urls
            .get("spotify")
            .cloned()
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", playlist.id));

        CreatedPlaylist {
            id: playlist.id,
            name: playlist.name,
            url,
        }
    }
}

fn track_batches(track_ids: &[String]) -> Vec<AddTracks> {
    track_ids
        .chunks(MAX_TRACKS_PER_REQUEST)
        .map(|chunk| AddTracks {
            uris: chunk.iter().map(|id| format!("spotify:track:{}", id)).collect(),
        })
        .collect()
}

/// `base` with `segments` appended as percent-encoded path segments.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::ProviderUnavailable(format!("Invalid Spotify API URL: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl SpotifyClient {
    pub fn new(
        api_url: &str,
        accounts_url: String,
        auth: SpotifyAuth,
        timeout: Duration,
    ) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| AppError::ProviderUnavailable(format!("Invalid Spotify API URL: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ProviderUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        let access_token = match &auth {
            SpotifyAuth::AccessToken(token) => Some(token.clone()),
            SpotifyAuth::RefreshToken(_) => None,
        };

        Ok(Self {
            api_url,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            auth,
            access_token: RwLock::new(access_token),
            client,
        })
    }

    async fn current_token(&self) -> Result<String> {
        let cached = self.access_token.read().await.clone();
        if let Some(token) = cached {
            return Ok(token);
        }
        self.refresh_token(None).await
    }

    /// Exchange the refresh token for a new access token. `stale` is the token
    /// the caller saw rejected; if another request already replaced it, the
    /// replacement is returned without a second exchange.
    async fn refresh_token(&self, stale: Option<&str>) -> Result<String> {
        let SpotifyAuth::RefreshToken(credentials) = &self.auth else {
            return Err(AppError::ProviderUnavailable(
                "Spotify access token was rejected and no refresh token is configured".to_string(),
            ));
        };

        let mut cached = self.access_token.write().await;
        if let Some(current) = cached.as_deref() {
            if stale != Some(current) {
                return Ok(current.to_string());
            }
        }

        tracing::info!("Refreshing Spotify access token");

        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Spotify token request failed: {}", e)))?;

        let token: TokenResponse = decode(response).await?;
        *cached = Some(token.access_token.clone());

        Ok(token.access_token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.current_token().await?;
        let retry = request.try_clone();

        let mut response = execute(request, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && matches!(self.auth, SpotifyAuth::RefreshToken(_))
        {
            if let Some(retry) = retry {
                tracing::warn!("Spotify rejected the access token, refreshing once");
                let token = self.refresh_token(Some(&token)).await?;
                response = execute(retry, &token).await?;
            }
        }

        decode(response).await
    }
}

async fn execute(request: RequestBuilder, token: &str) -> Result<Response> {
    request
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| AppError::ProviderUnavailable(format!("Spotify request failed: {}", e)))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::ProviderUnavailable(format!("Failed to read Spotify response: {}", e)))?;

    if !status.is_success() {
        tracing::error!("Spotify API error: {} - {}", status, body);
        return Err(AppError::ProviderUnavailable(format!(
            "Spotify API returned status: {} - {}",
            status,
            body.chars().take(200).collect::<String>()
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| AppError::ProviderUnavailable(format!("Failed to parse Spotify response: {}", e)))
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    async fn current_user(&self) -> Result<CatalogUser> {
        let url = endpoint(&self.api_url, &["me"])?;
        let user: SpotifyUser = self.send(self.client.get(url)).await?;

        Ok(CatalogUser {
            id: user.id,
            display_name: user.display_name,
        })
    }

    async fn search_track(&self, query: &str) -> Result<Option<ResolvedTrack>> {
        let url = endpoint(&self.api_url, &["search"])?;
        tracing::debug!("Searching Spotify for: {}", query);

        let response: SearchResponse = self
            .send(
                self.client
                    .get(url)
                    .query(&[("q", query), ("type", "track"), ("limit", "1")]),
            )
            .await?;

        Ok(response.tracks.items.into_iter().next().map(ResolvedTrack::from))
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatedPlaylist> {
        let url = endpoint(&self.api_url, &["users", user_id, "playlists"])?;

        let playlist: SpotifyPlaylist = self
            .send(self.client.post(url).json(&NewPlaylist {
                name,
                description,
                public: false,
            }))
            .await?;

        Ok(playlist.into())
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let url = endpoint(&self.api_url, &["playlists", playlist_id, "tracks"])?;

        for batch in track_batches(track_ids) {
            let _: serde_json::Value = self.send(self.client.post(url.clone()).json(&batch)).await?;
        }

        Ok(())
    }
}
