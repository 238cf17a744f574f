use crate::error::AppError;
use std::env;

/// Refresh-token grant for the Spotify accounts service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotifyAuth {
    /// Token obtained out of band. Not renewed when it expires.
    AccessToken(String),
    RefreshToken(SpotifyCredentials),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub anthropic_model: String,
    /// Number of songs requested from the model per recipe
    pub song_count: usize,
    /// Playlist creation is disabled without Spotify credentials.
    pub spotify_auth: Option<SpotifyAuth>,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
    pub http_timeout_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins (comma-separated). "*" allows any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let anthropic_api_key = non_empty_var("ANTHROPIC_API_KEY")
            .ok_or(AppError::CredentialMissing("ANTHROPIC_API_KEY"))?;

        let song_count = parse_positive("SONG_COUNT", env::var("SONG_COUNT").ok(), 5)?;
        let http_timeout_secs =
            parse_positive("HTTP_TIMEOUT_SECS", env::var("HTTP_TIMEOUT_SECS").ok(), 30)?;

        let spotify_auth = spotify_auth(
            non_empty_var("SPOTIFY_ACCESS_TOKEN"),
            non_empty_var("SPOTIFY_CLIENT_ID"),
            non_empty_var("SPOTIFY_CLIENT_SECRET"),
            non_empty_var("SPOTIFY_REFRESH_TOKEN"),
        )?;

        Ok(Config {
            anthropic_api_key,
            anthropic_api_url: env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string()),
            song_count,
            spotify_auth,
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
            spotify_accounts_url: env::var("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com".to_string()),
            http_timeout_secs,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string())),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_positive<T>(name: &str, raw: Option<String>, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: T = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} must be a positive integer: {}", name, e))?;

    if value == T::default() {
        return Err(anyhow::anyhow!("{} must be at least 1", name));
    }

    Ok(value)
}

/// Refresh credentials win over a bare access token. A partial set is a startup error.
fn spotify_auth(
    access_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
) -> Result<Option<SpotifyAuth>, anyhow::Error> {
    match (client_id, client_secret, refresh_token) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => {
            Ok(Some(SpotifyAuth::RefreshToken(SpotifyCredentials {
                client_id,
                client_secret,
                refresh_token,
            })))
        }
        (None, None, None) => Ok(access_token.map(SpotifyAuth::AccessToken)),
        _ => Err(anyhow::anyhow!(
            "SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET and SPOTIFY_REFRESH_TOKEN must be set together"
        )),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
