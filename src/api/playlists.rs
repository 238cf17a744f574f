use super::AppState;
use crate::error::{AppError, HandlerResult, Result};
use crate::models::{
    CreatePlaylistRequest, CreatePlaylistResponse, PlaylistRequest, PlaylistResponse, Recipe,
};
use crate::services::{catalog_matcher, playlist_assembler};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

const GENERATE_FAILED: &str = "Failed to generate playlist";
const CREATE_FAILED: &str = "Failed to create playlist";

pub fn playlist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-playlist", post(generate_playlist))
        .route("/create-playlist", post(create_playlist))
}

/// Song suggestions for a recipe, without touching the music catalog
async fn generate_playlist(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PlaylistRequest>, JsonRejection>,
) -> HandlerResult<Json<PlaylistResponse>> {
    let Json(req) = payload.map_err(|e| body_error(e).labeled(GENERATE_FAILED))?;

    suggest(&state, &req.recipe)
        .await
        .map(Json)
        .map_err(|e| e.labeled(GENERATE_FAILED))
}

/// Suggestions matched against the catalog and saved as a playlist in the user's account
async fn create_playlist(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreatePlaylistRequest>, JsonRejection>,
) -> HandlerResult<Json<CreatePlaylistResponse>> {
    let Json(req) = payload.map_err(|e| body_error(e).labeled(CREATE_FAILED))?;

    build_playlist(&state, req)
        .await
        .map(Json)
        .map_err(|e| e.labeled(CREATE_FAILED))
}

async fn suggest(state: &AppState, recipe: &Recipe) -> Result<PlaylistResponse> {
    validate_recipe(recipe)?;

    let songs = state.recommender.recommend(recipe).await?;

    Ok(PlaylistResponse {
        playlist_name: recipe.playlist_name(),
        songs,
        message: "Playlist generated successfully".to_string(),
    })
}

async fn build_playlist(state: &AppState, req: CreatePlaylistRequest) -> Result<CreatePlaylistResponse> {
    let catalog = state
        .catalog
        .as_deref()
        .ok_or(AppError::CredentialMissing("SPOTIFY_REFRESH_TOKEN or SPOTIFY_ACCESS_TOKEN"))?;

    validate_recipe(&req.recipe)?;

    let songs = state.recommender.recommend(&req.recipe).await?;

    let user = catalog.current_user().await?;
    tracing::info!(
        "Building playlist for Spotify user {}",
        user.display_name.as_deref().unwrap_or(&user.id)
    );

    let tracks = catalog_matcher::resolve(catalog, &songs).await?;
    let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();

    let name = req
        .playlist_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| req.recipe.playlist_name());

    let playlist = playlist_assembler::create(catalog, &user.id, &name, &track_ids).await?;

    Ok(CreatePlaylistResponse {
        playlist,
        tracks,
        message: "Playlist created successfully".to_string(),
    })
}

fn body_error(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn validate_recipe(recipe: &Recipe) -> Result<()> {
    recipe
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{router, send};
    use crate::services::fakes::{FakeCatalog, FakeGenerator};
    use crate::services::MusicCatalog;
    use axum::http::StatusCode;
    use serde_json::json;

    const REPLY: &str = "1. That's Amore - Dean Martin\n2. Volare - Dean Martin\n3. Mambo Italiano - Rosemary Clooney\n4. Tu Vuò Fà L'Americano - Renato Carosone\n5. Funiculì, Funiculà - Luciano Pavarotti\n";

    fn spaghetti() -> serde_json::Value {
        json!({
            "recipe": {
                "name": "Classic Spaghetti",
                "cuisine": "Italian",
                "cooking_time": 30,
                "difficulty": "Easy"
            }
        })
    }

    #[tokio::test]
    async fn test_generate_playlist() {
        let app = router(Arc::new(FakeGenerator::replying(REPLY)), None);
        let (status, body) = send(app, "POST", "/generate-playlist", Some(spaghetti())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playlist_name"], "Cooking Classic Spaghetti - Italian Vibes");
        assert_eq!(body["message"], "Playlist generated successfully");

        let songs = body["songs"].as_array().unwrap();
        assert!(!songs.is_empty() && songs.len() <= 5);
        assert_eq!(songs[0], "That's Amore - Dean Martin");
    }

    #[tokio::test]
    async fn test_generate_playlist_provider_failure() {
        let app = router(Arc::new(FakeGenerator::failing("overloaded_error")), None);
        let (status, body) = send(app, "POST", "/generate-playlist", Some(spaghetti())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERATE_FAILED);
        assert!(body["details"].as_str().unwrap().contains("overloaded_error"));
    }

    #[tokio::test]
    async fn test_generate_playlist_rejects_invalid_recipe() {
        let generator = Arc::new(FakeGenerator::replying(REPLY));
        let app = router(generator.clone(), None);
        let mut request = spaghetti();
        request["recipe"]["cooking_time"] = json!(0);

        let (status, body) = send(app, "POST", "/generate-playlist", Some(request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], GENERATE_FAILED);
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generate_playlist_long_cooking_time() {
        let app = router(Arc::new(FakeGenerator::replying(REPLY)), None);
        let mut request = spaghetti();
        request["recipe"]["name"] = json!("Texas Brisket");
        request["recipe"]["cooking_time"] = json!(2000);

        let (status, body) = send(app, "POST", "/generate-playlist", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playlist_name"], "Cooking Texas Brisket - Italian Vibes");
    }

    #[tokio::test]
    async fn test_generate_playlist_malformed_body() {
        let generator = Arc::new(FakeGenerator::replying(REPLY));
        let app = router(generator.clone(), None);
        let mut request = spaghetti();
        request["recipe"]["difficulty"] = json!("Extreme");

        let (status, body) = send(app, "POST", "/generate-playlist", Some(request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], GENERATE_FAILED);
        assert!(body["details"].as_str().unwrap().contains("unknown variant"));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_playlist_missing_recipe() {
        let app = router(Arc::new(FakeGenerator::replying(REPLY)), None);
        let (status, body) = send(app, "POST", "/create-playlist", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], CREATE_FAILED);
        assert!(body["details"].as_str().unwrap().contains("recipe"));
    }

    #[tokio::test]
    async fn test_create_playlist() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_track("That's Amore - Dean Martin", "t1")
                .with_track("Volare - Dean Martin", "t2")
                .with_track("Funiculì, Funiculà - Luciano Pavarotti", "t5"),
        );
        let app = router(
            Arc::new(FakeGenerator::replying(REPLY)),
            Some(catalog.clone() as Arc<dyn MusicCatalog>),
        );

        let (status, body) = send(app, "POST", "/create-playlist", Some(spaghetti())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playlist"]["name"], "Cooking Classic Spaghetti - Italian Vibes");
        assert_eq!(body["playlist"]["track_count"], 3);
        let ids: Vec<&str> = body["tracks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["t1", "t2", "t5"]);
        assert_eq!(catalog.added_batches(), vec![vec!["t1", "t2", "t5"]]);
        assert_eq!(catalog.created_playlists()[0].0, "user-1");
    }

    #[tokio::test]
    async fn test_create_playlist_custom_name() {
        let catalog = Arc::new(FakeCatalog::new().with_track("Volare - Dean Martin", "t2"));
        let app = router(
            Arc::new(FakeGenerator::replying(REPLY)),
            Some(catalog.clone() as Arc<dyn MusicCatalog>),
        );
        let mut request = spaghetti();
        request["playlist_name"] = json!("Sunday Sauce");

        let (status, body) = send(app, "POST", "/create-playlist", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playlist"]["name"], "Sunday Sauce");
    }

    #[tokio::test]
    async fn test_create_playlist_no_matches() {
        let catalog = Arc::new(FakeCatalog::new());
        let app = router(
            Arc::new(FakeGenerator::replying(REPLY)),
            Some(catalog.clone() as Arc<dyn MusicCatalog>),
        );

        let (status, body) = send(app, "POST", "/create-playlist", Some(spaghetti())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], CREATE_FAILED);
        assert!(body["details"].as_str().unwrap().contains("No songs were found"));
        assert!(catalog.created_playlists().is_empty());
    }

    #[tokio::test]
    async fn test_create_playlist_user_lookup_failure() {
        let catalog = Arc::new(FakeCatalog::new().failing_user());
        let app = router(
            Arc::new(FakeGenerator::replying(REPLY)),
            Some(catalog as Arc<dyn MusicCatalog>),
        );

        let (status, body) = send(app, "POST", "/create-playlist", Some(spaghetti())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn test_create_playlist_without_spotify_token() {
        let app = router(Arc::new(FakeGenerator::replying(REPLY)), None);
        let (status, body) = send(app, "POST", "/create-playlist", Some(spaghetti())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], CREATE_FAILED);
        assert!(body["details"].as_str().unwrap().contains("SPOTIFY_ACCESS_TOKEN"));
    }
}
