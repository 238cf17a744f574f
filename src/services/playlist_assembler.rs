use super::MusicCatalog;
use crate::error::{AppError, Result};
use crate::models::Playlist;
use chrono::Utc;
use tracing::{error, info};

/// Create a playlist owned by `user_id` and fill it with `track_ids`.
///
/// A playlist whose track insertion fails is left in place on the provider.
pub async fn create(
    catalog: &dyn MusicCatalog,
    user_id: &str,
    name: &str,
    track_ids: &[String],
) -> Result<Playlist> {
    let description = format!("Cooking playlist generated {}", Utc::now().format("%Y-%m-%d"));

    let created = catalog
        .create_playlist(user_id, name, &description)
        .await
        .map_err(|e| AppError::PlaylistCreateFailed(e.to_string()))?;

    info!("Created playlist {} ({})", created.name, created.id);

    if !track_ids.is_empty() {
        catalog
            .add_tracks(&created.id, track_ids)
            .await
            .map_err(|e| {
                error!("Playlist {} created but adding tracks failed: {}", created.id, e);
                AppError::PlaylistCreateFailed(format!("could not add tracks: {}", e))
            })?;
    }

    Ok(Playlist {
        name: created.name,
        url: created.url,
        track_count: track_ids.len(),
    })
}
