use super::MusicCatalog;
use crate::error::{AppError, Result};
use crate::models::ResolvedTrack;
use tracing::{debug, info, warn};

/// Resolve each suggestion to the catalog's top search hit.
///
/// Misses and per-song search failures are skipped; the result keeps the input
/// order. Fails only when nothing at all resolved.
pub async fn resolve(catalog: &dyn MusicCatalog, songs: &[String]) -> Result<Vec<ResolvedTrack>> {
    let mut tracks = Vec::with_capacity(songs.len());

    for song in songs {
        match catalog.search_track(song).await {
            Ok(Some(track)) => {
                debug!("Matched '{}' to {} by {}", song, track.name, track.artist);
                tracks.push(track);
            }
            Ok(None) => debug!("No catalog match for '{}'", song),
            Err(e) => warn!("Search failed for '{}': {}", song, e),
        }
    }

    info!("Resolved {} of {} songs", tracks.len(), songs.len());

    if tracks.is_empty() {
        return Err(AppError::NoMatchesFound);
    }

    Ok(tracks)
}
