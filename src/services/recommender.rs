use super::song_parser;
use super::TextGenerator;
use crate::error::{AppError, Result};
use crate::models::Recipe;
use std::sync::Arc;
use tracing::{debug, info, warn};

const RECOMMENDATION_MAX_TOKENS: u32 = 1000;
const PROBE_MAX_TOKENS: u32 = 10;

/// Asks the language model for songs to cook a recipe to.
#[derive(Clone)]
pub struct Recommender {
    generator: Arc<dyn TextGenerator>,
    song_count: usize,
}

impl Recommender {
    pub fn new(generator: Arc<dyn TextGenerator>, song_count: usize) -> Self {
        Self {
            generator,
            song_count,
        }
    }

    pub async fn recommend(&self, recipe: &Recipe) -> Result<Vec<String>> {
        info!("Requesting {} songs for recipe: {}", self.song_count, recipe.name);

        let prompt = build_prompt(recipe, self.song_count);
        let reply = self
            .generator
            .generate(&prompt, RECOMMENDATION_MAX_TOKENS)
            .await
            .map_err(|e| {
                AppError::ProviderUnavailable(format!("Error generating playlist with Claude: {}", e))
            })?;

        let mut songs = song_parser::parse(&reply);
        debug!("Model suggested {} songs", songs.len());

        if songs.is_empty() {
            return Err(AppError::ProviderUnavailable(
                "Error generating playlist with Claude: model returned no songs".to_string(),
            ));
        }

        if songs.len() > self.song_count {
            warn!(
                "Model returned {} lines, keeping the first {}",
                songs.len(),
                self.song_count
            );
            songs.truncate(self.song_count);
        }

        Ok(songs)
    }

    /// Confirms the provider is reachable and the credential is accepted.
    /// Failure is an error, never `Ok(false)`.
    pub async fn check_availability(&self) -> Result<bool> {
        self.generator
            .generate("Test connection", PROBE_MAX_TOKENS)
            .await
            .map_err(|e| {
                AppError::ProviderUnavailable(format!("Error testing Claude connection: {}", e))
            })?;

        Ok(true)
    }
}

fn build_prompt(recipe: &Recipe, song_count: usize) -> String {
    format!(
        r#"Given this recipe:
Name: {}
Cuisine: {}
Cooking Time: {} minutes
Difficulty: {}

Generate a list of exactly {} songs that would be perfect to listen to while cooking this recipe.
Consider the cuisine type, cooking time, and overall mood.
Return only the song names and artists, one per line, in the format "Song - Artist".
Do not add any other commentary."#,
        recipe.name, recipe.cuisine, recipe.cooking_time, recipe.difficulty, song_count
    )
}
