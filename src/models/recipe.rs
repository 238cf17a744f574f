use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Recipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub cuisine: String,
    /// Minutes
    #[validate(range(min = 1))]
    pub cooking_time: u32,
    pub difficulty: Difficulty,
}

impl Recipe {
    /// Display name for a playlist built around this recipe.
    pub fn playlist_name(&self) -> String {
        format!("Cooking {} - {} Vibes", self.name, self.cuisine)
    }
}
