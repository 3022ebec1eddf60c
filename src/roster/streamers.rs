use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::db::Streamer;
use crate::error::AppError;

/// Known streamer aliases keyed by roster player name.
#[derive(Debug, Clone, Default)]
pub struct StreamerAliases(HashMap<String, String>);

impl StreamerAliases {
    /// Reads a JSON array of `{ "name": .., "streamer_name": .. }`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let streamers: Vec<Streamer> = serde_json::from_str(&raw)?;
        let aliases: Self = streamers.into_iter().collect();

        info!(
            count = aliases.0.len(),
            path = %path.as_ref().display(),
            "🎥 Streamer aliases loaded"
        );
        Ok(aliases)
    }

    pub fn alias_for(&self, player_name: &str) -> Option<&str> {
        self.0.get(player_name).map(String::as_str)
    }

    /// Streamer record for `player_name` if it has a known alias.
    pub fn streamer_for(&self, player_name: &str) -> Option<Streamer> {
        self.alias_for(player_name).map(|alias| Streamer {
            name: player_name.to_string(),
            streamer_name: alias.to_string(),
            player_id: None,
        })
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Streamer> for StreamerAliases {
    fn from_iter<I: IntoIterator<Item = Streamer>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|streamer| (streamer.name, streamer.streamer_name))
                .collect(),
        )
    }
}
