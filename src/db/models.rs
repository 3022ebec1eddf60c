use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tracked roster member with its linked accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Assigned by the store, `None` until the player is first saved.
    pub id: Option<i64>,
    pub name: String,
    pub position: Option<String>,
    pub team_tag: Option<String>,
    pub streamer: Option<Streamer>,
    pub accounts: Vec<Account>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            position: None,
            team_tag: None,
            streamer: None,
            accounts: Vec::new(),
        }
    }

    /// Case-insensitive membership test on summoner names.
    pub fn has_account(&self, summoner_name: &str) -> bool {
        let needle = summoner_name.to_lowercase();
        self.accounts
            .iter()
            .any(|account| account.summoner_name.to_lowercase() == needle)
    }

    /// Name shown in match summaries, prefixed with the team tag when known.
    pub fn display_name(&self) -> String {
        match &self.team_tag {
            Some(tag) => format!("{} {}", tag, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub summoner_name: String,
    pub player_id: Option<i64>,
}

impl Account {
    pub fn new(summoner_name: impl Into<String>) -> Self {
        Self {
            summoner_name: summoner_name.into(),
            player_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streamer {
    pub name: String,
    pub streamer_name: String,
    #[serde(default)]
    pub player_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewCommandLog {
    pub requester: String,
    pub command: String,
    pub channel: String,
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct PlayerRow {
    pub id: i64,
    pub name: String,
    pub position: Option<String>,
    pub team_tag: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct AccountRow {
    pub player_id: i64,
    pub summoner_name: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            summoner_name: row.summoner_name,
            player_id: Some(row.player_id),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub(super) struct StreamerRow {
    pub player_id: i64,
    pub name: String,
    pub streamer_name: String,
}

impl From<StreamerRow> for Streamer {
    fn from(row: StreamerRow) -> Self {
        Self {
            name: row.name,
            streamer_name: row.streamer_name,
            player_id: Some(row.player_id),
        }
    }
}
