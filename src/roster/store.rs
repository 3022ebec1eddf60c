use std::fmt::Debug;

use async_trait::async_trait;

use crate::db::{Account, NewCommandLog, Player, Streamer};
use crate::error::AppError;

/// Persistence the roster pipeline and the live-match lookup rely on.
#[async_trait]
pub trait RosterStore: Send + Sync + Debug {
    /// Exact, case-sensitive lookup.
    async fn find_player_by_name(&self, name: &str) -> Result<Option<Player>, AppError>;

    async fn find_player_by_id(&self, id: i64) -> Result<Option<Player>, AppError>;

    /// Exact, case-sensitive lookup.
    async fn find_account_by_summoner_name(
        &self,
        summoner_name: &str,
    ) -> Result<Option<Account>, AppError>;

    /// Case-insensitive lookup on the public alias.
    async fn find_streamer_by_alias(&self, alias: &str) -> Result<Option<Streamer>, AppError>;

    /// Upsert keyed by player name. Accounts and streamer are only ever added.
    async fn save_player(&self, player: &Player) -> Result<Player, AppError>;

    async fn create_command_log(&self, entry: NewCommandLog) -> Result<(), AppError>;

    /// The roster player owning `summoner_name`, if any.
    async fn resolve(&self, summoner_name: &str) -> Result<Option<Player>, AppError> {
        let Some(account) = self.find_account_by_summoner_name(summoner_name).await? else {
            return Ok(None);
        };
        let Some(player_id) = account.player_id else {
            return Ok(None);
        };
        self.find_player_by_id(player_id).await
    }
}
