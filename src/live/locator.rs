use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::db::Player;
use crate::error::AppError;
use crate::riot::{CurrentGameInfo, GameDataProvider, Platform};

/// An active game and the account it was found through.
#[derive(Debug, Clone)]
pub struct LocatedMatch {
    pub game: CurrentGameInfo,
    pub summoner_name: String,
}

/// Finds the first account of a player that is currently in a game.
#[derive(Debug, Clone)]
pub struct MatchLocator {
    provider: Arc<dyn GameDataProvider>,
    platform: Platform,
    budget: Duration,
}

impl MatchLocator {
    pub const DEFAULT_BUDGET: Duration = Duration::from_secs(3);

    pub fn new(provider: Arc<dyn GameDataProvider>, platform: Platform) -> Self {
        Self {
            provider,
            platform,
            budget: Self::DEFAULT_BUDGET,
        }
    }

    /// Accounts are tried one by one in the order they were linked.
    #[instrument(skip(self, player), fields(player = %player.name, accounts = player.accounts.len()))]
    pub async fn locate(&self, player: &Player) -> Option<LocatedMatch> {
        for account in &player.accounts {
            let name = &account.summoner_name;

            match timeout(self.budget, self.active_game(name)).await {
                Ok(Ok(Some(game))) if game.is_active() => {
                    debug!(account = %name, game_id = game.game_id, "🔎 Active game found");
                    return Some(LocatedMatch {
                        game,
                        summoner_name: name.clone(),
                    });
                }
                Ok(Ok(_)) => debug!(account = %name, "🔎 Not in game"),
                Ok(Err(e)) => debug!(account = %name, error = %e, "🔎 Lookup failed"),
                Err(_) => debug!(account = %name, "🔎 Lookup timed out"),
            }
        }

        None
    }

    async fn active_game(&self, summoner_name: &str) -> Result<Option<CurrentGameInfo>, AppError> {
        let summoner = self
            .provider
            .lookup_account_by_name(self.platform, summoner_name)
            .await?;
        self.provider
            .get_active_match(self.platform, &summoner.puuid)
            .await
    }
}
