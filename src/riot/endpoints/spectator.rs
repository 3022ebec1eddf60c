use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::CurrentGameInfo;

impl RiotClient {
    /// Get the game a player is currently in, `None` when not in game
    pub async fn get_current_game_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Option<CurrentGameInfo>, AppError> {
        let url = format!(
            "{}/lol/spectator/v5/active-games/by-summoner/{}",
            self.platform_url(platform),
            puuid
        );

        self.get_optional(&url).await
    }
}
