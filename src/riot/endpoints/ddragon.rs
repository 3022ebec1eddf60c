use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::types::ChampionListDto;

impl RiotClient {
    /// Get the static champion list of the configured Data Dragon version
    pub async fn get_champion_list(&self) -> Result<ChampionListDto, AppError> {
        let url = format!(
            "{}/cdn/{}/data/en_US/champion.json",
            self.ddragon_url(),
            self.ddragon_version()
        );

        self.get_static(&url).await
    }
}
