use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::SummonerDto;

impl RiotClient {
    /// Get summoner by its legacy summoner name
    pub async fn get_summoner_by_name(
        &self,
        platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, AppError> {
        let url = format!(
            "{}/lol/summoner/v4/summoners/by-name/{}",
            self.platform_url(platform),
            urlencoding::encode(name)
        );

        self.get_optional(&url)
            .await?
            .ok_or_else(|| AppError::SummonerNotFound(name.to_string()))
    }

    /// Get summoner by PUUID
    pub async fn get_summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<SummonerDto, AppError> {
        let url = format!(
            "{}/lol/summoner/v4/summoners/by-puuid/{}",
            self.platform_url(platform),
            puuid
        );

        self.get(&url).await
    }
}
