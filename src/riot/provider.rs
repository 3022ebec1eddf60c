use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AppError;

use super::champions::ChampionTable;
use super::client::RiotClient;
use super::region::Platform;
use super::types::{CurrentGameInfo, LeagueEntryDto, SummonerDto};

/// The game-data calls the roster and live-match code rely on.
#[async_trait]
pub trait GameDataProvider: Send + Sync + Debug {
    /// Resolve an account name to the provider-side summoner.
    async fn lookup_account_by_name(
        &self,
        platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, AppError>;

    /// `None` when the summoner is not in a game.
    async fn get_active_match(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Option<CurrentGameInfo>, AppError>;

    async fn get_ranked_positions(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError>;

    async fn list_champions(&self) -> Result<ChampionTable, AppError>;
}

#[async_trait]
impl GameDataProvider for RiotClient {
    async fn lookup_account_by_name(
        &self,
        platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, AppError> {
        // Riot ids ("Name#TAG") are resolved through Account-v1 first.
        match name.split_once('#') {
            Some((game_name, tag_line)) => {
                let account = self
                    .get_account_by_riot_id(platform.to_region(), game_name, tag_line)
                    .await?;
                self.get_summoner_by_puuid(platform, &account.puuid).await
            }
            None => self.get_summoner_by_name(platform, name).await,
        }
    }

    async fn get_active_match(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Option<CurrentGameInfo>, AppError> {
        self.get_current_game_by_puuid(platform, puuid).await
    }

    async fn get_ranked_positions(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        self.get_league_entries_by_puuid(platform, puuid).await
    }

    async fn list_champions(&self) -> Result<ChampionTable, AppError> {
        Ok(self.get_champion_list().await?.into())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::limiter::RequestLimiter;

    fn client(server: &MockServer) -> RiotClient {
        RiotClient::new(
            "RGAPI-TEST".to_string(),
            RequestLimiter::per_second(NonZeroU32::new(100).unwrap()),
            "14.24.1".to_string(),
        )
        .with_base_url(server.base_url())
    }

    #[tokio::test]
    async fn plain_name_uses_summoner_by_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_contains("/lol/summoner/v4/summoners/by-name/Hide");
                then.status(200)
                    .json_body(json!({ "puuid": "p-faker", "id": "s-faker", "name": "Hide on bush" }));
            })
            .await;

        let summoner = client(&server)
            .lookup_account_by_name(Platform::KR, "Hide on bush")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(summoner.puuid, "p-faker");
    }

    #[tokio::test]
    async fn riot_id_goes_through_account_v1() {
        let server = MockServer::start_async().await;
        let account = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/riot/account/v1/accounts/by-riot-id/Agurin/EUW");
                then.status(200)
                    .json_body(json!({ "puuid": "p-agurin", "gameName": "Agurin", "tagLine": "EUW" }));
            })
            .await;
        let summoner = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/lol/summoner/v4/summoners/by-puuid/p-agurin");
                then.status(200).json_body(json!({ "puuid": "p-agurin" }));
            })
            .await;

        let found = client(&server)
            .lookup_account_by_name(Platform::EUW1, "Agurin#EUW")
            .await
            .unwrap();

        account.assert_async().await;
        summoner.assert_async().await;
        assert_eq!(found.puuid, "p-agurin");
    }

    #[tokio::test]
    async fn unknown_summoner_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/summoners/by-name/");
                then.status(404);
            })
            .await;

        let res = client(&server)
            .lookup_account_by_name(Platform::EUW1, "Nobody")
            .await;

        assert!(matches!(res, Err(AppError::SummonerNotFound(name)) if name == "Nobody"));
    }

    #[tokio::test]
    async fn not_in_game_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/lol/spectator/v5/active-games/by-summoner/p-idle");
                then.status(404);
            })
            .await;

        let game = client(&server)
            .get_active_match(Platform::EUW1, "p-idle")
            .await
            .unwrap();

        assert!(game.is_none());
    }

    #[tokio::test]
    async fn champions_come_from_ddragon() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/cdn/14.24.1/data/en_US/champion.json");
                then.status(200).json_body(json!({
                    "data": { "Ahri": { "key": "103", "name": "Ahri" } }
                }));
            })
            .await;

        let table = client(&server).list_champions().await.unwrap();

        mock.assert_async().await;
        assert_eq!(table.name_of(103), "Ahri");
    }
}
