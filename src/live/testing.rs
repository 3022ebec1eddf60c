//! In-memory game data used by the live-match and HTTP tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;
use crate::riot::{
    ChampionTable, CurrentGameInfo, CurrentGameParticipant, GameDataProvider, LeagueEntryDto,
    Platform, SummonerDto,
};

#[derive(Debug, Default)]
pub struct FakeProvider {
    games: HashMap<String, CurrentGameInfo>,
    ranked: HashMap<String, Vec<LeagueEntryDto>>,
    failing: HashSet<String>,
    slow: HashSet<String>,
    lookups: Mutex<Vec<String>>,
}

/// Accounts resolve to the puuid `p-{name}`.
pub fn puuid_of(name: &str) -> String {
    format!("p-{name}")
}

pub fn participant(name: &str, champion_id: i64, team_id: i64) -> CurrentGameParticipant {
    CurrentGameParticipant {
        puuid: Some(puuid_of(name)),
        summoner_name: Some(name.to_string()),
        riot_id: None,
        champion_id,
        team_id,
    }
}

pub fn game(game_id: i64, participants: Vec<CurrentGameParticipant>) -> CurrentGameInfo {
    CurrentGameInfo {
        game_id,
        participants,
    }
}

pub fn solo(tier: &str, lp: i32) -> LeagueEntryDto {
    LeagueEntryDto {
        queue_type: "RANKED_SOLO_5x5".into(),
        tier: tier.into(),
        rank: "I".into(),
        league_points: lp,
    }
}

impl FakeProvider {
    /// `account` is currently playing `game`.
    pub fn in_game(mut self, account: &str, game: CurrentGameInfo) -> Self {
        self.games.insert(puuid_of(account), game);
        self
    }

    pub fn ranked(mut self, account: &str, entries: Vec<LeagueEntryDto>) -> Self {
        self.ranked.insert(puuid_of(account), entries);
        self
    }

    /// Every call touching `account` fails.
    pub fn failing(mut self, account: &str) -> Self {
        self.failing.insert(puuid_of(account));
        self
    }

    /// Lookups of `account` never return in time.
    pub fn slow(mut self, account: &str) -> Self {
        self.slow.insert(account.to_string());
        self
    }

    /// Account names looked up so far, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .map(|lookups| lookups.clone())
            .unwrap_or_default()
    }

    fn check(&self, puuid: &str) -> Result<(), AppError> {
        if self.failing.contains(puuid) {
            return Err(AppError::RiotApi {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GameDataProvider for FakeProvider {
    async fn lookup_account_by_name(
        &self,
        _platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, AppError> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(name.to_string());
        }
        if self.slow.contains(name) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Ok(SummonerDto {
            puuid: puuid_of(name),
            id: None,
            name: Some(name.to_string()),
        })
    }

    async fn get_active_match(
        &self,
        _platform: Platform,
        puuid: &str,
    ) -> Result<Option<CurrentGameInfo>, AppError> {
        self.check(puuid)?;
        Ok(self.games.get(puuid).cloned())
    }

    async fn get_ranked_positions(
        &self,
        _platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        self.check(puuid)?;
        Ok(self.ranked.get(puuid).cloned().unwrap_or_default())
    }

    async fn list_champions(&self) -> Result<ChampionTable, AppError> {
        Ok(ChampionTable::default())
    }
}
