use std::collections::HashMap;

use serde::Deserialize;

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// Summoner-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub puuid: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// League-v4
// ============================================================================

pub const SOLO_QUEUE: &str = "RANKED_SOLO_5x5";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
}

impl LeagueEntryDto {
    pub fn is_solo_queue(&self) -> bool {
        self.queue_type == SOLO_QUEUE
    }
}

// ============================================================================
// Spectator-v5
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentGameInfo {
    pub game_id: i64,
    pub participants: Vec<CurrentGameParticipant>,
}

impl CurrentGameInfo {
    pub fn is_active(&self) -> bool {
        self.game_id > 0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentGameParticipant {
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub summoner_name: Option<String>,
    #[serde(default)]
    pub riot_id: Option<String>,
    pub champion_id: i64,
    pub team_id: i64,
}

impl CurrentGameParticipant {
    /// The name roster accounts are keyed by: the summoner name when Riot
    /// still sends one, otherwise the game name part of the Riot ID.
    pub fn account_name(&self) -> &str {
        match self.summoner_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self
                .riot_id
                .as_deref()
                .map(|riot_id| riot_id.split_once('#').map_or(riot_id, |(name, _)| name))
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Data Dragon
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChampionListDto {
    pub data: HashMap<String, ChampionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChampionDto {
    pub key: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectator_participant_accepts_riot_id() {
        let value = serde_json::json!({
            "gameId": 42,
            "participants": [
                { "puuid": "p1", "riotId": "Hide on bush#KR1", "championId": 7, "teamId": 100 },
                { "summonerName": "Agurin", "championId": 64, "teamId": 200 }
            ]
        });

        let game: CurrentGameInfo = serde_json::from_value(value).unwrap();

        assert!(game.is_active());
        assert_eq!(game.participants[0].account_name(), "Hide on bush");
        assert_eq!(game.participants[1].account_name(), "Agurin");
        assert_eq!(game.participants[1].puuid, None);
    }

    #[test]
    fn blank_summoner_name_next_to_riot_id_decodes() {
        let value = serde_json::json!({
            "gameId": 7,
            "participants": [
                {
                    "puuid": "p1",
                    "summonerName": "",
                    "riotId": "Hide on bush#KR1",
                    "championId": 7,
                    "teamId": 100
                },
                {
                    "puuid": "p2",
                    "summonerName": "G2 Caps",
                    "riotId": "Caps#EUW",
                    "championId": 1,
                    "teamId": 200
                },
                { "puuid": "p3", "championId": 2, "teamId": 200 }
            ]
        });

        let game: CurrentGameInfo = serde_json::from_value(value).unwrap();

        assert_eq!(game.participants[0].account_name(), "Hide on bush");
        assert_eq!(game.participants[1].account_name(), "G2 Caps");
        assert_eq!(game.participants[2].account_name(), "");
    }
}
