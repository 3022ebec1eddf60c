use crate::error::AppError;
use crate::riot::{GameDataProvider, LeagueEntryDto, Platform};

/// Solo queue standing of one account. Unranked accounts have no tier and 0 LP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedStanding {
    pub tier: Option<String>,
    pub division: Option<String>,
    pub league_points: i32,
}

impl RankedStanding {
    pub fn from_entries(entries: &[LeagueEntryDto]) -> Self {
        solo_entry(entries)
            .map(|entry| Self {
                tier: Some(entry.tier.clone()),
                division: Some(entry.rank.clone()),
                league_points: entry.league_points,
            })
            .unwrap_or_default()
    }
}

/// First solo queue entry, ignoring any later duplicates.
pub fn solo_entry(entries: &[LeagueEntryDto]) -> Option<&LeagueEntryDto> {
    entries.iter().find(|entry| entry.is_solo_queue())
}

pub async fn ranked_standing(
    provider: &dyn GameDataProvider,
    platform: Platform,
    puuid: &str,
) -> Result<RankedStanding, AppError> {
    let entries = provider.get_ranked_positions(platform, puuid).await?;
    Ok(RankedStanding::from_entries(&entries))
}
