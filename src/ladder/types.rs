use serde::Deserialize;

/// One row of a ladder page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LadderEntry {
    pub name: String,
}

/// Representation of the player profile response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDto {
    pub name: String,
    #[serde(default)]
    pub league_player: Option<LeaguePlayerDto>,
    #[serde(default)]
    pub team: Option<TeamDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaguePlayerDto {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub accounts: Vec<ProfileAccountDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileAccountDto {
    pub summoner_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamDto {
    #[serde(default)]
    pub tag: Option<String>,
}

/// A scraped player profile, normalized for the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub position: Option<String>,
    pub team_tag: Option<String>,
    pub accounts: Vec<String>,
}

impl From<ProfileDto> for Profile {
    fn from(dto: ProfileDto) -> Self {
        let league_player = dto.league_player.unwrap_or_default();

        Self {
            name: dto.name,
            position: league_player
                .position
                .as_deref()
                .and_then(normalize_position),
            team_tag: dto
                .team
                .and_then(|team| team.tag)
                .filter(|tag| !tag.trim().is_empty()),
            accounts: league_player
                .accounts
                .into_iter()
                .map(|account| account.summoner_name)
                .collect(),
        }
    }
}

/// `"10_top"` becomes `"Top"`. Values without a role after the prefix are dropped.
pub fn normalize_position(raw: &str) -> Option<String> {
    let role = raw.get(3..).filter(|role| !role.is_empty())?;
    let mut chars = role.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
