use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::riot::{ChampionTable, CurrentGameInfo, CurrentGameParticipant, GameDataProvider, Platform};
use crate::roster::RosterStore;

use super::ranked::{RankedStanding, ranked_standing};

/// A roster player spotted in a live game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngamePlayer {
    pub name: String,
    pub champion: String,
    pub home_team: bool,
    pub league_points: i32,
    pub position: Option<String>,
}

impl IngamePlayer {
    fn render(&self) -> String {
        format!("{} ({}) {} LP", self.name, self.champion, self.league_points)
    }
}

/// Which solo queue tiers count towards the lobby average.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AverageLpPolicy {
    tiers: Vec<String>,
}

impl AverageLpPolicy {
    pub fn new<I, S>(tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tiers: tiers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn qualifies(&self, standing: &RankedStanding) -> bool {
        standing.tier.as_deref().is_some_and(|tier| {
            self.tiers
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(tier))
        })
    }

    /// Integer mean over qualifying standings, `None` when nobody qualifies.
    pub fn average<'a>(&self, standings: impl IntoIterator<Item = &'a RankedStanding>) -> Option<i64> {
        let (total, count) = standings
            .into_iter()
            .filter(|standing| self.qualifies(standing))
            .fold((0i64, 0i64), |(total, count), standing| {
                (total + i64::from(standing.league_points), count + 1)
            });
        (count > 0).then(|| total / count)
    }
}

impl Default for AverageLpPolicy {
    fn default() -> Self {
        Self::new(["MASTER", "GRANDMASTER", "CHALLENGER"])
    }
}

#[derive(Debug, Error)]
#[error("No roster player found in the game")]
pub struct NoPlayersFound;

/// Roster players of a game, sorted by LP, plus the lobby average.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    pub players: Vec<IngamePlayer>,
    pub average_lp: Option<i64>,
}

impl Correlation {
    pub fn summary(&self, requester_name: &str) -> String {
        let (home, opposing): (Vec<_>, Vec<_>) =
            self.players.iter().partition(|player| player.home_team);
        let join = |players: Vec<&IngamePlayer>| {
            players
                .iter()
                .map(|player| player.render())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut summary = format!("{}'s Team: {}", requester_name, join(home));
        if !opposing.is_empty() {
            summary.push_str(" | Gegner: ");
            summary.push_str(&join(opposing));
        }
        if let Some(average) = self.average_lp {
            summary.push_str(&format!(" | Average {average} LP"));
        }
        summary
    }
}

#[derive(Debug, Default)]
struct ParticipantOutcome {
    player: Option<IngamePlayer>,
    standing: Option<RankedStanding>,
}

/// Matches the participants of a live game against the roster.
#[derive(Debug, Clone)]
pub struct MatchCorrelator {
    provider: Arc<dyn GameDataProvider>,
    store: Arc<dyn RosterStore>,
    champions: Arc<ChampionTable>,
    platform: Platform,
    average: Option<AverageLpPolicy>,
    budget: Duration,
}

impl MatchCorrelator {
    pub const DEFAULT_BUDGET: Duration = Duration::from_secs(2);

    pub fn new(
        provider: Arc<dyn GameDataProvider>,
        store: Arc<dyn RosterStore>,
        champions: Arc<ChampionTable>,
        platform: Platform,
    ) -> Self {
        Self {
            provider,
            store,
            champions,
            platform,
            average: None,
            budget: Self::DEFAULT_BUDGET,
        }
    }

    pub fn with_average(mut self, policy: Option<AverageLpPolicy>) -> Self {
        self.average = policy;
        self
    }

    pub async fn correlate(
        &self,
        game: &CurrentGameInfo,
        requester_account: &str,
        requester_name: &str,
    ) -> Result<String, NoPlayersFound> {
        let correlation = self.collect(game, requester_account).await;
        if correlation.players.is_empty() {
            return Err(NoPlayersFound);
        }
        Ok(correlation.summary(requester_name))
    }

    /// Participants are resolved concurrently; the result order only depends
    /// on LP with the participant order breaking ties.
    #[instrument(skip(self, game), fields(game_id = game.game_id, participants = game.participants.len()))]
    pub async fn collect(&self, game: &CurrentGameInfo, requester_account: &str) -> Correlation {
        let home_team = game
            .participants
            .iter()
            .find(|participant| participant.account_name() == requester_account)
            .map(|participant| participant.team_id);

        let outcomes = join_all(
            game.participants
                .iter()
                .map(|participant| self.resolve_participant(participant, home_team)),
        )
        .await;

        let average_lp = self.average.as_ref().and_then(|policy| {
            policy.average(outcomes.iter().filter_map(|outcome| outcome.standing.as_ref()))
        });

        let mut players: Vec<IngamePlayer> = outcomes
            .into_iter()
            .filter_map(|outcome| outcome.player)
            .collect();
        players.sort_by(|a, b| b.league_points.cmp(&a.league_points));

        for player in &players {
            debug!(
                player = %player.name,
                position = ?player.position,
                lp = player.league_points,
                home_team = player.home_team,
                "🎮 Roster player in game"
            );
        }
        Correlation {
            players,
            average_lp,
        }
    }

    async fn resolve_participant(
        &self,
        participant: &CurrentGameParticipant,
        home_team: Option<i64>,
    ) -> ParticipantOutcome {
        let account = participant.account_name();
        let player = match self.store.resolve(account).await {
            Ok(player) => player,
            Err(e) => {
                warn!(account, error = ?e, "🎮 ⚠️ Roster lookup failed");
                None
            }
        };

        if player.is_none() && self.average.is_none() {
            return ParticipantOutcome::default();
        }

        let standing = match &participant.puuid {
            Some(puuid) => self.standing(account, puuid).await,
            None => None,
        };

        let player = player.and_then(|player| {
            let standing = standing.as_ref()?;
            Some(IngamePlayer {
                name: player.display_name(),
                champion: self.champions.name_of(participant.champion_id).to_string(),
                home_team: home_team == Some(participant.team_id),
                league_points: standing.league_points,
                position: player.position,
            })
        });

        ParticipantOutcome { player, standing }
    }

    async fn standing(&self, account: &str, puuid: &str) -> Option<RankedStanding> {
        match timeout(
            self.budget,
            ranked_standing(self.provider.as_ref(), self.platform, puuid),
        )
        .await
        {
            Ok(Ok(standing)) => {
                debug!(
                    account,
                    tier = ?standing.tier,
                    division = ?standing.division,
                    lp = standing.league_points,
                    "🎮 Ranked standing"
                );
                Some(standing)
            }
            Ok(Err(e)) => {
                debug!(account, error = %e, "🎮 Ranked lookup failed");
                None
            }
            Err(_) => {
                debug!(account, "🎮 Ranked lookup timed out");
                None
            }
        }
    }
}
