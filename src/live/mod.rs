//! Live game lookup: find the game a roster player is in and list the other
//! roster players in it.

mod correlator;
mod locator;
mod ranked;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::db::{NewCommandLog, Player};
use crate::error::AppError;
use crate::roster::RosterStore;

pub use correlator::{AverageLpPolicy, MatchCorrelator};
pub use locator::MatchLocator;

/// The command recorded in the command log for every answered lookup.
pub const LOOKUP_COMMAND: &str = "!mitspieler";

/// Answer to a lookup, rendered as the text sent back to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupReply {
    Summary(String),
    UnknownName(String),
    NoAccounts,
    NotInGame(String),
}

impl fmt::Display for LookupReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary(summary) => f.write_str(summary),
            Self::UnknownName(name) => write!(f, "{name} not in database."),
            Self::NoAccounts => f.write_str("Keine accounts gefunden."),
            Self::NotInGame(name) => write!(f, "{name} ist in keinem Game."),
        }
    }
}

/// Resolves a typed name to a roster player and summarizes their live game.
#[derive(Debug, Clone)]
pub struct LiveService {
    store: Arc<dyn RosterStore>,
    locator: MatchLocator,
    correlator: MatchCorrelator,
}

impl LiveService {
    pub fn new(
        store: Arc<dyn RosterStore>,
        locator: MatchLocator,
        correlator: MatchCorrelator,
    ) -> Self {
        Self {
            store,
            locator,
            correlator,
        }
    }

    /// `name` is a streamer alias or a player name. `requester` and
    /// `channel` only end up in the command log.
    #[instrument(skip(self))]
    pub async fn lookup(
        &self,
        name: &str,
        requester: &str,
        channel: &str,
    ) -> Result<LookupReply, AppError> {
        let player = match self.find_by_alias(name).await? {
            Some(player) => Some(player),
            None => self.store.find_player_by_name(name).await?,
        };
        self.summarize(player, name, requester, channel).await
    }

    /// Like [`LiveService::lookup`], but `alias` must be a registered
    /// streamer alias.
    #[instrument(skip(self))]
    pub async fn lookup_streamer(
        &self,
        alias: &str,
        requester: &str,
        channel: &str,
    ) -> Result<LookupReply, AppError> {
        let player = self.find_by_alias(alias).await?;
        self.summarize(player, alias, requester, channel).await
    }

    async fn summarize(
        &self,
        player: Option<Player>,
        name: &str,
        requester: &str,
        channel: &str,
    ) -> Result<LookupReply, AppError> {
        let Some(player) = player else {
            return Ok(LookupReply::UnknownName(name.to_string()));
        };

        if player.accounts.is_empty() {
            return Ok(LookupReply::NoAccounts);
        }

        let Some(located) = self.locator.locate(&player).await else {
            return Ok(LookupReply::NotInGame(name.to_string()));
        };

        let summary = match self
            .correlator
            .correlate(&located.game, &located.summoner_name, name)
            .await
        {
            Ok(summary) => summary,
            Err(_) => return Ok(LookupReply::NotInGame(name.to_string())),
        };

        let entry = NewCommandLog {
            requester: requester.replace('@', ""),
            command: LOOKUP_COMMAND.to_string(),
            channel: channel.to_string(),
        };
        if let Err(e) = self.store.create_command_log(entry).await {
            warn!(error = ?e, "📜 ⚠️ Failed to write command log");
        }

        info!(player = %player.name, game_id = located.game.game_id, "🎮 ✅ Live game summarized");
        Ok(LookupReply::Summary(summary))
    }

    /// The player a streamer alias (ignoring case) is attached to.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Player>, AppError> {
        let Some(player_id) = self
            .store
            .find_streamer_by_alias(alias)
            .await?
            .and_then(|streamer| streamer.player_id)
        else {
            return Ok(None);
        };
        self.store.find_player_by_id(player_id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::{Account, Repository, Streamer, test_repository};
    use crate::riot::{ChampionTable, Platform};
    use super::testing::{FakeProvider, game, participant, solo};

    /// Faker (alias "FakerTV") is in game 77 with Caps on the other team.
    /// Benched (alias "BenchedTV") has no accounts.
    pub(crate) async fn live_service() -> (LiveService, Arc<Repository>) {
        let repo = Arc::new(test_repository().await);

        let mut faker = Player::new("Faker");
        faker.team_tag = Some("T1".into());
        faker.accounts = vec![Account::new("Faker smurf"), Account::new("Hide on bush")];
        faker.streamer = Some(Streamer {
            name: "Faker".into(),
            streamer_name: "FakerTV".into(),
            player_id: None,
        });
        repo.save_player(&faker).await.unwrap();

        let mut caps = Player::new("Caps");
        caps.accounts = vec![Account::new("G2 Caps")];
        repo.save_player(&caps).await.unwrap();
        let mut benched = Player::new("Benched");
        benched.streamer = Some(Streamer {
            name: "Benched".into(),
            streamer_name: "BenchedTV".into(),
            player_id: None,
        });
        repo.save_player(&benched).await.unwrap();

        let provider = Arc::new(
            FakeProvider::default()
                .in_game(
                    "Hide on bush",
                    game(
                        77,
                        vec![
                            participant("Hide on bush", 1, 100),
                            participant("Random", 2, 100),
                            participant("G2 Caps", 2, 200),
                        ],
                    ),
                )
                .ranked("Hide on bush", vec![solo("CHALLENGER", 1000)])
                .ranked("G2 Caps", vec![solo("GRANDMASTER", 700)]),
        );
        let champions: Arc<ChampionTable> = Arc::new(
            [(1, "Ahri".to_string()), (2, "Azir".to_string())]
                .into_iter()
                .collect(),
        );

        let service = LiveService::new(
            repo.clone(),
            MatchLocator::new(provider.clone(), Platform::KR),
            MatchCorrelator::new(provider, repo.clone(), champions, Platform::KR),
        );
        (service, repo)
    }

    async fn command_log_count(repo: &Repository) -> usize {
        repo.count_command_logs().await.unwrap()
    }

    #[test]
    fn replies_render_as_sentences() {
        assert_eq!(
            LookupReply::UnknownName("x".into()).to_string(),
            "x not in database."
        );
        assert_eq!(LookupReply::NoAccounts.to_string(), "Keine accounts gefunden.");
        assert_eq!(
            LookupReply::NotInGame("Faker".into()).to_string(),
            "Faker ist in keinem Game."
        );
    }

    #[tokio::test]
    async fn alias_lookup_summarizes_the_game() {
        let (service, repo) = live_service().await;

        let reply = service.lookup("fakertv", "@viewer", "fakertv").await.unwrap();

        assert_eq!(
            reply,
            LookupReply::Summary(
                "fakertv's Team: T1 Faker (Ahri) 1000 LP | Gegner: Caps (Azir) 700 LP".into()
            )
        );
        assert_eq!(command_log_count(&repo).await, 1);
    }

    #[tokio::test]
    async fn player_name_is_the_fallback() {
        let (service, _repo) = live_service().await;

        let reply = service.lookup("Faker", "viewer", "chan").await.unwrap();

        assert!(matches!(reply, LookupReply::Summary(s) if s.starts_with("Faker's Team: ")));
    }

    #[tokio::test]
    async fn streamer_lookup_ignores_player_names() {
        let (service, repo) = live_service().await;

        assert_eq!(
            service.lookup_streamer("Faker", "viewer", "Faker").await.unwrap(),
            LookupReply::UnknownName("Faker".into())
        );
        assert!(matches!(
            service.lookup_streamer("fakertv", "viewer", "fakertv").await.unwrap(),
            LookupReply::Summary(s) if s.starts_with("fakertv's Team: ")
        ));
        assert_eq!(command_log_count(&repo).await, 1);
    }

    #[tokio::test]
    async fn every_at_sign_is_stripped_from_the_requester() {
        let (service, repo) = live_service().await;

        service.lookup("FakerTV", "@@vie@wer", "chan").await.unwrap();

        assert_eq!(repo.command_log_requesters().await.unwrap(), vec!["viewer"]);
    }

    #[tokio::test]
    async fn unknown_name_and_missing_accounts() {
        let (service, repo) = live_service().await;

        assert_eq!(
            service.lookup("nobody", "viewer", "chan").await.unwrap(),
            LookupReply::UnknownName("nobody".into())
        );
        assert_eq!(
            service.lookup("Benched", "viewer", "chan").await.unwrap(),
            LookupReply::NoAccounts
        );
        assert_eq!(command_log_count(&repo).await, 0);
    }

    #[tokio::test]
    async fn idle_player_is_not_in_game() {
        let (service, repo) = live_service().await;

        let reply = service.lookup("Caps", "viewer", "chan").await.unwrap();

        assert_eq!(reply, LookupReply::NotInGame("Caps".into()));
        assert_eq!(command_log_count(&repo).await, 0);
    }
}
