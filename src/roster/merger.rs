use std::collections::HashSet;

use crate::db::{Account, Player};
use crate::ladder::Profile;

use super::StreamerAliases;

/// Result of folding a scraped profile into the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Created(Player),
    Updated(Player),
    Unchanged(Player),
}

impl MergeOutcome {
    pub fn player(&self) -> &Player {
        match self {
            Self::Created(player) | Self::Updated(player) | Self::Unchanged(player) => player,
        }
    }

    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged(_))
    }
}

/// Merges `profile` into `existing` (looked up by exact name).
///
/// Accounts are only ever appended and deduplicated ignoring case. Position
/// and team tag take the scraped values. A streamer alias is attached only
/// when the player has none.
pub fn merge(
    existing: Option<Player>,
    profile: &Profile,
    streamers: &StreamerAliases,
) -> MergeOutcome {
    let Some(mut player) = existing else {
        let mut player = Player::new(&profile.name);
        player.position = profile.position.clone();
        player.team_tag = profile.team_tag.clone();
        append_accounts(&mut player, &profile.accounts);
        player.streamer = streamers.streamer_for(&profile.name);
        return MergeOutcome::Created(player);
    };

    let mut changed = false;

    if player.position != profile.position {
        player.position = profile.position.clone();
        changed = true;
    }
    if player.team_tag != profile.team_tag {
        player.team_tag = profile.team_tag.clone();
        changed = true;
    }
    if append_accounts(&mut player, &profile.accounts) > 0 {
        changed = true;
    }
    if player.streamer.is_none() {
        if let Some(streamer) = streamers.streamer_for(&player.name) {
            player.streamer = Some(streamer);
            changed = true;
        }
    }

    if changed {
        MergeOutcome::Updated(player)
    } else {
        MergeOutcome::Unchanged(player)
    }
}

/// Appends the names not yet linked. Returns how many were added.
fn append_accounts(player: &mut Player, incoming: &[String]) -> usize {
    let mut seen: HashSet<String> = player
        .accounts
        .iter()
        .map(|account| account.summoner_name.to_lowercase())
        .collect();

    let before = player.accounts.len();
    for name in incoming {
        if seen.insert(name.to_lowercase()) {
            player.accounts.push(Account::new(name));
        }
    }
    player.accounts.len() - before
}
