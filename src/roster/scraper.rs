use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinSet;
use tokio::time::interval;
use tracing::{debug, error, info, instrument, warn};

use crate::error::AppError;
use crate::ladder::{LadderError, LadderSource};

use super::merger::{MergeOutcome, merge};
use super::{RosterStore, StreamerAliases};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Ladder(#[from] LadderError),
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Tally of one scrape run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub pages_ok: usize,
    pub pages_failed: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl ScrapeReport {
    fn record(&mut self, outcome: &MergeOutcome) {
        match outcome {
            MergeOutcome::Created(_) => self.created += 1,
            MergeOutcome::Updated(_) => self.updated += 1,
            MergeOutcome::Unchanged(_) => self.unchanged += 1,
        }
    }

    fn absorb(&mut self, other: ScrapeReport) {
        self.pages_ok += other.pages_ok;
        self.pages_failed += other.pages_failed;
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }
}

impl fmt::Display for ScrapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pages {}/{} ok, {} created, {} updated, {} unchanged, {} failed",
            self.pages_ok,
            self.pages_ok + self.pages_failed,
            self.created,
            self.updated,
            self.unchanged,
            self.failed
        )
    }
}

type LockMap = Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>;

/// One async lock per player name, shared by every task of a run. An entry
/// lives only while some task holds or waits for it.
#[derive(Debug, Clone, Default)]
struct NameLocks(LockMap);

impl NameLocks {
    async fn lock(&self, name: &str) -> NameGuard {
        let lock = {
            let mut locks = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(name.to_string()).or_default().clone()
        };
        NameGuard {
            guard: Some(lock.lock_owned().await),
            locks: self.0.clone(),
            name: name.to_string(),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

struct NameGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
    name: String,
}

impl Drop for NameGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if locks
            .get(&self.name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.name);
        }
    }
}

/// Walks the ladder and folds every profile into the roster.
#[derive(Debug, Clone)]
pub struct RosterScraper {
    ladder: Arc<dyn LadderSource>,
    store: Arc<dyn RosterStore>,
    streamers: Arc<StreamerAliases>,
    page_size: usize,
    player_budget: usize,
    name_locks: NameLocks,
}

impl RosterScraper {
    pub fn new(
        ladder: Arc<dyn LadderSource>,
        store: Arc<dyn RosterStore>,
        streamers: Arc<StreamerAliases>,
        page_size: usize,
        player_budget: usize,
    ) -> Self {
        Self {
            ladder,
            store,
            streamers,
            page_size: page_size.max(1),
            player_budget,
            name_locks: NameLocks::default(),
        }
    }

    /// Scrapes `player_budget` ladder entries. Every page and every player is
    /// an independent unit; a failure only abandons that unit.
    #[instrument(skip(self), fields(budget = self.player_budget, page_size = self.page_size))]
    pub async fn run(&self) -> ScrapeReport {
        let page_count = self.player_budget.div_ceil(self.page_size);
        let mut pages = JoinSet::new();

        for page in 1..=page_count {
            let quota = (self.player_budget - (page - 1) * self.page_size).min(self.page_size);
            let scraper = self.clone();
            pages.spawn(async move { (page, scraper.scrape_page(page, quota).await) });
        }

        let mut report = ScrapeReport::default();
        while let Some(joined) = pages.join_next().await {
            match joined {
                Ok((_, Ok(page_report))) => report.absorb(page_report),
                Ok((page, Err(e))) => {
                    warn!(page, error = %e, "🪜 ⚠️ Ladder page failed");
                    report.pages_failed += 1;
                }
                Err(e) => {
                    error!(error = ?e, "🪜 ❌ Page task panicked");
                    report.pages_failed += 1;
                }
            }
        }

        report
    }

    #[instrument(skip(self))]
    async fn scrape_page(&self, page: usize, quota: usize) -> Result<ScrapeReport, ScrapeError> {
        let mut entries = self.ladder.fetch_page(page).await?;
        entries.truncate(quota);
        debug!(count = entries.len(), "🪜 Ladder page fetched");

        let mut players = JoinSet::new();
        for entry in entries {
            let scraper = self.clone();
            players.spawn(async move {
                let res = scraper.scrape_player(&entry.name).await;
                (entry.name, res)
            });
        }

        let mut report = ScrapeReport {
            pages_ok: 1,
            ..Default::default()
        };
        while let Some(joined) = players.join_next().await {
            match joined {
                Ok((_, Ok(outcome))) => report.record(&outcome),
                Ok((name, Err(e))) => {
                    warn!(player = %name, error = %e, "🪜 ⚠️ Failed to scrape player");
                    report.failed += 1;
                }
                Err(e) => {
                    error!(error = ?e, "🪜 ❌ Player task panicked");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    #[instrument(skip(self))]
    async fn scrape_player(&self, name: &str) -> Result<MergeOutcome, ScrapeError> {
        let profile = self.ladder.fetch_profile(name).await?;

        let _guard = self.name_locks.lock(&profile.name).await;
        let existing = self.store.find_player_by_name(&profile.name).await?;

        let outcome = merge(existing, &profile, &self.streamers);
        if !outcome.is_changed() {
            return Ok(outcome);
        }

        let saved = self.store.save_player(outcome.player()).await?;
        match outcome {
            MergeOutcome::Created(_) => {
                info!(player = %saved.name, accounts = saved.accounts.len(), "🪜 ✅ Player added");
                Ok(MergeOutcome::Created(saved))
            }
            _ => {
                debug!(player = %saved.name, "🪜 Player updated");
                Ok(MergeOutcome::Updated(saved))
            }
        }
    }

    /// Attaches every known alias whose player exists without a streamer.
    /// Returns how many were attached.
    #[instrument(skip(self))]
    pub async fn backfill_streamers(&self) -> usize {
        let mut attached = 0;

        for name in self.streamers.player_names() {
            match self.attach_streamer(name).await {
                Ok(true) => attached += 1,
                Ok(false) => {}
                Err(e) => warn!(player = %name, error = ?e, "🎥 ⚠️ Failed to attach streamer"),
            }
        }

        attached
    }

    async fn attach_streamer(&self, name: &str) -> Result<bool, AppError> {
        let _guard = self.name_locks.lock(name).await;

        let Some(mut player) = self.store.find_player_by_name(name).await? else {
            return Ok(false);
        };
        if player.streamer.is_some() {
            return Ok(false);
        }

        player.streamer = self.streamers.streamer_for(name);
        self.store.save_player(&player).await?;
        Ok(player.streamer.is_some())
    }
}

pub async fn start_scraping(scraper: RosterScraper, interval_secs: u64) {
    let mut interval = interval(Duration::from_secs(interval_secs));

    info!(interval_secs, "🪜 Roster scraper started");

    loop {
        interval.tick().await;

        let report = scraper.run().await;
        info!(
            pages_ok = report.pages_ok,
            pages_failed = report.pages_failed,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failed,
            "🪜 Scrape finished: {}",
            report
        );

        let attached = scraper.backfill_streamers().await;
        if attached > 0 {
            info!(attached, "🎥 Streamers attached");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;
    use crate::db::{Player, Repository, Streamer, test_repository};
    use crate::ladder::{LadderEntry, Profile};

    #[derive(Debug, Default)]
    struct FakeLadder {
        pages: HashMap<usize, Vec<&'static str>>,
        failing_pages: HashSet<usize>,
        profiles: HashMap<&'static str, Profile>,
    }

    impl FakeLadder {
        fn page(mut self, page: usize, names: &[&'static str]) -> Self {
            self.pages.insert(page, names.to_vec());
            for &name in names {
                self.profiles
                    .entry(name)
                    .or_insert_with(|| profile(name, &[name]));
            }
            self
        }

        fn failing(mut self, page: usize) -> Self {
            self.failing_pages.insert(page);
            self
        }

        fn profile(mut self, entry: &'static str, profile: Profile) -> Self {
            self.profiles.insert(entry, profile);
            self
        }

        fn without_profile(mut self, entry: &'static str) -> Self {
            self.profiles.remove(entry);
            self
        }
    }

    #[async_trait]
    impl LadderSource for FakeLadder {
        async fn fetch_page(&self, page: usize) -> Result<Vec<LadderEntry>, LadderError> {
            if self.failing_pages.contains(&page) {
                return Err(LadderError::Status(500));
            }
            Ok(self
                .pages
                .get(&page)
                .map(|names| {
                    names
                        .iter()
                        .map(|name| LadderEntry {
                            name: name.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn fetch_profile(&self, name: &str) -> Result<Profile, LadderError> {
            self.profiles
                .get(name)
                .cloned()
                .ok_or(LadderError::Status(404))
        }
    }

    fn profile(name: &str, accounts: &[&str]) -> Profile {
        Profile {
            name: name.into(),
            position: Some("Mid".into()),
            team_tag: None,
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
        }
    }

    async fn scraper(
        ladder: FakeLadder,
        streamers: StreamerAliases,
        page_size: usize,
        budget: usize,
    ) -> (RosterScraper, Arc<Repository>) {
        let repo = Arc::new(test_repository().await);
        let scraper = RosterScraper::new(
            Arc::new(ladder),
            repo.clone(),
            Arc::new(streamers),
            page_size,
            budget,
        );
        (scraper, repo)
    }

    #[tokio::test]
    async fn failing_page_does_not_affect_the_others() {
        let ladder = FakeLadder::default()
            .page(1, &["A", "B"])
            .page(2, &["C", "D"])
            .page(3, &["E", "F"])
            .failing(2);
        let (scraper, repo) = scraper(ladder, StreamerAliases::default(), 2, 6).await;

        let report = scraper.run().await;

        assert_eq!(report.pages_ok, 2);
        assert_eq!(report.pages_failed, 1);
        assert_eq!(report.created, 4);
        for name in ["A", "B", "E", "F"] {
            assert!(repo.find_player_by_name(name).await.unwrap().is_some());
        }
        for name in ["C", "D"] {
            assert!(repo.find_player_by_name(name).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn budget_truncates_the_last_page() {
        let ladder = FakeLadder::default()
            .page(1, &["A", "B"])
            .page(2, &["C", "D"]);
        let (scraper, repo) = scraper(ladder, StreamerAliases::default(), 2, 3).await;

        let report = scraper.run().await;

        assert_eq!(report.created, 3);
        assert!(repo.find_player_by_name("C").await.unwrap().is_some());
        assert!(repo.find_player_by_name("D").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failing_player_is_skipped() {
        let ladder = FakeLadder::default()
            .page(1, &["A", "B", "C"])
            .without_profile("B");
        let (scraper, repo) = scraper(ladder, StreamerAliases::default(), 50, 3).await;

        let report = scraper.run().await;

        assert_eq!(report.pages_ok, 1);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 1);
        assert!(repo.find_player_by_name("B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_run_leaves_players_unchanged() {
        let ladder = FakeLadder::default().page(1, &["A", "B"]);
        let (scraper, _repo) = scraper(ladder, StreamerAliases::default(), 50, 2).await;

        scraper.run().await;
        let report = scraper.run().await;

        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 0);
        assert_eq!(report.unchanged, 2);
    }

    #[tokio::test]
    async fn entries_of_the_same_player_are_merged() {
        let ladder = FakeLadder::default()
            .page(1, &["Hide on bush", "T1 Faker", "Faker smurf"])
            .profile("Hide on bush", profile("Faker", &["Hide on bush"]))
            .profile("T1 Faker", profile("Faker", &["T1 Faker", "hide on BUSH"]))
            .profile("Faker smurf", profile("Faker", &["Faker smurf"]));
        let (scraper, repo) = scraper(ladder, StreamerAliases::default(), 50, 3).await;

        let report = scraper.run().await;

        assert_eq!(report.created, 1);
        assert_eq!(report.updated + report.unchanged, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(scraper.name_locks.len(), 0);
        let player = repo.find_player_by_name("Faker").await.unwrap().unwrap();
        assert_eq!(player.accounts.len(), 3);
        assert!(player.has_account("T1 Faker"));
        assert!(player.has_account("Faker smurf"));
    }

    #[tokio::test]
    async fn backfill_attaches_missing_streamers() {
        let streamers: StreamerAliases = [
            Streamer {
                name: "A".into(),
                streamer_name: "a_live".into(),
                player_id: None,
            },
            Streamer {
                name: "Nobody".into(),
                streamer_name: "nobody_live".into(),
                player_id: None,
            },
        ]
        .into_iter()
        .collect();
        let (scraper, repo) = scraper(FakeLadder::default(), streamers, 50, 0).await;
        repo.save_player(&Player::new("A")).await.unwrap();

        assert_eq!(scraper.backfill_streamers().await, 1);
        assert_eq!(scraper.backfill_streamers().await, 0);

        let streamer = repo.find_streamer_by_alias("A_LIVE").await.unwrap().unwrap();
        assert_eq!(streamer.name, "A");
    }

    #[tokio::test]
    async fn name_lock_entries_are_released() {
        let locks = NameLocks::default();

        let first = locks.lock("Faker").await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("Faker").await;
            })
        };
        tokio::task::yield_now().await;
        let other = locks.lock("Caps").await;
        assert_eq!(locks.len(), 2);

        drop(other);
        assert_eq!(locks.len(), 1);

        drop(first);
        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
