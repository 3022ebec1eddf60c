use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use crate::ladder::LadderClient;
use crate::limiter::RequestLimiter;
use crate::live::{AverageLpPolicy, LiveService, MatchCorrelator, MatchLocator};
use crate::riot::{ChampionTable, GameDataProvider, RiotClient};
use crate::roster::{RosterScraper, StreamerAliases, scraper};

mod config;
mod db;
mod discord;
mod error;
mod http;
mod ladder;
mod limiter;
mod live;
mod logging;
mod metrics;
mod riot;
mod roster;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    logging::init();

    info!("🐙 Starting...");

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let repository = Arc::new(Repository::new(pool));

    let riot = Arc::new(RiotClient::new(
        config.riot_api_key.clone(),
        RequestLimiter::per_second(config.riot_rate_limit_per_second),
        config.ddragon_version.clone(),
    ));
    riot.metrics().spawn_log_loop();

    let ladder = Arc::new(LadderClient::new(
        config.ladder_base_url.clone(),
        RequestLimiter::per_second(config.ladder_rate_limit_per_second),
    ));
    ladder.metrics().spawn_log_loop();

    let champions = match riot.list_champions().await {
        Ok(champions) => {
            info!(count = champions.len(), "🏆 Champions loaded");
            champions
        }
        Err(e) => {
            warn!(error = ?e, "🏆 ⚠️ Failed to load champions, names will be empty");
            ChampionTable::default()
        }
    };

    let streamers = match StreamerAliases::load(&config.streamers_file) {
        Ok(streamers) => streamers,
        Err(e) => {
            warn!(
                error = ?e,
                path = %config.streamers_file,
                "🎥 ⚠️ No streamer aliases loaded"
            );
            StreamerAliases::default()
        }
    };

    let roster_scraper = RosterScraper::new(
        ladder,
        repository.clone(),
        Arc::new(streamers),
        config.ladder_page_size,
        config.ladder_player_budget,
    );
    tokio::spawn(scraper::start_scraping(
        roster_scraper,
        config.scrape_interval_secs,
    ));

    let average = config.show_average_lp.then(AverageLpPolicy::default);
    let live = Arc::new(LiveService::new(
        repository.clone(),
        MatchLocator::new(riot.clone(), config.platform),
        MatchCorrelator::new(riot, repository.clone(), Arc::new(champions), config.platform)
            .with_average(average),
    ));

    let state = http::AppState {
        live: live.clone(),
        store: repository,
    };
    let bind = config.http_bind.clone();
    tokio::spawn(async move {
        if let Err(e) = http::serve(&bind, state).await {
            error!(error = ?e, "🌐 ❌ HTTP server stopped");
        }
    });

    let framework = discord::create_framework(discord::Data { live });
    let mut client =
        serenity::ClientBuilder::new(&config.discord_token, serenity::GatewayIntents::non_privileged())
            .framework(framework)
            .await?;

    info!(platform = %config.platform, "🐙 Connecting to Discord");
    client.start().await?;

    Ok(())
}
