use std::env;
use std::num::NonZeroU32;

use crate::error::AppError;
use crate::riot::Platform;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub riot_api_key: String,
    pub database_url: String,
    pub platform: Platform,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub ladder_rate_limit_per_second: NonZeroU32,
    pub ladder_base_url: String,
    pub ladder_player_budget: usize,
    pub ladder_page_size: usize,
    pub scrape_interval_secs: u64,
    pub streamers_file: String,
    pub http_bind: String,
    pub ddragon_version: String,
    pub show_average_lp: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;
        const DEFAULT_LADDER_RATE_LIMIT_PER_SECOND: u32 = 2;
        const DEFAULT_LADDER_BASE_URL: &str = "https://api.lolpros.gg/es";
        const DEFAULT_LADDER_PLAYER_BUDGET: usize = 50;
        const DEFAULT_LADDER_PAGE_SIZE: usize = 50;
        const DEFAULT_SCRAPE_INTERVAL_SECS: u64 = 6 * 60 * 60;
        const DEFAULT_DDRAGON_VERSION: &str = "14.24.1";

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| AppError::Config("DISCORD_TOKEN must be set".into()))?;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:mitspieler.db".into());

        let platform = match env::var("PLATFORM") {
            Ok(value) => value.parse()?,
            Err(_) => Platform::EUW1,
        };

        let riot_rate_limit_per_second =
            non_zero_from_env("RIOT_RATE_LIMIT_PER_SECOND", DEFAULT_RIOT_RATE_LIMIT_PER_SECOND);
        let ladder_rate_limit_per_second = non_zero_from_env(
            "LADDER_RATE_LIMIT_PER_SECOND",
            DEFAULT_LADDER_RATE_LIMIT_PER_SECOND,
        );

        let ladder_base_url =
            env::var("LADDER_BASE_URL").unwrap_or_else(|_| DEFAULT_LADDER_BASE_URL.into());

        let ladder_player_budget = parsed_from_env("LADDER_PLAYER_BUDGET")
            .unwrap_or(DEFAULT_LADDER_PLAYER_BUDGET);

        let ladder_page_size = parsed_from_env("LADDER_PAGE_SIZE")
            .filter(|size: &usize| *size > 0)
            .unwrap_or(DEFAULT_LADDER_PAGE_SIZE);

        let scrape_interval_secs =
            parsed_from_env("SCRAPE_INTERVAL_SECS").unwrap_or(DEFAULT_SCRAPE_INTERVAL_SECS);

        let streamers_file =
            env::var("STREAMERS_FILE").unwrap_or_else(|_| "streamers.json".into());

        let http_bind = env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:3000".into());

        let ddragon_version =
            env::var("DDRAGON_VERSION").unwrap_or_else(|_| DEFAULT_DDRAGON_VERSION.into());

        let show_average_lp = parsed_from_env("SHOW_AVERAGE_LP").unwrap_or(true);

        Ok(Self {
            discord_token,
            riot_api_key,
            database_url,
            platform,
            riot_rate_limit_per_second,
            ladder_rate_limit_per_second,
            ladder_base_url,
            ladder_player_budget,
            ladder_page_size,
            scrape_interval_secs,
            streamers_file,
            http_bind,
            ddragon_version,
            show_average_lp,
        })
    }
}

fn parsed_from_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn non_zero_from_env(key: &str, default: u32) -> NonZeroU32 {
    parsed_from_env(key)
        .and_then(NonZeroU32::new)
        .unwrap_or_else(|| NonZeroU32::new(default).unwrap_or(NonZeroU32::MIN))
}
