//! The persisted roster of tracked pro players and how it is kept in sync
//! with the ladder.

mod merger;
pub mod scraper;
mod store;
mod streamers;

pub use scraper::RosterScraper;
pub use store::RosterStore;
pub use streamers::StreamerAliases;
