mod champions;
mod client;
mod endpoints;
mod provider;
mod region;
mod types;

pub use champions::ChampionTable;
pub use client::RiotClient;
pub use provider::GameDataProvider;
pub use region::{Platform, Region};
pub use types::*;
