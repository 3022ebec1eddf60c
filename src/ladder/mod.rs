//! Client for the public pro-player ladder the roster is scraped from.

mod client;
mod types;

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

pub use client::LadderClient;
pub use types::{LadderEntry, Profile};

#[derive(Debug, Error)]
pub enum LadderError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ladder responded with status {0}")]
    Status(u16),

    #[error("Response body too short ({0} bytes)")]
    BodyTooShort(usize),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Paginated ladder plus per-player profiles.
#[async_trait]
pub trait LadderSource: Send + Sync + Debug {
    /// Pages start at 1.
    async fn fetch_page(&self, page: usize) -> Result<Vec<LadderEntry>, LadderError>;

    async fn fetch_profile(&self, name: &str) -> Result<Profile, LadderError>;
}
