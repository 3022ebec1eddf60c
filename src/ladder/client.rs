use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::limiter::RequestLimiter;
use crate::metrics::RequestMetrics;

use super::types::{LadderEntry, Profile, ProfileDto};
use super::{LadderError, LadderSource};

/// Bodies shorter than this (after trimming) cannot hold a JSON document.
const MIN_BODY_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct LadderClient {
    http: reqwest::Client,
    limiter: RequestLimiter,
    base_url: String,
    metrics: Arc<RequestMetrics>,
}

impl LadderClient {
    pub fn new(base_url: impl Into<String>, limiter: RequestLimiter) -> Self {
        Self {
            http: reqwest::Client::new(),
            limiter,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            metrics: RequestMetrics::new("ladder"),
        }
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        &self.metrics
    }

    fn ladder_url(&self, page: usize) -> String {
        format!("{}/ladder?page={}&sort=rank&order=desc", self.base_url, page)
    }

    fn player_url(&self, name: &str) -> String {
        let slug = name.replace(' ', "-");
        format!("{}/players/{}", self.base_url, urlencoding::encode(&slug))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, LadderError> {
        if !self.limiter.try_acquire() {
            trace!("[LADDER::CLIENT] waiting for rate limit");
            self.limiter.acquire().await;
        }
        self.metrics.inc();
        trace!(url, "[LADDER::CLIENT] GET");

        let res = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LadderError::Status(status.as_u16()));
        }

        let body = res.bytes().await?;
        let trimmed = body.trim_ascii();
        if trimmed.len() < MIN_BODY_LEN {
            return Err(LadderError::BodyTooShort(trimmed.len()));
        }

        Ok(serde_json::from_slice(trimmed)?)
    }
}

#[async_trait]
impl LadderSource for LadderClient {
    async fn fetch_page(&self, page: usize) -> Result<Vec<LadderEntry>, LadderError> {
        self.get(&self.ladder_url(page)).await
    }

    async fn fetch_profile(&self, name: &str) -> Result<Profile, LadderError> {
        let dto: ProfileDto = self.get(&self.player_url(name)).await?;
        Ok(dto.into())
    }
}
