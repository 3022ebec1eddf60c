use std::fmt::Debug;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::error::AppError;
use crate::limiter::RequestLimiter;
use crate::metrics::RequestMetrics;

use super::region::{Platform, Region};

const DDRAGON_BASE_URL: &str = "https://ddragon.leagueoflegends.com";

#[derive(Clone)]
pub struct RiotClient {
    http: reqwest::Client,
    limiter: RequestLimiter,
    /// Riot API Key
    key: String,
    metrics: Arc<RequestMetrics>,
    ddragon_version: String,
    base_url: Option<String>,
}

impl Debug for RiotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiotClient")
            .field("ddragon_version", &self.ddragon_version)
            .field("requests", &self.metrics.total())
            .finish()
    }
}

impl RiotClient {
    pub fn new(key: String, limiter: RequestLimiter, ddragon_version: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            limiter,
            key,
            metrics: RequestMetrics::new("riot"),
            ddragon_version,
            base_url: None,
        }
    }

    /// Route every request to a single host instead of the Riot clusters.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        &self.metrics
    }

    pub(crate) fn ddragon_version(&self) -> &str {
        &self.ddragon_version
    }

    pub(crate) fn platform_url(&self, platform: Platform) -> String {
        self.base_url.clone().unwrap_or_else(|| platform.base_url())
    }

    pub(crate) fn region_url(&self, region: Region) -> String {
        self.base_url.clone().unwrap_or_else(|| region.base_url())
    }

    pub(crate) fn ddragon_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DDRAGON_BASE_URL.to_string())
    }

    /// Rate limited, authenticated GET.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let res = self.send(url).await?;
        decode(res).await
    }

    /// Like [`RiotClient::get`], but a 404 is an absent result instead of an error.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, AppError> {
        let res = self.send(url).await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(res).await.map(Some)
    }

    /// Unauthenticated GET for static assets, not subject to the API quota.
    pub(crate) async fn get_static<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        trace!(url, "[RIOT::CLIENT] static GET");
        let res = self.http.get(url).send().await?;
        decode(res).await
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, AppError> {
        if !self.limiter.try_acquire() {
            trace!("[RIOT::CLIENT] waiting for rate limit");
            self.limiter.acquire().await;
        }
        self.metrics.inc();
        trace!(url, "[RIOT::CLIENT] GET");

        Ok(self
            .http
            .get(url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await?)
    }
}

async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, AppError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let message = res.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), message, "🛰️ ⚠️ Riot API request failed");
    Err(AppError::RiotApi {
        status: status.as_u16(),
        message,
    })
}
