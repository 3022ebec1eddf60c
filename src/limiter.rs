//! Token bucket shared by every outbound client.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

/// One token per outbound request. Cloning shares the same bucket.
#[derive(Debug, Clone)]
pub struct RequestLimiter {
    inner: Arc<DefaultDirectRateLimiter>,
}

impl RequestLimiter {
    pub fn per_second(requests: NonZeroU32) -> Self {
        Self::with_quota(Quota::per_second(requests))
    }

    pub fn with_quota(quota: Quota) -> Self {
        Self {
            inner: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Waits until a token is available and consumes it.
    pub async fn acquire(&self) {
        self.inner.until_ready().await;
    }

    /// Consumes a token if one is available right now.
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }
}
