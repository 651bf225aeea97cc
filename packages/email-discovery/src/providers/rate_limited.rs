//! Call-rate quota in front of a [`BusinessSearch`].
//!
//! Uses the governor crate. Unlike a crawler, an exhausted quota is not
//! waited out: it is reported to the caller with the time until the next
//! permit, so the orchestrator can surface it.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{Quota, RateLimiter};
use tracing::warn;

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::traits::search::{BusinessSearch, SearchText};

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

pub struct RateLimitedSearch<S: BusinessSearch> {
    inner: S,
    limiter: Arc<DefaultRateLimiter>,
}

impl<S: BusinessSearch> RateLimitedSearch<S> {
    /// Allow `requests_per_minute` calls, refilled evenly over the minute.
    pub fn per_minute(inner: S, requests_per_minute: NonZeroU32) -> Self {
        Self::with_quota(inner, Quota::per_minute(requests_per_minute))
    }

    pub fn with_quota(inner: S, quota: Quota) -> Self {
        Self {
            inner,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }
}

#[async_trait]
impl<S: BusinessSearch> BusinessSearch for RateLimitedSearch<S> {
    async fn grounded_business_search(&self, prompt: &str) -> CollaboratorResult<SearchText> {
        if let Err(not_until) = self.limiter.check() {
            let retry_after = not_until.wait_time_from(DefaultClock::default().now());
            warn!(
                retry_after_ms = retry_after.as_millis() as u64,
                "Grounded search quota exhausted"
            );
            return Err(CollaboratorError::RateLimited { retry_after });
        }
        self.inner.grounded_business_search(prompt).await
    }
}
