//! Rate limiting for mutating endpoints.
//!
//! One keyed limiter per process (key = principal id), built on the governor
//! crate and injected through application state. Advisory only: it resets on
//! process restart and is not a correctness mechanism.

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::routes::error::ApiError;

/// Per-principal rate limiter state
pub type KeyedLimiter = RateLimiter<Uuid, DefaultKeyedStateStore<Uuid>, DefaultClock>;

/// Shared rate limiter handle held in application state
pub type SharedRateLimiter = Arc<KeyedLimiter>;

const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Create a keyed rate limiter with the given per-minute quota.
pub fn create_rate_limiter(requests_per_minute: u32) -> SharedRateLimiter {
    let quota = Quota::per_minute(
        NonZeroU32::new(requests_per_minute)
            .unwrap_or(NonZeroU32::new(DEFAULT_REQUESTS_PER_MINUTE).expect("nonzero default")),
    );
    Arc::new(RateLimiter::keyed(quota))
}

/// Check the caller's budget; mutating handlers call this before any work.
pub fn check_rate_limit(limiter: &KeyedLimiter, principal_id: Uuid) -> Result<(), ApiError> {
    match limiter.check_key(&principal_id) {
        Ok(_) => Ok(()),
        Err(_) => {
            warn!("Rate limit exceeded for principal {}", principal_id);
            Err(ApiError::RateLimited)
        }
    }
}
