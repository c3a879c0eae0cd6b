//! Per-identity operation rate limiting

use std::sync::Arc;

use tracing::warn;

use sv_shared::RateLimitConfig;

use crate::errors::DomainResult;
use crate::keys::IdentityKey;
use crate::store::CodeStore;

/// The two independently limited action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    /// Issuing a code
    Send,
    /// Attempting a verification
    Verify,
}

impl OperationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationClass::Send => "send",
            OperationClass::Verify => "verify",
        }
    }
}

/// Enforces "at most N operations per identity per window" with an atomic
/// counter per (class, identity).
///
/// The counter's expiry is set exactly once, when the increment creates it,
/// and is never extended on later increments: the window starts at first use
/// and does not slide.
pub struct RateLimiter<S: CodeStore> {
    store: Arc<S>,
    config: RateLimitConfig,
}

impl<S: CodeStore> RateLimiter<S> {
    pub fn new(store: Arc<S>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    fn max_for(&self, class: OperationClass) -> i64 {
        match class {
            OperationClass::Send => self.config.send_per_hour,
            OperationClass::Verify => self.config.verify_per_hour,
        }
    }

    /// Count one operation and report whether the identity is over its
    /// limit for the class.
    ///
    /// The increment and the expiry are two separate store commands, so a
    /// crash between them can leave a counter with no expiry. A counter
    /// observed over the limit with no expiry is given a fresh window here;
    /// otherwise it would count forever and block the identity permanently.
    ///
    /// Fail-closed: any store failure propagates as `Err`, and the caller
    /// must deny the operation.
    pub async fn check_limit(
        &self,
        class: OperationClass,
        identity: IdentityKey<'_>,
    ) -> DomainResult<bool> {
        let key = identity.counter_key(class);
        let max = self.max_for(class);
        let window = self.config.window_seconds;

        let count = self.store.incr(&key).await?;
        if count == 1 {
            self.store.expire(&key, window).await?;
        }
        if count > max {
            if self.store.ttl(&key).await?.is_none() {
                warn!(key = %key, count, "rate counter had no expiry, resetting its window");
                self.store.expire(&key, window).await?;
            }
            return Ok(true);
        }
        Ok(false)
    }
}
