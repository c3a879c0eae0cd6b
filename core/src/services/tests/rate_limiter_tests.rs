//! Unit tests for the per-identity rate limiter

use std::sync::Arc;

use sv_shared::RateLimitConfig;

use super::mocks::MockStore;
use crate::keys::IdentityKey;
use crate::services::rate_limiter::{OperationClass, RateLimiter};

const PHONE: &str = "13812345678";
const TEMPLATE: &str = "SMS_001";

fn limiter(store: &Arc<MockStore>, send: i64, verify: i64) -> RateLimiter<MockStore> {
    RateLimiter::new(
        Arc::clone(store),
        RateLimitConfig {
            send_per_hour: send,
            verify_per_hour: verify,
            window_seconds: 3600,
        },
    )
}

#[tokio::test]
async fn test_allows_up_to_the_limit_then_blocks() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 3, 3);
    let identity = IdentityKey::new(PHONE, TEMPLATE);

    for _ in 0..3 {
        let over = limiter
            .check_limit(OperationClass::Send, identity)
            .await
            .unwrap();
        assert!(!over);
    }

    // the (max + 1)-th call is denied
    let over = limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap();
    assert!(over);
}

#[tokio::test]
async fn test_distinct_identities_are_unaffected() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 1, 1);
    let first = IdentityKey::new(PHONE, TEMPLATE);
    let other_phone = IdentityKey::new("13900000000", TEMPLATE);
    let other_template = IdentityKey::new(PHONE, "SMS_002");

    assert!(!limiter
        .check_limit(OperationClass::Send, first)
        .await
        .unwrap());
    assert!(limiter
        .check_limit(OperationClass::Send, first)
        .await
        .unwrap());

    assert!(!limiter
        .check_limit(OperationClass::Send, other_phone)
        .await
        .unwrap());
    assert!(!limiter
        .check_limit(OperationClass::Send, other_template)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_send_and_verify_quotas_are_independent() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 1, 2);
    let identity = IdentityKey::new(PHONE, TEMPLATE);

    // exhaust the send quota
    assert!(!limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap());
    assert!(limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap());

    // verify attempts still pass on their own counter
    assert!(!limiter
        .check_limit(OperationClass::Verify, identity)
        .await
        .unwrap());
    assert!(!limiter
        .check_limit(OperationClass::Verify, identity)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_window_is_set_once_at_creation() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 10, 10);
    let identity = IdentityKey::new(PHONE, TEMPLATE);
    let key = identity.counter_key(OperationClass::Send);

    for _ in 0..5 {
        limiter
            .check_limit(OperationClass::Send, identity)
            .await
            .unwrap();
    }

    // only the creating increment set an expiry; later increments must not
    // extend the window
    assert_eq!(store.expire_calls_for(&key), 1);
    assert_eq!(store.ttl_of(&key), Some(3600));
}

#[tokio::test]
async fn test_window_restarts_after_expiry() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 1, 1);
    let identity = IdentityKey::new(PHONE, TEMPLATE);
    let key = identity.counter_key(OperationClass::Send);

    assert!(!limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap());
    assert!(limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap());

    store.expire_now(&key);

    assert!(!limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_self_heals_counter_that_lost_its_expiry() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 3, 3);
    let identity = IdentityKey::new(PHONE, TEMPLATE);
    let key = identity.counter_key(OperationClass::Send);

    store.force_counter_without_ttl(&key, 10);

    let over = limiter
        .check_limit(OperationClass::Send, identity)
        .await
        .unwrap();
    assert!(over);
    // the stuck counter got a fresh window instead of living forever
    assert_eq!(store.ttl_of(&key), Some(3600));
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = Arc::new(MockStore::new());
    let limiter = limiter(&store, 3, 3);
    let identity = IdentityKey::new(PHONE, TEMPLATE);

    store.fail_all(true);

    let result = limiter.check_limit(OperationClass::Send, identity).await;
    assert!(result.is_err());
}
