//! End-to-end handler tests over an in-memory store

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{test, web, App};
use async_trait::async_trait;

use sv_api::routes;
use sv_api::state::AppState;
use sv_core::{
    CodeIssuer, CodeStore, IdentityKey, RateLimiter, StoreError, VerificationConfig, Verifier,
};
use sv_infra::MockSmsNotifier;
use sv_shared::RateLimitConfig;

const PHONE: &str = "13812345678";
const TEMPLATE: &str = "SMS_001";

/// Minimal in-memory store; TTLs are recorded but never elapse
#[derive(Default)]
struct TestStore {
    counters: Mutex<HashMap<String, i64>>,
    hashes: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl TestStore {
    fn stored_code(&self, phone: &str, template_code: &str) -> Option<String> {
        let key = IdentityKey::new(phone, template_code).session_key();
        self.hashes
            .lock()
            .unwrap()
            .get(&key)
            .and_then(|session| session.get("code").cloned())
    }

    fn is_empty(&self) -> bool {
        self.counters.lock().unwrap().is_empty() && self.hashes.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl CodeStore for TestStore {
    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut counters = self.counters.lock().unwrap();
        let count = counters.entry(key.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn expire(&self, _key: &str, _ttl_secs: u64) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ttl(&self, _key: &str) -> Result<Option<i64>, StoreError> {
        Ok(Some(3600))
    }

    async fn hash_set_with_expiry(
        &self,
        key: &str,
        fields: &[(&str, &str)],
        _ttl_secs: u64,
    ) -> Result<(), StoreError> {
        let mut hashes = self.hashes.lock().unwrap();
        let entry = hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            entry.insert(field.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        Ok(self
            .hashes
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.counters.lock().unwrap().contains_key(key)
            || self.hashes.lock().unwrap().contains_key(key))
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
        for key in keys {
            self.counters.lock().unwrap().remove(key);
            self.hashes.lock().unwrap().remove(key);
        }
        Ok(())
    }
}

fn app_state(
    send_per_hour: i64,
    verify_per_hour: i64,
    notifier: MockSmsNotifier,
) -> (Arc<TestStore>, web::Data<AppState<TestStore>>) {
    let store = Arc::new(TestStore::default());
    let state = web::Data::new(AppState {
        rate_limiter: Arc::new(RateLimiter::new(
            Arc::clone(&store),
            RateLimitConfig {
                send_per_hour,
                verify_per_hour,
                window_seconds: 3600,
            },
        )),
        issuer: Arc::new(CodeIssuer::new(
            Arc::clone(&store),
            VerificationConfig::new(6),
        )),
        verifier: Arc::new(Verifier::new(Arc::clone(&store))),
        notifier: Arc::new(notifier),
    });
    (store, state)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(routes::configure::<TestStore>),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let request = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json($app, request).await;
        body
    }};
}

#[actix_web::test]
async fn test_ping() {
    let (_, state) = app_state(10, 10, MockSmsNotifier::new());
    let app = init_app!(state);

    let request = test::TestRequest::get().uri("/ping").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body, serde_json::json!("pong"));
}

#[actix_web::test]
async fn test_send_then_verify_round_trip() {
    let (store, state) = app_state(10, 10, MockSmsNotifier::new());
    let app = init_app!(state);

    let body = post_json!(
        &app,
        "/sms/code/send",
        serde_json::json!({ "phone": PHONE, "template_code": TEMPLATE })
    );
    assert_eq!(body["status"], "ok");
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 16);

    let code = store.stored_code(PHONE, TEMPLATE).unwrap();
    assert_eq!(code.len(), 6);

    let verify_request = serde_json::json!({
        "phone": PHONE,
        "template_code": TEMPLATE,
        "token": token,
        "code": code,
    });

    let body = post_json!(&app, "/sms/code/verify", verify_request.clone());
    assert_eq!(body["status"], "ok");

    // session retired; the same pair no longer verifies
    tokio::time::sleep(Duration::from_millis(25)).await;
    let body = post_json!(&app, "/sms/code/verify", verify_request);
    assert_eq!(body["status"], "code_expire");
}

#[actix_web::test]
async fn test_invalid_phone_is_rejected_before_store_access() {
    let (store, state) = app_state(10, 10, MockSmsNotifier::new());
    let app = init_app!(state);

    for phone in ["12345", "12345678901a", ""] {
        let body = post_json!(
            &app,
            "/sms/code/send",
            serde_json::json!({ "phone": phone, "template_code": TEMPLATE })
        );
        assert_eq!(body["status"], "fail");
    }

    let body = post_json!(
        &app,
        "/sms/code/send",
        serde_json::json!({ "phone": PHONE, "template_code": "" })
    );
    assert_eq!(body["status"], "fail");
    assert_eq!(body["msg"], "miss required parameter template_code");

    assert!(store.is_empty());
}

#[actix_web::test]
async fn test_send_over_limit_returns_limit_control() {
    let (_, state) = app_state(2, 10, MockSmsNotifier::new());
    let app = init_app!(state);

    let send_request = serde_json::json!({ "phone": PHONE, "template_code": TEMPLATE });

    for _ in 0..2 {
        let body = post_json!(&app, "/sms/code/send", send_request.clone());
        assert_eq!(body["status"], "ok");
    }

    let body = post_json!(&app, "/sms/code/send", send_request);
    assert_eq!(body["status"], "limit_control");

    // a different identity still sends fine
    let body = post_json!(
        &app,
        "/sms/code/send",
        serde_json::json!({ "phone": "13900000000", "template_code": TEMPLATE })
    );
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_verify_over_limit_returns_limit_control() {
    let (_, state) = app_state(10, 1, MockSmsNotifier::new());
    let app = init_app!(state);

    let verify_request = serde_json::json!({
        "phone": PHONE,
        "template_code": TEMPLATE,
        "token": "some-token",
        "code": "123456",
    });

    let body = post_json!(&app, "/sms/code/verify", verify_request.clone());
    assert_eq!(body["status"], "code_expire");

    let body = post_json!(&app, "/sms/code/verify", verify_request);
    assert_eq!(body["status"], "limit_control");
}

#[actix_web::test]
async fn test_verify_mismatch_statuses() {
    let (store, state) = app_state(10, 10, MockSmsNotifier::new());
    let app = init_app!(state);

    let body = post_json!(
        &app,
        "/sms/code/send",
        serde_json::json!({ "phone": PHONE, "template_code": TEMPLATE })
    );
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let code = store.stored_code(PHONE, TEMPLATE).unwrap();

    let body = post_json!(
        &app,
        "/sms/code/verify",
        serde_json::json!({
            "phone": PHONE,
            "template_code": TEMPLATE,
            "token": "wrong-token-00000",
            "code": code,
        })
    );
    assert_eq!(body["status"], "token_invalid");

    let wrong_code = if code == "000000" { "000001" } else { "000000" };
    let body = post_json!(
        &app,
        "/sms/code/verify",
        serde_json::json!({
            "phone": PHONE,
            "template_code": TEMPLATE,
            "token": token,
            "code": wrong_code,
        })
    );
    assert_eq!(body["status"], "code_invalid");
}

#[actix_web::test]
async fn test_delivery_failure_is_surfaced() {
    let (store, state) = app_state(10, 10, MockSmsNotifier::failing());
    let app = init_app!(state);

    let body = post_json!(
        &app,
        "/sms/code/send",
        serde_json::json!({ "phone": PHONE, "template_code": TEMPLATE })
    );
    assert_eq!(body["status"], "fail");
    assert_eq!(body["msg"], "failed to deliver verification code");

    // issuance itself happened; only delivery failed
    assert!(store.stored_code(PHONE, TEMPLATE).is_some());
}

#[actix_web::test]
async fn test_resend_preserves_token() {
    let (_, state) = app_state(10, 10, MockSmsNotifier::new());
    let app = init_app!(state);

    let send_request = serde_json::json!({ "phone": PHONE, "template_code": TEMPLATE });

    let first = post_json!(&app, "/sms/code/send", send_request.clone());
    let second = post_json!(&app, "/sms/code/send", send_request);

    assert_eq!(first["data"]["token"], second["data"]["token"]);
}
