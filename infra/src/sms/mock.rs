//! Mock delivery backend for development and testing
//!
//! Logs messages instead of sending them and hands back generated receipt
//! ids, so the full send path can run without gateway credentials.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sv_core::{DeliveryReceipt, NotifyError, SmsNotifier};
use sv_shared::mask_phone;

/// Console-only SMS delivery
#[derive(Clone)]
pub struct MockSmsNotifier {
    /// Number of messages delivered so far
    message_count: Arc<AtomicU64>,
    /// Whether to simulate delivery failures (for testing)
    simulate_failure: bool,
}

impl MockSmsNotifier {
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a mock that fails every delivery
    pub fn failing() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Total number of messages delivered
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockSmsNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsNotifier for MockSmsNotifier {
    async fn deliver(
        &self,
        phone: &str,
        template_code: &str,
        code: &str,
        _params: &HashMap<String, String>,
    ) -> Result<DeliveryReceipt, NotifyError> {
        if self.simulate_failure {
            warn!(
                phone = %mask_phone(phone),
                "mock sms delivery simulating failure"
            );
            return Err(NotifyError::Transport {
                message: "simulated delivery failure".to_string(),
            });
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = format!("mock_{}", Uuid::new_v4());

        info!(
            target: "sms_delivery",
            provider = "mock",
            phone = %mask_phone(phone),
            template_code,
            message_id = %message_id,
            count,
            "mock sms delivered"
        );
        debug!(code, "mock sms content");

        Ok(DeliveryReceipt { message_id })
    }
}
