//! SMS delivery backends
//!
//! Implementations of the core's [`sv_core::SmsNotifier`] capability:
//! the production HTTP gateway and a mock backend for development and
//! testing. Which one runs is a configuration choice; the verification
//! core never sees the difference.

pub mod gateway;
pub mod mock;

pub use gateway::GatewaySmsNotifier;
pub use mock::MockSmsNotifier;

use std::sync::Arc;

use sv_core::{NotifyError, SmsNotifier};
use sv_shared::SmsConfig;

/// Create a delivery backend based on configuration
pub fn create_notifier(config: &SmsConfig) -> Result<Arc<dyn SmsNotifier>, NotifyError> {
    match config.provider.as_str() {
        "gateway" => Ok(Arc::new(GatewaySmsNotifier::new(config.clone())?)),
        "mock" => Ok(Arc::new(MockSmsNotifier::new())),
        other => {
            tracing::warn!(provider = other, "unknown sms provider, using mock delivery");
            Ok(Arc::new(MockSmsNotifier::new()))
        }
    }
}
