//! Outbound SMS delivery seam
//!
//! Delivery is an external collaborator: the caller invokes it after
//! issuance succeeds, and its transport details never reach the
//! verification core.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a delivery backend
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The gateway could not be reached or answered malformed data
    #[error("gateway request failed: {message}")]
    Transport { message: String },

    /// The gateway answered but refused the message
    #[error("gateway rejected the message ({code}): {message}")]
    Rejected { code: String, message: String },
}

/// Receipt for a message the provider accepted
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Provider-assigned message id
    pub message_id: String,
}

/// Capability interface for delivering a generated code to a phone
#[async_trait]
pub trait SmsNotifier: Send + Sync + 'static {
    /// Deliver `code` to `phone` using the given message template.
    /// `params` carries additional template substitutions.
    async fn deliver(
        &self,
        phone: &str,
        template_code: &str,
        code: &str,
        params: &HashMap<String, String>,
    ) -> Result<DeliveryReceipt, NotifyError>;
}
