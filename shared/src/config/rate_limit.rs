//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Per-identity rate limiting configuration
///
/// Send and verify are limited independently, so a flood of verify attempts
/// cannot exhaust an identity's send quota or vice versa. The window is
/// TTL-based: it starts at the first counted operation and does not slide.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max send-code requests per identity per window
    pub send_per_hour: i64,

    /// Max verify-code requests per identity per window
    pub verify_per_hour: i64,

    /// Window duration in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            send_per_hour: 10,
            verify_per_hour: 10,
            window_seconds: default_window_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            send_per_hour: std::env::var("SMS_SEND_LIMIT_PER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.send_per_hour),
            verify_per_hour: std::env::var("SMS_VERIFY_LIMIT_PER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.verify_per_hour),
            window_seconds: std::env::var("SMS_LIMIT_WINDOW_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.window_seconds),
        }
    }
}

fn default_window_seconds() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.send_per_hour, 10);
        assert_eq!(config.verify_per_hour, 10);
        assert_eq!(config.window_seconds, 3600);
    }
}
