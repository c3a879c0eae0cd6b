//! SMS configuration module

use serde::{Deserialize, Serialize};

/// SMS delivery and code generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Delivery provider ("gateway" or "mock")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Gateway application key
    #[serde(default)]
    pub app_key: String,

    /// Gateway application secret (used for request signing)
    #[serde(default)]
    pub app_secret: String,

    /// Registered SMS signature name
    #[serde(default)]
    pub free_sign_name: String,

    /// Gateway endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Gateway request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of digits in a verification code; values <= 0 fall back to 6
    #[serde(default = "default_code_length")]
    pub code_length: i64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            app_key: String::new(),
            app_secret: String::new(),
            free_sign_name: String::new(),
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            code_length: default_code_length(),
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("SMS_PROVIDER").unwrap_or(defaults.provider),
            app_key: std::env::var("SMS_APP_KEY").unwrap_or_default(),
            app_secret: std::env::var("SMS_APP_SECRET").unwrap_or_default(),
            free_sign_name: std::env::var("SMS_FREE_SIGN_NAME").unwrap_or_default(),
            endpoint: std::env::var("SMS_GATEWAY_ENDPOINT").unwrap_or(defaults.endpoint),
            request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            code_length: std::env::var("SMS_CODE_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_length),
        }
    }
}

fn default_provider() -> String {
    String::from("mock")
}

fn default_endpoint() -> String {
    String::from("http://gw.api.taobao.com/router/rest")
}

fn default_request_timeout_secs() -> u64 {
    55
}

fn default_code_length() -> i64 {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_config_default() {
        let config = SmsConfig::default();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.code_length, 6);
        assert_eq!(config.request_timeout_secs, 55);
    }
}
