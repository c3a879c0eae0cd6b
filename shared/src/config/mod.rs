//! Configuration modules
//!
//! Every component takes its configuration explicitly through a constructor;
//! there is no lazily initialized global settings object. `AppConfig` is
//! assembled once at startup (normally from environment variables) and its
//! pieces are handed to the services that need them.

pub mod cache;
pub mod rate_limit;
pub mod server;
pub mod sms;

pub use cache::CacheConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use sms::SmsConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Redis settings
    pub cache: CacheConfig,
    /// Per-identity hourly limits
    pub rate_limit: RateLimitConfig,
    /// SMS gateway settings
    pub sms: SmsConfig,
}

impl AppConfig {
    /// Assemble the full configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            sms: SmsConfig::from_env(),
        }
    }
}
