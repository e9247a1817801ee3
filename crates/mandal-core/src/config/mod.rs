//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod logging;
pub mod payment;
pub mod provider;
pub mod realtime;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::logging::LoggingConfig;
use self::payment::PaymentConfig;
use self::provider::ProviderConfig;
use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hosted provider endpoints and credentials.
    pub provider: ProviderConfig,
    /// Authentication flow settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Realtime subscription settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Payment gateway settings.
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `MANDAL_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MANDAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [provider]
                base_url = "https://example.supabase.co"
                anon_key = "anon"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.provider.base_url, "https://example.supabase.co");
        assert_eq!(config.auth.federated_provider, "google");
        assert_eq!(config.realtime.channel_buffer_size, 256);
        assert_eq!(config.payment.mode, "sandbox");
        assert_eq!(config.logging.level, "info");
    }
}
