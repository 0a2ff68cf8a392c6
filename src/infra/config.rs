//! Environment-driven configuration.
//!
//! Values are read through [`ConfigSource`] so tests can supply them without
//! touching the process environment.

use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use validator::Validate;

use crate::domain::{AccountAddress, AppError, ConfigError, ConfigSource};
use crate::infra::blockchain::NetworkConfig;
use crate::infra::database::PostgresConfig;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DB_POOL_SIZE_ENV: &str = "DB_POOL_SIZE";
pub const APTOS_API_KEY_ENV: &str = "APTOS_API_KEY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const MESSAGE_BOARD_ADDRESS_ENV: &str = "MESSAGE_BOARD_ADDRESS";

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: LOG_FORMAT_ENV.to_string(),
                message: format!("unknown format '{other}', expected 'pretty' or 'json'"),
            }),
        }
    }
}

/// Startup configuration. The signer key is deliberately absent: it is
/// read on each account request instead.
#[derive(Debug, Validate)]
pub struct AppConfig {
    pub database_url: SecretString,
    #[validate(range(min = 1, max = 1000))]
    pub db_pool_size: u32,
    pub aptos_api_key: Option<SecretString>,
    pub log_format: LogFormat,
    /// Publisher of the `message_board` module, if one is deployed
    pub message_board_address: Option<AccountAddress>,
}

/// Non-empty value for `key`, if set.
pub(crate) fn non_empty(source: &dyn ConfigSource, key: &str) -> Option<String> {
    source.var(key).filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, AppError> {
        let database_url = non_empty(source, DATABASE_URL_ENV)
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(DATABASE_URL_ENV.to_string()))?;

        let db_pool_size = match non_empty(source, DB_POOL_SIZE_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: DB_POOL_SIZE_ENV.to_string(),
                    message: e.to_string(),
                })?,
            None => PostgresConfig::DEFAULT_POOL_SIZE,
        };

        let log_format = match non_empty(source, LOG_FORMAT_ENV) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let message_board_address = match non_empty(source, MESSAGE_BOARD_ADDRESS_ENV) {
            Some(raw) => Some(raw.trim().parse::<AccountAddress>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: MESSAGE_BOARD_ADDRESS_ENV.to_string(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        let config = Self {
            database_url,
            db_pool_size,
            aptos_api_key: non_empty(source, APTOS_API_KEY_ENV).map(SecretString::from),
            log_format,
            message_board_address,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(&ProcessEnv)
    }

    #[must_use]
    pub fn postgres_config(&self) -> PostgresConfig {
        PostgresConfig::default().with_pool_size(self.db_pool_size)
    }

    /// Testnet client settings carrying the optional API key.
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        let api_key = self
            .aptos_api_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret()));
        NetworkConfig::default().with_api_key(api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::blockchain::Network;
    use crate::test_utils::MapSource;

    #[test]
    fn test_minimal_config() {
        let source = MapSource::new().with(DATABASE_URL_ENV, "postgres://u:p@host/db");
        let config = AppConfig::from_source(&source).unwrap();

        assert_eq!(config.database_url.expose_secret(), "postgres://u:p@host/db");
        assert_eq!(config.db_pool_size, 50);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.aptos_api_key.is_none());
        assert!(config.message_board_address.is_none());
    }

    #[test]
    fn test_network_config_is_testnet() {
        let source = MapSource::new()
            .with(DATABASE_URL_ENV, "postgres://u:p@host/db")
            .with(APTOS_API_KEY_ENV, "aptoslabs_key");
        let network = AppConfig::from_source(&source).unwrap().network_config();

        assert_eq!(network.network, Network::Testnet);
        assert_eq!(
            network.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("aptoslabs_key".to_string())
        );
    }

    #[test]
    fn test_message_board_address() {
        let source = MapSource::new()
            .with(DATABASE_URL_ENV, "postgres://u:p@host/db")
            .with(MESSAGE_BOARD_ADDRESS_ENV, "0xb0a2d");
        let config = AppConfig::from_source(&source).unwrap();
        assert_eq!(
            config.message_board_address,
            Some("0xb0a2d".parse().unwrap())
        );

        let source = MapSource::new()
            .with(DATABASE_URL_ENV, "postgres://u:p@host/db")
            .with(MESSAGE_BOARD_ADDRESS_ENV, "not-an-address");
        assert!(matches!(
            AppConfig::from_source(&source),
            Err(AppError::Config(ConfigError::InvalidValue { key, .. })) if key == MESSAGE_BOARD_ADDRESS_ENV
        ));
    }

    #[test]
    fn test_missing_database_url() {
        let result = AppConfig::from_source(&MapSource::new());
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingEnvVar(key))) if key == DATABASE_URL_ENV
        ));
    }

    #[test]
    fn test_blank_database_url_is_missing() {
        let source = MapSource::new().with(DATABASE_URL_ENV, "   ");
        assert!(AppConfig::from_source(&source).is_err());
    }

    #[test]
    fn test_all_values() {
        let source = MapSource::new()
            .with(DATABASE_URL_ENV, "postgres://u:p@host/db")
            .with(DB_POOL_SIZE_ENV, "12")
            .with(APTOS_API_KEY_ENV, "aptoslabs_key")
            .with(LOG_FORMAT_ENV, "JSON");
        let config = AppConfig::from_source(&source).unwrap();

        assert_eq!(config.db_pool_size, 12);
        assert_eq!(config.postgres_config().max_connections, 12);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.aptos_api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("aptoslabs_key".to_string())
        );
    }

    #[test]
    fn test_invalid_pool_size() {
        let source = MapSource::new()
            .with(DATABASE_URL_ENV, "postgres://u:p@host/db")
            .with(DB_POOL_SIZE_ENV, "lots");
        assert!(matches!(
            AppConfig::from_source(&source),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));

        let source = MapSource::new()
            .with(DATABASE_URL_ENV, "postgres://u:p@host/db")
            .with(DB_POOL_SIZE_ENV, "0");
        assert!(matches!(
            AppConfig::from_source(&source),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" Json ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
