//! Server configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `beacon-api.toml` in the working directory (optional)
//! 3. environment variables prefixed `BEACON_` (`BEACON_PORT=8080`)
//!
//! `main` loads a `.env` file before any of this runs, so values from it
//! arrive through step 3.

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up without requiring it to exist.
pub const CONFIG_FILE: &str = "beacon-api";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file. `:memory:` gives a throwaway database.
    pub database_path: String,

    /// Pool size.
    pub max_connections: u32,

    /// Unit price used when a country has no price row (cents).
    pub fallback_unit_price_cents: i64,

    /// Currency of the fallback unit price.
    pub fallback_currency: String,

    /// Symbol used in formatted quote amounts.
    pub currency_symbol: String,

    /// Fill an empty user directory with the sample users on startup.
    pub seed_sample_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_path: "./beacon.db".to_string(),
            max_connections: 5,
            fallback_unit_price_cents: 1000,
            fallback_currency: "USD".to_string(),
            currency_symbol: beacon_core::pricing::DEFAULT_CURRENCY_SYMBOL.to_string(),
            seed_sample_data: true,
        }
    }
}

impl ApiConfig {
    /// Loads defaults, `beacon-api.toml` and `BEACON_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(CONFIG_FILE))
    }

    /// Loads configuration with an optional file (missing files are skipped).
    pub fn load_from(file: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let mut builder = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_path", defaults.database_path)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("fallback_unit_price_cents", defaults.fallback_unit_price_cents)?
            .set_default("fallback_currency", defaults.fallback_currency)?
            .set_default("currency_symbol", defaults.currency_symbol)?
            .set_default("seed_sample_data", defaults.seed_sample_data)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        let config = builder
            .add_source(Environment::with_prefix("BEACON").try_parsing(true))
            .build()?
            .try_deserialize::<ApiConfig>()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port must not be 0".to_string()));
        }
        if self.fallback_unit_price_cents < 0 {
            return Err(ConfigError::InvalidValue(
                "fallback_unit_price_cents must not be negative".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.fallback_unit_price_cents, 1000);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = ApiConfig {
            port: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let config = ApiConfig {
            fallback_unit_price_cents: -1,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            database_path: " ".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "beacon-api-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "port = 8088\nfallback_unit_price_cents = 1500\ncurrency_symbol = \"kr \"\n",
        )
        .unwrap();

        let config = ApiConfig::load_from(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.port, 8088);
        assert_eq!(config.fallback_unit_price_cents, 1500);
        assert_eq!(config.currency_symbol, "kr ");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ApiConfig::load_from(Some("does-not-exist-beacon-api")).unwrap();
        assert_eq!(config.max_connections, 5);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn test_invalid_file_value_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "beacon-api-config-invalid-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "port = 0\n").unwrap();

        let result = ApiConfig::load_from(path.to_str());
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
