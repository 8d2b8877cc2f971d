//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Local store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Currency display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Local key-value store configuration (degraded, offline mode).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one text file per entity kind.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// How amounts are rendered for people.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Prefix written before every amount.
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
    /// Thousands separator.
    #[serde(default = "default_group_separator")]
    pub group_separator: String,
    /// Decimal separator.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_prefix: default_currency_prefix(),
            group_separator: default_group_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

fn default_currency_prefix() -> String {
    "R$ ".to_string()
}

fn default_group_separator() -> String {
    ".".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "parcela=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PARCELA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "PARCELA__STORE__DATA_DIR",
                "PARCELA__DISPLAY__CURRENCY_PREFIX",
                "RUN_MODE",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.store.data_dir, PathBuf::from("data"));
                assert_eq!(config.display.currency_prefix, "R$ ");
                assert_eq!(config.display.group_separator, ".");
                assert_eq!(config.display.decimal_separator, ",");
                assert_eq!(config.log.filter, "parcela=info");
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("PARCELA__STORE__DATA_DIR", Some("/tmp/parcela")),
                ("PARCELA__DISPLAY__CURRENCY_PREFIX", Some("$")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.store.data_dir, PathBuf::from("/tmp/parcela"));
                assert_eq!(config.display.currency_prefix, "$");
                assert_eq!(config.display.decimal_separator, ",");
            },
        );
    }
}
