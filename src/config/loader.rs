use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Environment variable switching to native Intl data.
pub const USE_NATIVE_INTL_ENV: &str = "APP_DUCKS_USE_NATIVE_INTL";

/// Environment variable naming the deployment mode ("development" disables caching).
pub const ENV_MODE_ENV: &str = "APP_DUCKS_ENV";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// `app-ducks/config.toml` under the platform config directory, or under
    /// the working directory when there is none.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("app-ducks").join("config.toml")
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// A missing file yields the defaults. Environment overrides are applied
    /// before validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Applies the process environment switches on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(USE_NATIVE_INTL_ENV).ok().as_deref(),
            std::env::var(ENV_MODE_ENV).ok().as_deref(),
        );
    }

    /// Applies override values as read from the environment.
    pub fn apply_overrides(&mut self, use_native_intl: Option<&str>, env_mode: Option<&str>) {
        if let Some(value) = use_native_intl {
            self.intl.use_native_intl = matches!(value.trim(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(mode) = env_mode {
            self.cache.development = mode.trim().eq_ignore_ascii_case("development");
        }
    }

    /// Rejects an empty default locale, a locale file name that is a path or
    /// carries the `.json` extension, and a zero request timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intl.default_locale.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Default locale must not be empty".to_string(),
            });
        }

        if let Some(name) = &self.intl.locale_filename {
            if name.is_empty() || name.contains('/') || name.ends_with(".json") {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Locale file name '{}' must be a bare name without '/' or '.json'",
                        name
                    ),
                });
            }
        }

        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout must be at least one second".to_string(),
            });
        }

        Ok(())
    }
}
