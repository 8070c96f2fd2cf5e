//! Shared, reloadable configuration.
//!
//! The intl loader and the error reporter read through a [`ConfigStore`] on
//! every call, so a reload applies to the next language pack request or
//! report without rebuilding either.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::config::loader::ConfigError;
use crate::config::types::Config;

#[derive(Clone)]
pub struct ConfigStore {
    shared: Arc<RwLock<Config>>,
    source: Option<PathBuf>,
}

impl ConfigStore {
    /// A store that [`reload`](Self::reload)s from `source`.
    pub fn new(config: Config, source: PathBuf) -> Self {
        Self {
            shared: Arc::new(RwLock::new(config)),
            source: Some(source),
        }
    }

    /// A store with no backing file; `reload` leaves it untouched.
    pub fn in_memory(config: Config) -> Self {
        Self {
            shared: Arc::new(RwLock::new(config)),
            source: None,
        }
    }

    pub fn get(&self) -> Config {
        self.shared.read().clone()
    }

    /// Borrow the config for the duration of `f`.
    pub fn read<T>(&self, f: impl FnOnce(&Config) -> T) -> T {
        f(&self.shared.read())
    }

    /// Re-read the backing file. An unreadable or invalid file keeps the
    /// current config.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        match Config::load_from(source) {
            Ok(config) => {
                *self.shared.write() = config;
                info!(path = %source.display(), "Config reloaded");
                Ok(())
            }
            Err(err) => {
                warn!(path = %source.display(), error = %err, "Config reload failed");
                Err(err)
            }
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::in_memory(Config::default())
    }
}
