//! Configuration loading and shared access.

mod loader;
mod store;
mod types;

pub use loader::{ConfigError, ENV_MODE_ENV, USE_NATIVE_INTL_ENV};
pub use store::ConfigStore;
pub use types::{
    CacheConfig, Config, FetchConfig, IntlConfig, ReportingConfig, DEFAULT_LOCALE,
};
