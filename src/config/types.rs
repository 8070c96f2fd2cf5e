use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub intl: IntlConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Locale and language pack settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntlConfig {
    /// Locale used when negotiation yields nothing (default: "en-US").
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// File name used instead of the component key in language pack URLs.
    #[serde(default)]
    pub locale_filename: Option<String>,
    /// Use the platform's native Intl data and skip locale bundle loading.
    #[serde(default)]
    pub use_native_intl: bool,
}

/// Server-side language pack cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Development mode: language packs change often, so nothing is cached.
    #[serde(default)]
    pub development: bool,
    /// Start the periodic expiry sweep when the cache is created.
    #[serde(default = "default_true")]
    pub sweep_on_start: bool,
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Client-side error report delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportingConfig {
    /// Endpoint receiving queued error reports as a JSON array.
    #[serde(default)]
    pub reporting_url: Option<String>,
}

pub const DEFAULT_LOCALE: &str = "en-US";

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

impl Default for IntlConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locale_filename: None,
            use_native_intl: false,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            development: false,
            sweep_on_start: default_true(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}
