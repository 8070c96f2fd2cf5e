use thiserror::Error;

use crate::fetch::FetchError;

/// Errors produced by the language pack loader and locale activation.
#[derive(Debug, Error)]
pub enum IntlError {
    /// Neither an explicit, next nor active locale is available
    #[error("Failed to load language pack. No locale was set or given")]
    NoLocale,

    /// `update_locale` was called without a locale
    #[error("No locale was given")]
    NoLocaleGiven,

    /// A fallback URL needs a fallback locale to label its data
    #[error("A fallback locale is required with a fallback URL for '{component_key}'")]
    MissingFallbackLocale { component_key: String },

    /// The module registry has no entry for the component
    #[error("Module '{component_key}' is not registered")]
    UnknownModule { component_key: String },

    /// No installed locale bundle matches the locale or any of its prefixes
    #[error("No locale bundle available for {locale}")]
    NoLocaleBundle { locale: String },

    /// The matching locale bundle failed to load
    #[error("Failed to load locale bundle for {locale}: {message}")]
    BundleLoad { locale: String, message: String },

    /// Non-2xx, non-404 response
    #[error("{status_text} ({url})")]
    Http {
        status: u16,
        status_text: String,
        url: String,
    },

    /// Transport failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response body is not a JSON object
    #[error("Invalid language pack from '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
