//! Locale selection and language pack loading.
//!
//! # Architecture
//!
//! ```text
//! IntlLoader ──dispatch──→ Store<IntlReducer> ──→ IntlState
//!     │                                              │
//!     ├── LanguagePackCache (server only)            └── language_packs[locale][component]
//!     ├── FetchClient / ModuleRegistry
//!     └── LocaleBundles (update_locale)
//! ```
//!
//! Each (locale, component) entry moves `absent → loading → loaded | errored`.
//! A failed entry is served as failed for [`ERROR_RETRY_WINDOW`] before a
//! query refetches it. Entries loaded during server rendering stay
//! authoritative on the client until a deferred reload replaces them.

mod action;
mod activation;
mod error;
mod loader;
mod locale_bundles;
mod reducer;
pub mod server_cache;
mod state;

pub use action::IntlAction;
pub use error::IntlError;
pub use loader::{
    IntlLoader, LanguagePackQuery, LoadOptions, QueryOptions, QueryStatus, ERROR_RETRY_WINDOW,
};
pub use locale_bundles::{BundleLoader, LocaleBundles};
pub use reducer::IntlReducer;
pub use server_cache::{LanguagePackCache, CACHE_TTL};
pub use state::{
    empty_pack, IntlState, LanguagePackEntry, LanguagePackResult, PackData, PendingLanguagePack,
};

use crate::store::Store;

/// Store holding an [`IntlState`].
pub type IntlStore = Store<IntlReducer>;
