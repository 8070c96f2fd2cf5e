use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::IntlError;
use crate::store::DuckState;

/// Language pack payload: a JSON object of translated strings.
pub type PackData = Arc<serde_json::Map<String, serde_json::Value>>;

/// Settled value of a language pack load.
pub type LanguagePackResult = Result<PackData, Arc<IntlError>>;

/// An empty pack, used for missing language packs.
pub fn empty_pack() -> PackData {
    Arc::new(serde_json::Map::new())
}

/// In-flight language pack load shared by every caller asking for it.
///
/// Cloning is cheap and every clone resolves to the same result.
#[derive(Clone)]
pub struct PendingLanguagePack(Shared<BoxFuture<'static, LanguagePackResult>>);

impl PendingLanguagePack {
    pub(crate) fn new(future: impl Future<Output = LanguagePackResult> + Send + 'static) -> Self {
        Self(future.boxed().shared())
    }

    /// An already settled load.
    pub fn ready(result: LanguagePackResult) -> Self {
        Self::new(futures_util::future::ready(result))
    }

    /// Whether both handles refer to the same load.
    ///
    /// Only meaningful for handles that have not been awaited themselves.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// The result, if the load has settled.
    pub fn peek(&self) -> Option<&LanguagePackResult> {
        self.0.peek()
    }
}

impl Future for PendingLanguagePack {
    type Output = LanguagePackResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl fmt::Debug for PendingLanguagePack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.peek() {
            None => "pending",
            Some(Ok(_)) => "loaded",
            Some(Err(_)) => "failed",
        };
        f.debug_tuple("PendingLanguagePack").field(&state).finish()
    }
}

/// State of one (locale, component) language pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguagePackEntry {
    pub data: PackData,
    pub is_loading: bool,
    #[serde(skip)]
    pub promise: Option<PendingLanguagePack>,
    #[serde(skip)]
    pub error: Option<Arc<IntlError>>,
    /// When a failed entry becomes eligible for another fetch.
    #[serde(skip)]
    pub error_expiration: Option<Instant>,
    /// Milliseconds since the Unix epoch of the last successful fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<u64>,
    /// Loaded during server rendering; authoritative until revalidated.
    #[serde(rename = "_loadedOnServer")]
    pub loaded_on_server: bool,
    /// A background revalidation has been scheduled.
    #[serde(rename = "_pendingDeferredForceLoad")]
    pub pending_deferred_force_load: bool,
}

impl LanguagePackEntry {
    /// Loaded with no error and no fetch in progress.
    pub fn is_loaded(&self) -> bool {
        !self.is_loading && self.error.is_none()
    }

    /// Request and failure events leave the entry alone.
    pub(crate) fn is_server_authoritative(&self) -> bool {
        self.loaded_on_server && !self.pending_deferred_force_load
    }

    /// The in-flight load, if one is stored.
    pub fn in_flight(&self) -> Option<&PendingLanguagePack> {
        if self.is_loading {
            self.promise.as_ref()
        } else {
            None
        }
    }
}

impl PartialEq for LanguagePackEntry {
    fn eq(&self, other: &Self) -> bool {
        let same_promise = match (&self.promise, &other.promise) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        let same_error = match (&self.error, &other.error) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_promise
            && same_error
            && self.data == other.data
            && self.is_loading == other.is_loading
            && self.error_expiration == other.error_expiration
            && self.last_fetched == other.last_fetched
            && self.loaded_on_server == other.loaded_on_server
            && self.pending_deferred_force_load == other.pending_deferred_force_load
    }
}

/// Locale selection and every language pack loaded so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntlState {
    pub active_locale: Option<String>,
    /// Locale chosen on the server but not yet activated on the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_locale: Option<String>,
    /// locale → component key → entry
    pub language_packs: HashMap<String, HashMap<String, LanguagePackEntry>>,
}

impl DuckState for IntlState {}

impl IntlState {
    pub fn new(active_locale: impl Into<String>) -> Self {
        Self {
            active_locale: Some(active_locale.into()),
            ..Self::default()
        }
    }

    pub fn active_locale(&self) -> Option<&str> {
        self.active_locale.as_deref()
    }

    pub fn entry(&self, locale: &str, component_key: &str) -> Option<&LanguagePackEntry> {
        self.language_packs.get(locale)?.get(component_key)
    }

    pub(crate) fn entry_mut(&mut self, locale: &str, component_key: &str) -> &mut LanguagePackEntry {
        self.language_packs
            .entry(locale.to_string())
            .or_default()
            .entry(component_key.to_string())
            .or_default()
    }

    /// Data of a pack, if it has an entry.
    pub fn language_pack(&self, locale: &str, component_key: &str) -> Option<PackData> {
        self.entry(locale, component_key).map(|e| Arc::clone(&e.data))
    }

    /// Serialize for hydrating a client store.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Rebuild state serialized by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
