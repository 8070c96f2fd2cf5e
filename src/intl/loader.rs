//! Language pack loading: coalescing, fallback retry and deferred revalidation.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::FutureExt;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::action::IntlAction;
use super::locale_bundles::LocaleBundles;
use super::server_cache::LanguagePackCache;
use super::state::{empty_pack, PackData, PendingLanguagePack};
use super::{IntlError, IntlStore};
use crate::config::ConfigStore;
use crate::env::Environment;
use crate::fetch::{FetchClient, FetchRequest};
use crate::modules::ModuleRegistry;

/// How long a failed pack is served as failed before a query refetches it.
pub const ERROR_RETRY_WINDOW: Duration = Duration::from_secs(10);

/// Options for [`IntlLoader::load_language_pack`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Locale to load; defaults to the next, then the active locale.
    pub locale: Option<String>,
    /// Start a new fetch even if the pack is loaded or loading.
    pub force: bool,
    /// URL to fetch instead of the registry-derived one.
    pub url: Option<String>,
    /// Locale to try when the pack is missing (404).
    pub fallback_locale: Option<String>,
    /// URL for the fallback pack; requires `fallback_locale`.
    pub fallback_url: Option<String>,
}

/// Options for [`IntlLoader::query_language_pack`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub fallback_locale: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Loading,
    Complete,
}

/// Snapshot of the active locale's pack plus the load backing it.
#[derive(Debug, Clone)]
pub struct LanguagePackQuery {
    pub locale: Option<String>,
    pub status: QueryStatus,
    pub data: PackData,
    pub error: Option<Arc<IntlError>>,
    pub error_expiration: Option<Instant>,
    pub promise: PendingLanguagePack,
}

/// One URL to try for a pack.
#[derive(Debug, Clone)]
struct Candidate {
    locale: String,
    url: String,
    /// URL the registry derives for this locale, used as cache identity.
    default_url: Option<String>,
}

/// Fallback locale and override URL; resolved only once the primary 404s.
#[derive(Debug, Clone)]
struct Fallback {
    locale: String,
    url: Option<String>,
}

enum Fetched {
    Data(PackData),
    NotFound,
}

enum Decision {
    InFlight(PendingLanguagePack),
    Fetch(PendingLanguagePack),
    Loaded { data: PackData, deferred: bool },
}

/// Loads language packs into an intl store.
#[derive(Clone)]
pub struct IntlLoader {
    store: IntlStore,
    env: Environment,
    modules: Arc<dyn ModuleRegistry>,
    fetch: Arc<dyn FetchClient>,
    pub(super) config: ConfigStore,
    cache: Arc<LanguagePackCache>,
    pub(super) bundles: Arc<LocaleBundles>,
}

impl IntlLoader {
    pub fn new(
        store: IntlStore,
        env: Environment,
        modules: Arc<dyn ModuleRegistry>,
        fetch: Arc<dyn FetchClient>,
    ) -> Self {
        let config = ConfigStore::default();
        let development = config.read(|c| c.cache.development);
        Self {
            store,
            env,
            modules,
            fetch,
            config,
            cache: Arc::new(LanguagePackCache::new(development)),
            bundles: Arc::new(LocaleBundles::new()),
        }
    }

    /// Use a shared config. Also replaces the server cache to honour
    /// `cache.development`, so call it before [`with_cache`](Self::with_cache).
    pub fn with_config(mut self, config: ConfigStore) -> Self {
        let development = config.read(|c| c.cache.development);
        self.cache = Arc::new(LanguagePackCache::new(development));
        self.config = config;
        self
    }

    /// Share a server cache between loaders, e.g. one per rendered request.
    pub fn with_cache(mut self, cache: Arc<LanguagePackCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_bundles(mut self, bundles: Arc<LocaleBundles>) -> Self {
        self.bundles = bundles;
        self
    }

    pub fn store(&self) -> &IntlStore {
        &self.store
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn cache(&self) -> &Arc<LanguagePackCache> {
        &self.cache
    }

    pub fn bundles(&self) -> &Arc<LocaleBundles> {
        &self.bundles
    }

    /// Load the pack of `component_key` for a locale.
    ///
    /// Callers asking while a load is in flight get the same
    /// [`PendingLanguagePack`]. Configuration errors come back as an already
    /// failed load without touching the store.
    pub fn load_language_pack(&self, component_key: &str, options: LoadOptions) -> PendingLanguagePack {
        match self.start_load(component_key, options) {
            Ok(pending) => pending,
            Err(err) => {
                debug!(component_key, error = %err, "Language pack load rejected");
                PendingLanguagePack::ready(Err(Arc::new(err)))
            }
        }
    }

    fn start_load(&self, component_key: &str, options: LoadOptions) -> Result<PendingLanguagePack, IntlError> {
        if options.fallback_url.is_some() && options.fallback_locale.is_none() {
            return Err(IntlError::MissingFallbackLocale {
                component_key: component_key.to_string(),
            });
        }

        let locale = match options.locale.clone() {
            Some(locale) => locale,
            None => self
                .store
                .select(|s| s.next_locale.clone().or_else(|| s.active_locale.clone()))
                .ok_or(IntlError::NoLocale)?,
        };

        let primary = self.candidate(component_key, &locale, options.url.clone())?;
        let fallback = options
            .fallback_locale
            .clone()
            .filter(|fallback| *fallback != locale)
            .map(|fallback| Fallback {
                locale: fallback,
                url: options.fallback_url.clone(),
            });

        let decision = self.store.reduce_with(|state| {
            let entry = state.entry(&locale, component_key);

            if !options.force {
                if let Some(entry) = entry {
                    if let Some(pending) = entry.in_flight() {
                        return (Decision::InFlight(pending.clone()), None);
                    }
                    if entry.is_loaded() {
                        let deferred = self.env.is_browser() && entry.is_server_authoritative();
                        let marker = deferred.then(|| IntlAction::LanguagePackDeferredForceLoad {
                            locale: locale.clone(),
                            component_key: component_key.to_string(),
                        });
                        let data = Arc::clone(&entry.data);
                        return (Decision::Loaded { data, deferred }, marker);
                    }
                }
            }

            let pending = self.fetch_future(component_key, &locale, primary, fallback);
            let request = IntlAction::LanguagePackRequest {
                locale: locale.clone(),
                component_key: component_key.to_string(),
                promise: pending.clone(),
            };
            (Decision::Fetch(pending), Some(request))
        });

        match decision {
            Decision::InFlight(pending) => Ok(pending),
            Decision::Fetch(pending) => {
                // drive the fetch even if every caller drops its handle
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(pending.clone());
                }
                Ok(pending)
            }
            Decision::Loaded { data, deferred } => {
                if deferred {
                    self.schedule_deferred_force_load(component_key, &locale, &options);
                }
                Ok(PendingLanguagePack::ready(Ok(data)))
            }
        }
    }

    fn candidate(
        &self,
        component_key: &str,
        locale: &str,
        url: Option<String>,
    ) -> Result<Candidate, IntlError> {
        let default_url = self.language_pack_url(component_key, locale);
        let url = match url {
            Some(url) => url,
            None => default_url.clone().ok_or_else(|| IntlError::UnknownModule {
                component_key: component_key.to_string(),
            })?,
        };
        Ok(Candidate {
            locale: locale.to_string(),
            url,
            default_url,
        })
    }

    /// `<module base url>/<locale>/<file name>.json`
    pub fn language_pack_url(&self, component_key: &str, locale: &str) -> Option<String> {
        let base = self.modules.module_base_url(component_key)?;
        let file_name = self
            .config
            .read(|c| c.intl.locale_filename.clone())
            .unwrap_or_else(|| component_key.to_string());
        Some(format!("{}/{}/{}.json", base, locale.to_lowercase(), file_name))
    }

    /// Future that fetches the pack and records the outcome in the store.
    fn fetch_future(
        &self,
        component_key: &str,
        locale: &str,
        primary: Candidate,
        fallback: Option<Fallback>,
    ) -> PendingLanguagePack {
        let loader = self.clone();
        let component_key = component_key.to_string();
        let locale = locale.to_string();

        PendingLanguagePack::new(async move {
            let result = loader
                .fetch_with_fallback(&component_key, primary, fallback)
                .await
                .map_err(Arc::new);

            match &result {
                Ok(data) => loader.store.dispatch(IntlAction::LanguagePackSuccess {
                    locale,
                    component_key,
                    data: Arc::clone(data),
                    last_fetched: unix_millis(),
                    loaded_on_server: loader.env.is_server(),
                }),
                Err(error) => {
                    debug!(locale = %locale, component_key = %component_key, error = %error, "Language pack failed");
                    loader.store.dispatch(IntlAction::LanguagePackFailure {
                        locale,
                        component_key,
                        error: Arc::clone(error),
                        error_expiration: Instant::now() + ERROR_RETRY_WINDOW,
                    })
                }
            }
            result
        })
    }

    async fn fetch_with_fallback(
        &self,
        component_key: &str,
        primary: Candidate,
        mut fallback: Option<Fallback>,
    ) -> Result<PackData, IntlError> {
        let mut candidate = primary;
        loop {
            match self.fetch_candidate(&candidate).await? {
                Fetched::Data(data) => return Ok(data),
                Fetched::NotFound => {
                    let Some(next) = fallback.take() else {
                        return Ok(empty_pack());
                    };
                    let next = self.candidate(component_key, &next.locale, next.url)?;
                    warn!(
                        locale = %candidate.locale,
                        fallback_locale = %next.locale,
                        component_key,
                        "Missing {} language pack for {}, falling back to {}",
                        candidate.locale,
                        component_key,
                        next.locale
                    );
                    candidate = next;
                }
            }
        }
    }

    async fn fetch_candidate(&self, candidate: &Candidate) -> Result<Fetched, IntlError> {
        let server = self.env.is_server();
        if server {
            if let Some(data) = self.cache.get(&candidate.url, candidate.default_url.as_deref()) {
                return Ok(Fetched::Data(data));
            }
        }

        let response = self.fetch.fetch(FetchRequest::get(&candidate.url)).await?;

        if response.ok() {
            let data: serde_json::Map<String, serde_json::Value> =
                response.json().map_err(|source| IntlError::Parse {
                    url: candidate.url.clone(),
                    source,
                })?;
            let data = Arc::new(data);
            if server {
                self.cache
                    .set(&candidate.url, Arc::clone(&data), candidate.default_url.as_deref());
            }
            return Ok(Fetched::Data(data));
        }

        if response.status == 404 {
            debug!(url = %candidate.url, "Language pack not found");
            return Ok(Fetched::NotFound);
        }

        Err(IntlError::Http {
            status: response.status,
            status_text: response.status_text,
            url: response.url,
        })
    }

    /// Refetch a server-loaded pack once the browser is idle.
    fn schedule_deferred_force_load(&self, component_key: &str, locale: &str, options: &LoadOptions) {
        let loader = self.clone();
        let component_key = component_key.to_string();
        let options = LoadOptions {
            locale: Some(locale.to_string()),
            force: true,
            ..options.clone()
        };

        debug!(
            locale,
            component_key = %component_key,
            scheduler = self.env.scheduler().name(),
            "Scheduling deferred language pack reload"
        );
        self.env.scheduler().schedule(
            async move {
                if let Err(error) = loader.load_language_pack(&component_key, options).await {
                    debug!(component_key = %component_key, error = %error, "Deferred reload failed");
                }
            }
            .boxed(),
        );
    }

    /// Query the active locale's pack, loading it unless it failed recently.
    pub fn query_language_pack(&self, component_key: &str, options: QueryOptions) -> LanguagePackQuery {
        let (locale, recent_error) = self.store.select(|state| {
            let locale = state.active_locale.clone();
            let recent_error = locale
                .as_deref()
                .and_then(|locale| state.entry(locale, component_key))
                .and_then(|entry| match (&entry.error, entry.error_expiration) {
                    (Some(error), Some(expiration)) if Instant::now() <= expiration => {
                        Some(Arc::clone(error))
                    }
                    _ => None,
                });
            (locale, recent_error)
        });

        if let Some(error) = recent_error {
            return self.query_snapshot(component_key, PendingLanguagePack::ready(Err(error)));
        }

        let promise = self.load_language_pack(
            component_key,
            LoadOptions {
                locale,
                fallback_locale: options.fallback_locale,
                ..LoadOptions::default()
            },
        );
        self.query_snapshot(component_key, promise)
    }

    fn query_snapshot(&self, component_key: &str, promise: PendingLanguagePack) -> LanguagePackQuery {
        self.store.select(|state| {
            let locale = state.active_locale.clone();
            let entry = locale
                .as_deref()
                .and_then(|locale| state.entry(locale, component_key));
            match entry {
                Some(entry) => LanguagePackQuery {
                    locale,
                    status: if entry.is_loading {
                        QueryStatus::Loading
                    } else {
                        QueryStatus::Complete
                    },
                    data: Arc::clone(&entry.data),
                    error: entry.error.clone(),
                    error_expiration: entry.error_expiration,
                    promise,
                },
                None => LanguagePackQuery {
                    locale,
                    status: QueryStatus::Loading,
                    data: empty_pack(),
                    error: None,
                    error_expiration: None,
                    promise,
                },
            }
        })
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
