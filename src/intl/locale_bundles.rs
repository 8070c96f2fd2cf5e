//! Installed locale-data bundles and their one-time loading.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::IntlError;

/// Opaque loader installing one bundle's data.
pub type BundleLoader = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

type BundleLoad = Shared<BoxFuture<'static, Result<(), Arc<anyhow::Error>>>>;

/// Table of bundle tags to loaders, with per-locale memoized loads.
#[derive(Default)]
pub struct LocaleBundles {
    loaders: RwLock<HashMap<String, BundleLoader>>,
    /// Keyed by the locale string callers asked for, not the resolved tag.
    loads: Mutex<HashMap<String, BundleLoad>>,
}

impl LocaleBundles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a loader for a bundle tag such as `en` or `zh-Hant`.
    pub fn register<F, Fut>(&self, tag: impl Into<String>, loader: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let loader: BundleLoader = Arc::new(move || loader().boxed());
        self.loaders.write().insert(tag.into(), loader);
    }

    /// Best installed tag for `locale`, dropping trailing subtags until one matches.
    ///
    /// `zz-Hans-XA` tries `zz-Hans-XA`, then `zz-Hans`, then `zz`.
    pub fn resolve(&self, locale: &str) -> Option<String> {
        let loaders = self.loaders.read();
        let mut candidate = locale;
        loop {
            if !candidate.is_empty() && loaders.contains_key(candidate) {
                return Some(candidate.to_string());
            }
            let (prefix, _) = candidate.rsplit_once('-')?;
            candidate = prefix;
        }
    }

    /// Load the bundle for `locale` and return the tag that was used.
    ///
    /// Each distinct locale string runs its loader once; concurrent callers
    /// share that run. A failed run is forgotten so the next call retries.
    pub async fn get_locale_pack(&self, locale: &str) -> Result<String, IntlError> {
        let tag = self.resolve(locale).ok_or_else(|| IntlError::NoLocaleBundle {
            locale: locale.to_string(),
        })?;

        let load = {
            let mut loads = self.loads.lock();
            match loads.get(locale) {
                Some(load) => load.clone(),
                None => {
                    let loader = self.loaders.read().get(&tag).cloned().ok_or_else(|| {
                        IntlError::NoLocaleBundle {
                            locale: locale.to_string(),
                        }
                    })?;
                    debug!(locale, tag = %tag, "Loading locale bundle");
                    let load: BundleLoad = async move { loader().await.map_err(Arc::new) }
                        .boxed()
                        .shared();
                    loads.insert(locale.to_string(), load.clone());
                    load
                }
            }
        };

        match load.clone().await {
            Ok(()) => Ok(tag),
            Err(err) => {
                let mut loads = self.loads.lock();
                if loads.get(locale).is_some_and(|stored| stored.ptr_eq(&load)) {
                    loads.remove(locale);
                }
                Err(IntlError::BundleLoad {
                    locale: locale.to_string(),
                    message: format!("{err:#}"),
                })
            }
        }
    }

    /// Whether a load for exactly this locale string has completed successfully.
    pub fn is_loaded(&self, locale: &str) -> bool {
        self.loads
            .lock()
            .get(locale)
            .and_then(|load| load.peek())
            .is_some_and(|result| result.is_ok())
    }

    /// Forget every completed or in-flight load. Registered loaders stay.
    pub fn reset(&self) {
        self.loads.lock().clear();
    }
}
