//! All ducks of one rendering (server) or page (browser), wired together.

use std::sync::Arc;

use tracing::debug;

use crate::application_error::{self, ApplicationErrorReducer};
use crate::browser::{BrowserReducer, BrowserState};
use crate::config::ConfigStore;
use crate::env::{Environment, Host};
use crate::error_reporting::{ErrorReporter, ErrorReportingReducer, ReportError, ReportedError};
use crate::fetch::FetchClient;
use crate::intl::{IntlLoader, IntlState, IntlStore, LanguagePackCache};
use crate::modules::ModuleRegistry;
use crate::redirection::{self, RedirectionReducer};
use crate::rendering::RenderingReducer;
use crate::store::Store;

/// One store per duck plus the loaders acting on them.
pub struct Ducks {
    pub browser: Store<BrowserReducer>,
    pub error: Store<ApplicationErrorReducer>,
    pub error_reporting: ErrorReporter,
    pub intl: IntlLoader,
    pub redirection: Store<RedirectionReducer>,
    pub rendering: Store<RenderingReducer>,
    env: Environment,
    sweep_caches: bool,
}

impl Ducks {
    /// Build initial state for every duck from the host.
    ///
    /// On the server, a language pack cache is created for this instance and
    /// swept periodically when `cache.sweep_on_start` is set. Use
    /// [`with_language_pack_cache`](Self::with_language_pack_cache) to share
    /// one process-wide cache between renders instead.
    pub fn new(
        host: &Host,
        env: Environment,
        config: ConfigStore,
        modules: Arc<dyn ModuleRegistry>,
        fetch: Arc<dyn FetchClient>,
    ) -> Self {
        let default_locale = config.read(|c| c.intl.default_locale.clone());
        let intl_store = IntlStore::new(IntlState::build_initial_state(host, &default_locale));
        let intl = IntlLoader::new(intl_store, env.clone(), modules, Arc::clone(&fetch))
            .with_config(config.clone());

        let sweep_caches = env.is_server() && config.read(|c| c.cache.sweep_on_start);
        if sweep_caches {
            intl.cache().ensure_sweeper();
        }

        let href = match host {
            Host::Browser(window) => window.location.href.clone(),
            Host::Server { .. } => None,
        };
        let error_reporting = ErrorReporter::new(
            Store::<ErrorReportingReducer>::default(),
            env.clone(),
            fetch,
            config,
        )
        .with_href(href);

        debug!(runtime = ?env.runtime(), "Ducks created");

        Self {
            browser: Store::new(BrowserState::build_initial_state(host)),
            error: Store::default(),
            error_reporting,
            intl,
            redirection: Store::default(),
            rendering: Store::default(),
            env,
            sweep_caches,
        }
    }

    /// Share a language pack cache owned by the caller. The shared cache is
    /// swept under the same setting as a per-instance one.
    pub fn with_language_pack_cache(mut self, cache: Arc<LanguagePackCache>) -> Self {
        if self.sweep_caches {
            cache.ensure_sweeper();
        }
        self.intl = self.intl.with_cache(cache);
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Record an error code and queue a report for it.
    pub async fn application_error(
        &self,
        code: u16,
        error: Option<ReportedError>,
    ) -> Result<Option<String>, ReportError> {
        application_error::application_error(&self.error, &self.error_reporting, code, error).await
    }

    /// Redirect to `destination`; the first server-side destination wins.
    pub fn external_redirect(&self, destination: Option<&str>) {
        self.redirection
            .dispatch(redirection::external_redirect(&self.env, destination));
    }
}
