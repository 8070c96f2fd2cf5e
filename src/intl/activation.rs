//! Choosing the initial locale and switching locales.

use tracing::{debug, info};

use super::action::IntlAction;
use super::loader::IntlLoader;
use super::state::IntlState;
use super::IntlError;
use crate::env::Host;

impl IntlState {
    /// Initial state for a new store.
    ///
    /// On the server the request's most preferred `Accept-Language` entry
    /// wins, unless it is missing or `*`. In the browser the navigator
    /// language is used. Everything else gets `default_locale`.
    pub fn build_initial_state(host: &Host, default_locale: &str) -> Self {
        let negotiated = match host {
            Host::Server {
                request: Some(request),
            } => request
                .accepts_languages()
                .into_iter()
                .next()
                .filter(|locale| locale != "*"),
            Host::Server { request: None } => None,
            Host::Browser(window) => window
                .navigator_language
                .clone()
                .filter(|locale| !locale.is_empty()),
        };

        let active_locale = negotiated.unwrap_or_else(|| default_locale.to_string());
        debug!(locale = %active_locale, runtime = ?host.runtime(), "Initial locale");
        IntlState::new(active_locale)
    }
}

impl IntlLoader {
    /// Make `locale` the active locale once its locale bundle is available.
    ///
    /// Bundle loading is skipped when `intl.use_native_intl` is set.
    pub async fn update_locale(&self, locale: Option<&str>) -> Result<(), IntlError> {
        let locale = locale
            .filter(|locale| !locale.is_empty())
            .ok_or(IntlError::NoLocaleGiven)?;

        if self.config.read(|c| c.intl.use_native_intl) {
            debug!(locale, "Using native Intl data, skipping locale bundle");
        } else {
            let tag = self.bundles.get_locale_pack(locale).await?;
            debug!(locale, bundle = %tag, "Locale bundle ready");
        }

        info!(locale, "Switching active locale");
        self.store().dispatch(IntlAction::UpdateLocale {
            locale: locale.to_string(),
        });
        Ok(())
    }
}
