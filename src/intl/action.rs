use std::sync::Arc;

use tokio::time::Instant;

use super::state::{PackData, PendingLanguagePack};
use super::IntlError;
use crate::store::Action;

/// Events reduced into [`IntlState`](super::IntlState).
#[derive(Debug, Clone)]
pub enum IntlAction {
    UpdateLocale {
        locale: String,
    },
    LanguagePackRequest {
        locale: String,
        component_key: String,
        promise: PendingLanguagePack,
    },
    LanguagePackSuccess {
        locale: String,
        component_key: String,
        data: PackData,
        /// Milliseconds since the Unix epoch.
        last_fetched: u64,
        loaded_on_server: bool,
    },
    LanguagePackFailure {
        locale: String,
        component_key: String,
        error: Arc<IntlError>,
        error_expiration: Instant,
    },
    LanguagePackDeferredForceLoad {
        locale: String,
        component_key: String,
    },
}

impl Action for IntlAction {
    fn type_name(&self) -> &'static str {
        match self {
            IntlAction::UpdateLocale { .. } => "app-ducks/intl/UPDATE_LOCALE",
            IntlAction::LanguagePackRequest { .. } => "app-ducks/intl/LANGUAGE_PACK_REQUEST",
            IntlAction::LanguagePackSuccess { .. } => "app-ducks/intl/LANGUAGE_PACK_SUCCESS",
            IntlAction::LanguagePackFailure { .. } => "app-ducks/intl/LANGUAGE_PACK_FAILURE",
            IntlAction::LanguagePackDeferredForceLoad { .. } => {
                "app-ducks/intl/LANGUAGE_PACK_DEFERRED_FORCE_LOAD"
            }
        }
    }
}
