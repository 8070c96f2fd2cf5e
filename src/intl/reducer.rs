use super::action::IntlAction;
use super::state::IntlState;
use crate::store::Reducer;

/// Pure state transitions for [`IntlAction`]s.
pub struct IntlReducer;

impl Reducer for IntlReducer {
    type State = IntlState;
    type Action = IntlAction;

    fn reduce(mut state: IntlState, action: IntlAction) -> IntlState {
        match action {
            IntlAction::UpdateLocale { locale } => {
                state.active_locale = Some(locale);
                state.next_locale = None;
            }

            IntlAction::LanguagePackRequest {
                locale,
                component_key,
                promise,
            } => {
                let entry = state.entry_mut(&locale, &component_key);
                if entry.is_server_authoritative() {
                    return state;
                }
                entry.is_loading = true;
                entry.promise = Some(promise);
                entry.error = None;
                entry.error_expiration = None;
            }

            IntlAction::LanguagePackSuccess {
                locale,
                component_key,
                data,
                last_fetched,
                loaded_on_server,
            } => {
                let entry = state.entry_mut(&locale, &component_key);
                entry.data = data;
                entry.is_loading = false;
                entry.promise = None;
                entry.error = None;
                entry.error_expiration = None;
                entry.last_fetched = Some(last_fetched);
                entry.loaded_on_server = loaded_on_server;
                entry.pending_deferred_force_load = false;
            }

            IntlAction::LanguagePackFailure {
                locale,
                component_key,
                error,
                error_expiration,
            } => {
                let entry = state.entry_mut(&locale, &component_key);
                if entry.is_server_authoritative() {
                    return state;
                }
                entry.is_loading = false;
                entry.promise = None;
                entry.error = Some(error);
                entry.error_expiration = Some(error_expiration);
            }

            IntlAction::LanguagePackDeferredForceLoad {
                locale,
                component_key,
            } => {
                state
                    .entry_mut(&locale, &component_key)
                    .pending_deferred_force_load = true;
            }
        }
        state
    }
}
