//! Base trait for actions dispatched to a store.

/// Marker trait for action objects.
///
/// Actions represent:
/// - Host events (locale switch, origin detection)
/// - Loader lifecycle events (request, success, failure)
/// - Scheduling markers (deferred reloads, report retries)
///
/// Actions are processed by reducers to produce new states.
pub trait Action: Clone + Send + 'static {
    /// Scoped type string, e.g. `app-ducks/intl/UPDATE_LOCALE`.
    fn type_name(&self) -> &'static str;
}
