//! Base trait for duck state.

/// Marker trait for duck state objects.
///
/// States should be:
/// - Cheap to snapshot (Clone)
/// - Self-contained (everything selectors need)
/// - Comparable (PartialEq for detecting changes)
pub trait DuckState: Clone + PartialEq + Default + Send + 'static {}
