//! Base trait for application state.

/// Marker trait for the value a store holds.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq decides whether a dispatch changed anything)
/// - Shareable across tasks (Send + Sync)
pub trait AppState: Clone + PartialEq + Send + Sync + 'static {}

impl<T> AppState for T where T: Clone + PartialEq + Send + Sync + 'static {}
