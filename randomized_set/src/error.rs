use thiserror::Error;

/// Returned when a random item is requested from a set that holds no items.
///
/// This is the only failure of the set's operations. Callers that want to avoid it can check
/// [`RandomizedSet::is_empty`](crate::RandomizedSet::is_empty) first, keeping in mind that other
/// threads may empty the set in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("randomized set is empty")]
pub struct EmptySet;
