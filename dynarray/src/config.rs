//! Construction parameters for arrays.

use serde::Deserialize;

use crate::store::DEFAULT_GROW_FACTOR;

/// How a fresh array allocates its backing store.
///
/// The fields are signed so that a config read from an untrusted document can
/// carry a bad value all the way to [`crate::Array::from_config`], which
/// reports it as an [`crate::Error`] instead of failing at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Number of slots allocated up front.
    pub capacity: i64,
    /// Factor by which the capacity is multiplied when an append overflows.
    pub grow_factor: i64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        ArrayConfig {
            capacity: 0,
            grow_factor: DEFAULT_GROW_FACTOR as i64,
        }
    }
}

impl ArrayConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn grow_factor(mut self, grow_factor: i64) -> Self {
        self.grow_factor = grow_factor;
        self
    }
}
