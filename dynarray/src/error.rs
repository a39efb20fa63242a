//! Errors reported by array construction and array operations.

/// An error that occurred while building or transforming an array.
///
/// Every failing operation leaves its receiver untouched, so an `Err` never
/// comes with a half-built array.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The capacity is negative, or more slots than can be allocated.
    #[error("invalid capacity {capacity}: capacity must be between 0 and the allocatable maximum")]
    InvalidCapacity { capacity: i64 },

    #[error("invalid grow factor {grow_factor}: grow factor must be at least 2")]
    InvalidGrowFactor { grow_factor: i64 },

    #[error("index {pos} out of range for array of size {size}")]
    IndexOutOfRange { pos: usize, size: usize },

    /// A transformation was handed a slot it cannot process (a hole, for the
    /// integer-only transformations).
    #[error("invalid element at index {index}")]
    InvalidElement { index: usize },

    /// A reduction met a slot that does not fit the reducer's contract.
    #[error("type mismatch at index {index}: expected an integer, found a hole")]
    TypeMismatch { index: usize },

    #[error("end of sequence")]
    EndOfSequence,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
