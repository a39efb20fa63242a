//! This crate provides an immutable dynamic array of integer slots.
//!
//! [`Array`] looks like a growable vector, but none of its methods modify it:
//! appending, removing, reversing and the higher-order operations all return a
//! fresh array and leave the receiver as it was. A slot is an `Option<i64>`;
//! `None` is a hole, which is stored and counted like any other slot.
//!
//! Underneath, an array owns a [`Store`]: a buffer with a logical size and a
//! larger physical capacity. A full store grows by multiplying its capacity by
//! its grow factor (see [`store::next_capacity`]). The buffer is shared
//! between clones and copied on the first write, so deriving one array from
//! another never disturbs the original.

pub mod array;
pub mod config;
pub mod error;
pub mod store;

pub use array::{Array, Iter};
pub use config::ArrayConfig;
pub use error::{Error, Result};
pub use store::{Slot, Store};
