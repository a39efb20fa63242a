use std::sync::Arc;

use log::{debug, trace};

use crate::error::{Error, Result};

/// A single storage cell: an integer, or a hole.
pub type Slot = Option<i64>;

/// The grow factor used when none is given.
pub const DEFAULT_GROW_FACTOR: usize = 2;

/// The largest number of slots a store can ever hold: a bigger buffer would
/// exceed `isize::MAX` bytes.
pub const MAX_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<Slot>();

/// The capacity that a full store of capacity `current` grows to.
///
/// Growing multiplicatively (instead of by a fixed amount) is what keeps a
/// run of `n` appends at `O(n)` total copying.
///
/// # Examples
///
/// ```rust
/// # use dynarray::store::next_capacity;
/// assert_eq!(next_capacity(0, 2), 1);
/// assert_eq!(next_capacity(1, 2), 2);
/// assert_eq!(next_capacity(4, 3), 12);
/// ```
pub fn next_capacity(current: usize, grow_factor: usize) -> usize {
    if current == 0 {
        1
    } else {
        current.saturating_mul(grow_factor)
    }
}

/// A fixed-capacity buffer of slots, of which only a prefix is in use.
///
/// The buffer is shared between clones and copied the first time a shared
/// store is written to, so a `Store` behaves like a value: no method taking
/// `&self` changes what another store observes.
///
/// Invariants (see [`Store::check_invariants`]):
/// - `size <= capacity`, where the capacity is the length of the buffer;
/// - every slot at or beyond `size` is a hole;
/// - `grow_factor >= 2`.
#[derive(Clone, Debug)]
pub struct Store {
    slots: Arc<Vec<Slot>>,
    size: usize,
    grow_factor: usize,
}

impl Default for Store {
    fn default() -> Self {
        Store::with_layout(0, DEFAULT_GROW_FACTOR)
    }
}

impl Store {
    /// Allocates an empty store with room for `capacity` slots.
    ///
    /// Fails if `capacity` is negative, larger than [`MAX_CAPACITY`] or
    /// cannot be allocated, or if `grow_factor` is smaller than 2.
    pub fn allocate(capacity: i64, grow_factor: i64) -> Result<Self> {
        let capacity_slots = usize::try_from(capacity)
            .ok()
            .filter(|slots| *slots <= MAX_CAPACITY)
            .ok_or_else(|| {
                debug!("rejecting store allocation with capacity {capacity}");
                Error::InvalidCapacity { capacity }
            })?;
        let grow_factor_checked = usize::try_from(grow_factor)
            .ok()
            .filter(|factor| *factor >= 2)
            .ok_or_else(|| {
                debug!("rejecting store allocation with grow factor {grow_factor}");
                Error::InvalidGrowFactor { grow_factor }
            })?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity_slots).map_err(|err| {
            debug!("failed to allocate a store of {capacity} slots: {err}");
            Error::InvalidCapacity { capacity }
        })?;
        slots.resize(capacity_slots, None);

        Ok(Store {
            slots: Arc::new(slots),
            size: 0,
            grow_factor: grow_factor_checked,
        })
    }

    /// Allocates an empty store. `grow_factor` must already be validated.
    pub(crate) fn with_layout(capacity: usize, grow_factor: usize) -> Self {
        debug_assert!(grow_factor >= 2);
        Store {
            slots: Arc::new(vec![None; capacity]),
            size: 0,
            grow_factor,
        }
    }

    /// Builds a store whose capacity is exactly the number of slots.
    pub(crate) fn tight<I: IntoIterator<Item = Slot>>(slots: I, grow_factor: usize) -> Self {
        let slots: Vec<Slot> = slots.into_iter().collect();
        Store {
            size: slots.len(),
            slots: Arc::new(slots),
            grow_factor,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn grow_factor(&self) -> usize {
        self.grow_factor
    }

    fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// The slots in use, in order. The reserved tail is never exposed.
    pub fn slots(&self) -> &[Slot] {
        &self.slots[..self.size]
    }

    /// Gets the slot at `idx`, or `None` if `idx` is not below the size.
    pub fn get(&self, idx: usize) -> Option<Slot> {
        self.slots().get(idx).copied()
    }

    /// Returns a copy of this store with `value` written just past the end,
    /// growing the capacity first if the store is full.
    pub fn with_appended(&self, value: Slot) -> Store {
        self.clone().push(value)
    }

    /// Appends `value`, reusing the buffer when nothing else refers to it.
    pub fn push(mut self, value: Slot) -> Store {
        if self.is_full() {
            self.grow();
        }
        let idx = self.size;
        Arc::make_mut(&mut self.slots)[idx] = value;
        self.size += 1;
        self
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = next_capacity(old_capacity, self.grow_factor).min(MAX_CAPACITY);
        assert!(new_capacity > old_capacity, "store capacity overflow");
        trace!("growing store from {old_capacity} to {new_capacity} slots");

        match Arc::get_mut(&mut self.slots) {
            Some(slots) => slots.resize(new_capacity, None),
            None => {
                // Shared: copy the used prefix straight into the bigger
                // buffer rather than cloning and then resizing.
                let mut slots = Vec::with_capacity(new_capacity);
                slots.extend_from_slice(&self.slots[..self.size]);
                slots.resize(new_capacity, None);
                self.slots = Arc::new(slots);
            }
        }
    }

    fn check_pos(&self, pos: usize) -> Result<()> {
        if pos < self.size {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                pos,
                size: self.size,
            })
        }
    }

    /// Returns a copy of this store with the slot at `pos` replaced.
    pub fn with_slot(&self, pos: usize, value: Slot) -> Result<Store> {
        self.check_pos(pos)?;
        let mut ret = self.clone();
        Arc::make_mut(&mut ret.slots)[pos] = value;
        Ok(ret)
    }

    /// Returns a copy of this store with the slot at `pos` removed. The
    /// following slots move down by one; the capacity stays the same.
    pub fn without(&self, pos: usize) -> Result<Store> {
        self.check_pos(pos)?;
        let mut ret = self.clone();
        let last = ret.size - 1;
        let slots = Arc::make_mut(&mut ret.slots);
        slots[pos..=last].rotate_left(1);
        slots[last] = None;
        ret.size = last;
        Ok(ret)
    }

    /// Returns a copy of this store with the slots in use in reverse order.
    pub fn reversed(&self) -> Store {
        let mut ret = self.clone();
        let size = ret.size;
        Arc::make_mut(&mut ret.slots)[..size].reverse();
        ret
    }

    pub fn check_invariants(&self) {
        assert!(self.size <= self.capacity());
        assert!(self.grow_factor >= 2);
        assert!(self.slots[self.size..].iter().all(Option::is_none));
    }
}
