use std::{
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    ops::{Add, Index},
};

use crate::{
    config::ArrayConfig,
    error::{Error, Result},
    store::{Slot, Store, DEFAULT_GROW_FACTOR},
};

/// An immutable dynamic array of integer slots.
///
/// Every operation that looks like a modification returns a new array and
/// leaves the receiver exactly as it was. Cloning is cheap: clones share their
/// backing store until one of them is used to derive a new array.
///
/// Two arrays are equal when they hold the same slots in the same order. The
/// capacity and grow factor play no part in equality.
#[derive(Clone, Default)]
pub struct Array {
    store: Store,
}

impl Array {
    /// An array with no slots and no capacity.
    pub fn new() -> Self {
        Default::default()
    }

    /// Same as [`Array::new`].
    pub fn empty() -> Self {
        Array::new()
    }

    /// An empty array with room for `capacity` slots that grows by
    /// `grow_factor` when it runs out of room.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::{Array, Error};
    /// let arr = Array::with_capacity(4, 3).unwrap();
    /// assert_eq!(arr.capacity(), 4);
    /// assert_eq!(arr.size(), 0);
    /// assert_eq!(
    ///     Array::with_capacity(-1, 2).unwrap_err(),
    ///     Error::InvalidCapacity { capacity: -1 }
    /// );
    /// ```
    pub fn with_capacity(capacity: i64, grow_factor: i64) -> Result<Self> {
        Ok(Array {
            store: Store::allocate(capacity, grow_factor)?,
        })
    }

    /// Same as [`Array::with_capacity`], with the parameters read from `config`.
    pub fn from_config(config: &ArrayConfig) -> Result<Self> {
        Array::with_capacity(config.capacity, config.grow_factor)
    }

    /// Builds an array by appending every value in order.
    ///
    /// The capacity is sized from the iterator's length hint, so building from
    /// an exact-size source gives a capacity equal to the size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let arr = Array::from_list([Some(1), None, Some(3)]);
    /// assert_eq!(arr.size(), 3);
    /// assert_eq!(arr.capacity(), 3);
    /// assert_eq!(arr.to_string(), "[1, None, 3]");
    /// ```
    pub fn from_list<I: IntoIterator<Item = Slot>>(values: I) -> Self {
        let values = values.into_iter();
        let start = Store::with_layout(values.size_hint().0, DEFAULT_GROW_FACTOR);
        Array {
            store: values.fold(start, Store::push),
        }
    }

    /// The number of slots in this array.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// The number of slots allocated for this array.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// The factor by which the capacity is multiplied when a full array grows.
    pub fn grow_factor(&self) -> usize {
        self.store.grow_factor()
    }

    /// Whether this array has no slots in use.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Gets the slot at `pos`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::{Array, Error};
    /// let arr = Array::from_list([Some(1), None]);
    /// assert_eq!(arr.get(0), Ok(Some(1)));
    /// assert_eq!(arr.get(1), Ok(None));
    /// assert_eq!(arr.get(2), Err(Error::IndexOutOfRange { pos: 2, size: 2 }));
    /// ```
    pub fn get(&self, pos: usize) -> Result<Slot> {
        self.store.get(pos).ok_or(Error::IndexOutOfRange {
            pos,
            size: self.size(),
        })
    }

    /// Returns a new array with `value` appended.
    ///
    /// Runs in `O(capacity)`: the new array gets its own copy of the slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let empty = Array::empty();
    /// let arr = empty.cons(Some(1)).cons(None);
    /// assert_eq!(arr.to_string(), "[1, None]");
    /// assert_eq!(empty.to_string(), "[]");
    /// ```
    pub fn cons(&self, value: Slot) -> Array {
        Array {
            store: self.store.with_appended(value),
        }
    }

    /// Returns a new array with the slot at `pos` removed.
    ///
    /// The capacity is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let arr = Array::from_list([Some(1), None]);
    /// assert_eq!(arr.remove(0).unwrap().to_string(), "[None]");
    /// assert_eq!(arr.remove(1).unwrap().to_string(), "[1]");
    /// assert!(arr.remove(2).is_err());
    /// ```
    pub fn remove(&self, pos: usize) -> Result<Array> {
        Ok(Array {
            store: self.store.without(pos)?,
        })
    }

    /// Returns a new array with the slot at `pos` replaced by `value`.
    pub fn set(&self, pos: usize, value: Slot) -> Result<Array> {
        Ok(Array {
            store: self.store.with_slot(pos, value)?,
        })
    }

    /// Returns `true` if `value` is one of this array's slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let arr = Array::from_list([Some(1), None]);
    /// assert!(arr.member(None));
    /// assert!(arr.member(Some(1)));
    /// assert!(!arr.member(Some(2)));
    /// assert!(!Array::empty().member(None));
    /// ```
    pub fn member(&self, value: Slot) -> bool {
        self.store.slots().contains(&value)
    }

    /// Returns a new array with the same slots in reverse order.
    pub fn reverse(&self) -> Array {
        Array {
            store: self.store.reversed(),
        }
    }

    /// A snapshot of the slots, in order.
    pub fn to_list(&self) -> Vec<Slot> {
        self.store.slots().to_vec()
    }

    /// Returns an iterator over the slots.
    ///
    /// A stored hole comes out as `Some(None)`, which keeps it apart from the
    /// `None` that ends the iteration.
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns a new array holding `f` applied to every slot. The size and
    /// capacity are those of `self`.
    ///
    /// Holes are handed to `f` like any other slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let arr = Array::from_list([Some(1), None, Some(3)]);
    /// let doubled = arr.map(|slot| slot.map(|x| 2 * x));
    /// assert_eq!(doubled.to_string(), "[2, None, 6]");
    /// ```
    pub fn map(&self, mut f: impl FnMut(Slot) -> Slot) -> Array {
        let start = Store::with_layout(self.capacity(), self.grow_factor());
        Array {
            store: self
                .iter()
                .fold(start, |store, slot| store.push(f(slot))),
        }
    }

    /// Like [`Array::map`], but stops at the first error `f` returns.
    pub fn try_map(&self, mut f: impl FnMut(Slot) -> Result<Slot>) -> Result<Array> {
        let start = Store::with_layout(self.capacity(), self.grow_factor());
        let store = self
            .iter()
            .try_fold(start, |store, slot| Ok::<_, Error>(store.push(f(slot)?)))?;
        Ok(Array { store })
    }

    /// Maps `f` over an array of integers.
    ///
    /// Fails with [`Error::InvalidElement`] at the first hole.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::{Array, Error};
    /// let cubes = Array::from_iter([1, 2, 3]).map_values(|x| x * x * x).unwrap();
    /// assert_eq!(cubes.to_string(), "[1, 8, 27]");
    ///
    /// let holey = Array::from_list([Some(1), None]);
    /// assert_eq!(holey.map_values(|x| x + 1).unwrap_err(), Error::InvalidElement { index: 1 });
    /// ```
    pub fn map_values(&self, mut f: impl FnMut(i64) -> i64) -> Result<Array> {
        let mut index = 0;
        self.try_map(|slot| {
            let value = slot.ok_or(Error::InvalidElement { index })?;
            index += 1;
            Ok(Some(f(value)))
        })
    }

    /// Combines the slots of `self` and `other` pairwise, stopping at the end
    /// of the shorter one.
    ///
    /// Fails with [`Error::InvalidElement`] at the first position where
    /// either array holds a hole.
    pub fn zip_with(&self, other: &Array, mut f: impl FnMut(i64, i64) -> i64) -> Result<Array> {
        let combined = self
            .iter()
            .zip(other)
            .enumerate()
            .map(|(index, pair)| match pair {
                (Some(a), Some(b)) => Ok(Some(f(a, b))),
                _ => Err(Error::InvalidElement { index }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Array {
            store: Store::tight(combined, self.grow_factor()),
        })
    }

    /// Returns a new array with the slots satisfying `predicate`, in order.
    /// The capacity of the result equals its size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let arr = Array::from_iter([1, 2, 3, 4, 5, 6]);
    /// let odd = arr.filter(|slot| slot.is_some_and(|x| x % 2 == 1));
    /// assert_eq!(odd.to_string(), "[1, 3, 5]");
    /// assert_eq!(odd.capacity(), 3);
    /// ```
    pub fn filter(&self, mut predicate: impl FnMut(Slot) -> bool) -> Array {
        Array {
            store: Store::tight(self.iter().filter(|slot| predicate(*slot)), self.grow_factor()),
        }
    }

    /// Left fold over an array of integers.
    ///
    /// Returns `initial` for an empty array. Fails with
    /// [`Error::TypeMismatch`] at the first hole; `f` is not called again
    /// after that.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::{Array, Error};
    /// let arr = Array::from_iter([1, 2, 3]);
    /// assert_eq!(arr.reduce(|acc, x| acc + x, 10), Ok(16));
    /// assert_eq!(Array::empty().reduce(|acc, x| acc + x, 10), Ok(10));
    ///
    /// let holey = Array::from_list([Some(1), None]);
    /// assert_eq!(holey.reduce(|acc, x| acc + x, 0), Err(Error::TypeMismatch { index: 1 }));
    /// ```
    pub fn reduce<A>(&self, mut f: impl FnMut(A, i64) -> A, initial: A) -> Result<A> {
        self.iter()
            .enumerate()
            .try_fold(initial, |acc, (index, slot)| match slot {
                Some(value) => Ok(f(acc, value)),
                None => Err(Error::TypeMismatch { index }),
            })
    }

    /// Left fold over the raw slots, holes included.
    pub fn fold<A>(&self, f: impl FnMut(A, Slot) -> A, initial: A) -> A {
        self.iter().fold(initial, f)
    }

    /// Every slot satisfying `predicate`, in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let arr = Array::from_iter([2, 4, 4, 9, 5]);
    /// assert_eq!(arr.find(|slot| slot.is_some_and(|x| x % 3 == 0)), vec![Some(9)]);
    /// assert!(arr.find(|slot| slot.is_none()).is_empty());
    /// ```
    pub fn find(&self, mut predicate: impl FnMut(Slot) -> bool) -> Vec<Slot> {
        self.iter().filter(|slot| predicate(*slot)).collect()
    }

    /// Returns a new array with the slots of `self` followed by those of
    /// `other`. The capacity of the result equals its size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::Array;
    /// let a = Array::from_list([Some(1), None]);
    /// let b = Array::from_list([None, Some(1)]);
    /// assert_eq!(a.concat(&b).to_string(), "[1, None, None, 1]");
    /// assert_eq!(&a + &Array::empty(), a);
    /// ```
    pub fn concat(&self, other: &Array) -> Array {
        Array {
            store: Store::tight(self.iter().chain(other), self.grow_factor()),
        }
    }

    /// Panics if the backing store's layout invariants don't hold.
    pub fn check_invariants(&self) {
        self.store.check_invariants();
    }
}

/// An iterator over the slots of an [`Array`].
///
/// Each call to [`Array::iter`] gets its own cursor.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    slots: std::slice::Iter<'a, Slot>,
}

impl Iter<'_> {
    /// Returns `true` if another slot is available.
    pub fn has_next(&self) -> bool {
        !self.slots.as_slice().is_empty()
    }

    /// Returns the next slot, or [`Error::EndOfSequence`] once there are none
    /// left.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dynarray::{Array, Error};
    /// let arr = Array::from_list([None]);
    /// let mut iter = arr.iter();
    /// assert_eq!(iter.advance(), Ok(None));
    /// assert_eq!(iter.advance(), Err(Error::EndOfSequence));
    /// ```
    pub fn advance(&mut self) -> Result<Slot> {
        self.next().ok_or(Error::EndOfSequence)
    }
}

impl Iterator for Iter<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.next_back().copied()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Array {
    type Item = Slot;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            slots: self.store.slots().iter(),
        }
    }
}

impl FromIterator<Slot> for Array {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        Array::from_list(iter)
    }
}

impl FromIterator<i64> for Array {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Array::from_list(iter.into_iter().map(Some))
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.store.slots() == other.store.slots()
    }
}

impl Eq for Array {}

impl Hash for Array {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.store.slots().hash(state);
    }
}

impl Index<usize> for Array {
    type Output = Slot;

    fn index(&self, index: usize) -> &Self::Output {
        self.store.slots().get(index).expect("index out of bounds")
    }
}

impl Add for &Array {
    type Output = Array;

    fn add(self, other: Self) -> Array {
        self.concat(other)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(value) => write!(f, "{value}")?,
                None => f.write_str("None")?,
            }
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("slots", &self.store.slots())
            .field("capacity", &self.capacity())
            .field("grow_factor", &self.grow_factor())
            .finish()
    }
}

impl serde::Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.size()))?;
        for slot in self.iter() {
            seq.serialize_element(&slot)?;
        }
        seq.end()
    }
}

impl<'de> serde::Deserialize<'de> for Array {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slots: Vec<Slot> = Vec::deserialize(deserializer)?;
        Ok(Array::from_list(slots))
    }
}
