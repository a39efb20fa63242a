use arbitrary::Unstructured;
use arbtest::{arbitrary, arbtest};
use dynarray::{store::next_capacity, Array, Error, Slot};

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    Cons(Slot),
    Remove(usize),
    Set(usize, Slot),
    Reverse,
    Concat(Vec<Slot>),
    // Keep the multiples of `n + 1`.
    Filter(u8),
    Map(i64),
}

fn multiple_of(slot: Slot, n: u8) -> bool {
    slot.is_some_and(|x| x.rem_euclid(i64::from(n) + 1) == 0)
}

impl Op {
    fn apply_to_vec(&self, vec: &mut Vec<Slot>) {
        match self {
            Op::Cons(x) => vec.push(*x),
            Op::Remove(pos) => {
                if !vec.is_empty() {
                    vec.remove(pos % vec.len());
                }
            }
            Op::Set(pos, x) => {
                if !vec.is_empty() {
                    let len = vec.len();
                    vec[pos % len] = *x;
                }
            }
            Op::Reverse => vec.reverse(),
            Op::Concat(xs) => vec.extend_from_slice(xs),
            Op::Filter(n) => vec.retain(|slot| multiple_of(*slot, *n)),
            Op::Map(d) => {
                for slot in vec.iter_mut() {
                    *slot = slot.map(|x| x.wrapping_add(*d));
                }
            }
        }
    }

    fn apply_to_array(&self, arr: &Array) -> Array {
        match self {
            Op::Cons(x) => arr.cons(*x),
            Op::Remove(pos) => {
                if arr.is_empty() {
                    arr.clone()
                } else {
                    arr.remove(pos % arr.size()).unwrap()
                }
            }
            Op::Set(pos, x) => {
                if arr.is_empty() {
                    arr.clone()
                } else {
                    arr.set(pos % arr.size(), *x).unwrap()
                }
            }
            Op::Reverse => arr.reverse(),
            Op::Concat(xs) => arr.concat(&Array::from_list(xs.iter().copied())),
            Op::Filter(n) => arr.filter(|slot| multiple_of(slot, *n)),
            Op::Map(d) => arr.map(|slot| slot.map(|x| x.wrapping_add(*d))),
        }
    }
}

// u.arbitrary() generates very short vecs by default:
// https://github.com/matklad/arbtest/issues/8
fn arb_vec(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<Slot>> {
    let len = u.arbitrary_len::<Slot>()?;
    std::iter::from_fn(|| Some(u.arbitrary::<Slot>()))
        .take(len)
        .collect()
}

fn arb_ints(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<i64>> {
    let len = u.arbitrary_len::<i64>()?;
    std::iter::from_fn(|| Some(u.arbitrary::<i64>()))
        .take(len)
        .collect()
}

#[test]
fn mutations() {
    arbtest(|u| {
        let mut vec: Vec<Slot> = arb_vec(u)?;
        let mut arr = Array::from_list(vec.iter().copied());
        let ops: Vec<Op> = u.arbitrary()?;

        for op in ops {
            op.apply_to_vec(&mut vec);
            arr = op.apply_to_array(&arr);

            arr.check_invariants();
            assert_eq!(vec, arr.to_list());
            assert_eq!(vec, arr.iter().collect::<Vec<_>>());
            assert!(arr.size() <= arr.capacity());
        }

        Ok(())
    });
}

#[test]
fn operations_leave_receiver_unchanged() {
    arbtest(|u| {
        let vec: Vec<Slot> = arb_vec(u)?;
        let arr = Array::from_list(vec.iter().copied());
        let before = arr.to_string();
        let capacity = arr.capacity();
        let ops: Vec<Op> = u.arbitrary()?;

        for op in ops {
            let derived = op.apply_to_array(&arr);
            derived.check_invariants();
            assert_eq!(arr.to_string(), before);
            assert_eq!(arr.to_list(), vec);
            assert_eq!(arr.capacity(), capacity);
        }

        Ok(())
    });
}

#[test]
fn from_list_to_list() {
    arbtest(|u| {
        let vec: Vec<Slot> = arb_vec(u)?;
        let arr = Array::from_list(vec.iter().copied());
        assert_eq!(arr.to_list(), vec);
        assert_eq!(arr.size(), vec.len());

        let consed = vec.iter().fold(Array::empty(), |arr, slot| arr.cons(*slot));
        assert_eq!(consed, arr);

        Ok(())
    });
}

#[test]
fn concat_is_a_monoid() {
    arbtest(|u| {
        let a = Array::from_list(arb_vec(u)?);
        let b = Array::from_list(arb_vec(u)?);
        let c = Array::from_list(arb_vec(u)?);

        assert_eq!(a.concat(&b).concat(&c), a.concat(&b.concat(&c)));
        assert_eq!(a.concat(&Array::empty()), a);
        assert_eq!(Array::empty().concat(&a), a);
        assert_eq!(a.concat(&b).size(), a.size() + b.size());

        Ok(())
    });
}

#[test]
fn remove_shrinks_by_one() {
    arbtest(|u| {
        let vec = arb_vec(u)?;
        let arr = Array::from_list(vec.iter().copied());
        let pos: usize = u.arbitrary()?;

        if arr.is_empty() {
            assert_eq!(
                arr.remove(pos),
                Err(Error::IndexOutOfRange { pos, size: 0 })
            );
        } else {
            let pos = pos % arr.size();
            let removed = arr.remove(pos).unwrap();
            assert_eq!(removed.size(), arr.size() - 1);
            assert_eq!(removed.capacity(), arr.capacity());
        }

        Ok(())
    });
}

#[test]
fn reverse_is_an_involution() {
    arbtest(|u| {
        let mut vec = arb_vec(u)?;
        let arr = Array::from_list(vec.iter().copied());

        assert_eq!(arr.reverse().reverse(), arr);
        vec.reverse();
        assert_eq!(arr.reverse().to_list(), vec);

        Ok(())
    });
}

#[test]
fn filter_is_idempotent() {
    arbtest(|u| {
        let vec = arb_vec(u)?;
        let arr = Array::from_list(vec.iter().copied());
        let n: u8 = u.arbitrary()?;

        let once = arr.filter(|slot| multiple_of(slot, n));
        assert_eq!(once.filter(|slot| multiple_of(slot, n)), once);
        assert_eq!(once.capacity(), once.size());

        let expected: Vec<Slot> = vec.into_iter().filter(|slot| multiple_of(*slot, n)).collect();
        assert_eq!(once.to_list(), expected);
        assert_eq!(arr.find(|slot| multiple_of(slot, n)), expected);

        Ok(())
    });
}

#[test]
fn map_preserves_size() {
    arbtest(|u| {
        let arr = Array::from_list(arb_vec(u)?);
        let d: i64 = u.arbitrary()?;

        let mapped = arr.map(|slot| slot.map(|x| x.wrapping_mul(d)));
        assert_eq!(mapped.size(), arr.size());
        assert_eq!(mapped.capacity(), arr.capacity());

        match arr.iter().position(|slot| slot.is_none()) {
            Some(index) => assert_eq!(
                arr.map_values(|x| x.wrapping_mul(d)),
                Err(Error::InvalidElement { index })
            ),
            None => assert_eq!(arr.map_values(|x| x.wrapping_mul(d)), Ok(mapped)),
        }

        Ok(())
    });
}

#[test]
fn reduce_matches_fold() {
    arbtest(|u| {
        let ints = arb_ints(u)?;
        let initial: i64 = u.arbitrary()?;
        let arr: Array = ints.iter().copied().collect();

        let expected = ints.iter().fold(initial, |acc, x| acc.wrapping_add(*x));
        assert_eq!(arr.reduce(|acc, x| acc.wrapping_add(x), initial), Ok(expected));

        let pos: usize = u.arbitrary()?;
        let pos = pos % (arr.size() + 1);
        let holey = if pos == arr.size() {
            arr.cons(None)
        } else {
            arr.set(pos, None).unwrap()
        };
        assert_eq!(
            holey.reduce(|acc, x| acc.wrapping_add(x), initial),
            Err(Error::TypeMismatch { index: pos })
        );

        Ok(())
    });
}

#[test]
fn capacity_follows_growth_policy() {
    arbtest(|u| {
        let capacity: u8 = u.arbitrary()?;
        let grow_factor: u8 = u.int_in_range(2..=5)?;
        let appends: u8 = u.arbitrary()?;

        let mut arr = Array::with_capacity(capacity.into(), grow_factor.into()).unwrap();
        let mut expected = usize::from(capacity);
        for i in 0..appends {
            if arr.size() == expected {
                expected = next_capacity(expected, grow_factor.into());
            }
            arr = arr.cons(Some(i.into()));
            assert_eq!(arr.capacity(), expected);
        }
        arr.check_invariants();

        Ok(())
    });
}
