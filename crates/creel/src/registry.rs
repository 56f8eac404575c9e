//! Identifier-indexed object store with free-list ID reuse.
//!
//! [`Registry`] hands out 1-based [`ObjectId`]s backed by a dense element
//! buffer, a parallel validity-flag buffer, and a stack of freed
//! identifiers. A freed identifier is reissued by the next push, LIFO, and
//! its dense slot is overwritten in place. There is no generation counter:
//! reuse is immediate and a reissued identifier is indistinguishable from
//! its previous life, so callers that need staleness detection must layer
//! it on top.

use std::fmt;

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::error::ContainerError;

/// A 1-based handle into a [`Registry`].
///
/// Zero is reserved as "no identifier" ([`ObjectId::NONE`]) and is never
/// issued by [`Registry::push`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// The reserved "no identifier" value.
    pub const NONE: Self = Self(0);

    /// Whether this is the reserved "no identifier" value.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ObjectId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// An identifier-indexed store over three [`Buffer`]s.
///
/// Identifier `id` lives in dense slot `id - 1`. An identifier is live iff
/// `0 < id < next_id` and its validity flag is set.
#[derive(Debug)]
pub struct Registry<T> {
    elements: Buffer<T>,
    valid: Buffer<bool>,
    free_ids: Buffer<u32>,
    next_id: u32,
}

impl<T> Registry<T> {
    /// Create an empty registry with no backing storage.
    pub fn new() -> Self {
        Self {
            elements: Buffer::new(),
            valid: Buffer::new(),
            free_ids: Buffer::new(),
            next_id: 1,
        }
    }

    /// Create an empty registry with all three backing buffers
    /// preallocated to `capacity`.
    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        Ok(Self {
            elements: Buffer::with_capacity(capacity)?,
            valid: Buffer::with_capacity(capacity)?,
            free_ids: Buffer::with_capacity(capacity)?,
            next_id: 1,
        })
    }

    /// Store `value` and return its identifier.
    ///
    /// Reuses the most recently freed identifier if any, otherwise appends
    /// a dense slot and issues the next sequential identifier. Never
    /// returns [`ObjectId::NONE`]; on allocation failure no mutation is
    /// observable.
    pub fn push(&mut self, value: T) -> Result<ObjectId, ContainerError> {
        if let Ok(id) = self.free_ids.pop_back() {
            let index = (id - 1) as usize;
            let Some(slot) = self.elements.at_mut(index) else {
                // A free-list entry always names a previously issued slot.
                return Err(ContainerError::OutOfBounds {
                    index,
                    count: self.elements.count(),
                });
            };
            *slot = value;
            if let Some(flag) = self.valid.at_mut(index) {
                *flag = true;
            }
            return Ok(ObjectId(id));
        }

        self.elements.push_back(value)?;
        if let Err(err) = self.valid.push_back(true) {
            // Roll the dense append back so the failure is not observable.
            let _ = self.elements.pop_back();
            return Err(err);
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(ObjectId(id))
    }

    /// [`Registry::push`] with `T::default()` as the stored value.
    pub fn push_default(&mut self) -> Result<ObjectId, ContainerError>
    where
        T: Default,
    {
        self.push(T::default())
    }

    /// Copy the element out, invalidate `id`, and queue it for reuse.
    ///
    /// Returns `None` when `id` is not live or when the free stack cannot
    /// grow; in both cases the registry is unchanged.
    pub fn pop(&mut self, id: ObjectId) -> Option<T>
    where
        T: Clone,
    {
        let value = self.get(id)?.clone();
        self.release(id).then_some(value)
    }

    /// Invalidate `id` and queue it for reuse, without copying the element.
    ///
    /// Returns `false` when `id` is not live or when the free stack cannot
    /// grow; in both cases the registry is unchanged.
    pub fn release(&mut self, id: ObjectId) -> bool {
        if !self.exists(id) {
            return false;
        }
        if self.free_ids.push_back(id.0).is_err() {
            return false;
        }
        if let Some(flag) = self.valid.at_mut((id.0 - 1) as usize) {
            *flag = false;
        }
        true
    }

    /// Shared access to the live element for `id`.
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        if !self.exists(id) {
            return None;
        }
        self.elements.at((id.0 - 1) as usize)
    }

    /// Mutable access to the live element for `id`.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        if !self.exists(id) {
            return None;
        }
        self.elements.at_mut((id.0 - 1) as usize)
    }

    /// Whether `id` is currently live.
    pub fn exists(&self, id: ObjectId) -> bool {
        let raw = id.0;
        if raw == 0 || raw >= self.next_id {
            return false;
        }
        self.valid.at((raw - 1) as usize).copied().unwrap_or(false)
    }

    /// Number of dense slots ever allocated, including currently freed
    /// ones. Never decreases.
    pub fn alloc_count(&self) -> u32 {
        self.elements.count() as u32
    }

    /// Number of live identifiers. Walks the validity flags.
    pub fn live_count(&self) -> usize {
        self.valid.iter().filter(|&&flag| flag).count()
    }

    /// Whether all three backing buffers have storage reserved.
    pub fn is_valid(&self) -> bool {
        self.elements.is_valid() && self.valid.is_valid() && self.free_ids.is_valid()
    }

    /// Cursor on the live element with the smallest identifier.
    pub fn begin(&self) -> Cursor {
        match self.live_at_or_after(1) {
            Some(pos) => Cursor::At(pos),
            None => Cursor::AfterLast,
        }
    }

    /// Cursor on the live element with the largest identifier.
    pub fn end(&self) -> Cursor {
        match self.last_live() {
            Some(pos) => Cursor::At(pos),
            None => Cursor::BeforeFirst,
        }
    }

    /// Advance to the next live identifier, saturating at `AfterLast`.
    pub fn cursor_next(&self, cursor: &mut Cursor) {
        cursor.step_next(
            || self.live_at_or_after(1),
            |pos| self.live_at_or_after(pos as u32 + 1),
        );
    }

    /// Move back to the previous live identifier, saturating at
    /// `BeforeFirst`.
    pub fn cursor_previous(&self, cursor: &mut Cursor) {
        cursor.step_previous(
            || self.last_live(),
            |pos| match pos as u32 {
                0 | 1 => None,
                id => self.live_at_or_before(id - 1),
            },
        );
    }

    /// The element the cursor is on, or `None` at a sentinel.
    pub fn cursor_get(&self, cursor: &Cursor) -> Option<&T> {
        self.get(self.cursor_id(cursor)?)
    }

    /// The identifier the cursor is on, or `None` at a sentinel.
    pub fn cursor_id(&self, cursor: &Cursor) -> Option<ObjectId> {
        cursor.position().map(|pos| ObjectId(pos as u32))
    }

    /// Iterate over live `(identifier, element)` pairs in ascending
    /// identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        (1..self.next_id).filter_map(move |id| {
            let index = (id - 1) as usize;
            if *self.valid.at(index)? {
                Some((ObjectId(id), self.elements.at(index)?))
            } else {
                None
            }
        })
    }

    /// Smallest live identifier `>= id`, as a cursor position.
    fn live_at_or_after(&self, id: u32) -> Option<usize> {
        (id..self.next_id)
            .find(|&i| self.valid.at((i - 1) as usize).copied().unwrap_or(false))
            .map(|i| i as usize)
    }

    /// Largest live identifier `<= id`, as a cursor position.
    fn live_at_or_before(&self, id: u32) -> Option<usize> {
        let upper = id.min(self.next_id.saturating_sub(1));
        (1..=upper)
            .rev()
            .find(|&i| self.valid.at((i - 1) as usize).copied().unwrap_or(false))
            .map(|i| i as usize)
    }

    fn last_live(&self) -> Option<usize> {
        self.live_at_or_before(self.next_id.saturating_sub(1))
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_issues_strictly_increasing_ids() {
        let mut r = Registry::new();
        let a = r.push(10u32).unwrap();
        let b = r.push(20).unwrap();
        let c = r.push(30).unwrap();
        assert_eq!(a, ObjectId(1));
        assert_eq!(b, ObjectId(2));
        assert_eq!(c, ObjectId(3));
        assert!(!a.is_none());
    }

    #[test]
    fn freed_id_is_reused_by_next_push() {
        // Push 1, push 2, pop the first, push 3: the freed id comes back.
        let mut r = Registry::with_capacity(4).unwrap();
        let id1 = r.push(1u32).unwrap();
        let id2 = r.push(2).unwrap();
        assert_eq!(r.pop(id1), Some(1));
        let id3 = r.push(3).unwrap();
        assert_eq!(id3, id1);
        assert!(r.exists(id2));
        assert!(r.exists(id1));
        assert_eq!(r.get(id1), Some(&3));
    }

    #[test]
    fn pop_invalidates_and_repeated_pop_fails() {
        let mut r = Registry::new();
        let id = r.push(7u32).unwrap();
        assert_eq!(r.pop(id), Some(7));
        assert!(!r.exists(id));
        assert_eq!(r.pop(id), None);
        assert_eq!(r.get(id), None);
    }

    #[test]
    fn release_discards_without_copy() {
        let mut r = Registry::new();
        let id = r.push(5u32).unwrap();
        assert!(r.release(id));
        assert!(!r.exists(id));
        assert!(!r.release(id));
    }

    #[test]
    fn none_and_unissued_ids_do_not_exist() {
        let mut r = Registry::new();
        r.push(1u32).unwrap();
        assert!(!r.exists(ObjectId::NONE));
        assert!(!r.exists(ObjectId(2)));
        assert!(!r.exists(ObjectId(u32::MAX)));
    }

    #[test]
    fn alloc_count_never_decreases() {
        let mut r = Registry::new();
        let id1 = r.push(1u32).unwrap();
        r.push(2).unwrap();
        assert_eq!(r.alloc_count(), 2);
        r.pop(id1);
        assert_eq!(r.alloc_count(), 2);
        r.push(3).unwrap(); // reuses id1's slot
        assert_eq!(r.alloc_count(), 2);
        r.push(4).unwrap(); // fresh slot
        assert_eq!(r.alloc_count(), 3);
    }

    #[test]
    fn live_count_tracks_pops() {
        let mut r = Registry::new();
        let id = r.push(1u32).unwrap();
        r.push(2).unwrap();
        assert_eq!(r.live_count(), 2);
        r.pop(id);
        assert_eq!(r.live_count(), 1);
    }

    #[test]
    fn push_default_zero_fills() {
        let mut r: Registry<u64> = Registry::new();
        let id = r.push_default().unwrap();
        assert_eq!(r.get(id), Some(&0));
    }

    #[test]
    fn get_mut_writes_through() {
        let mut r = Registry::new();
        let id = r.push(1u32).unwrap();
        *r.get_mut(id).unwrap() = 99;
        assert_eq!(r.get(id), Some(&99));
    }

    #[test]
    fn cursor_skips_freed_identifiers() {
        let mut r = Registry::new();
        let _id1 = r.push(10u32).unwrap();
        let id2 = r.push(20).unwrap();
        let _id3 = r.push(30).unwrap();
        r.pop(id2);

        let mut seen = Vec::new();
        let mut c = r.begin();
        while let Some(&v) = r.cursor_get(&c) {
            seen.push(v);
            r.cursor_next(&mut c);
        }
        assert_eq!(seen, vec![10, 30]);
        assert_eq!(c, Cursor::AfterLast);

        // Reverse walk from the sentinel.
        r.cursor_previous(&mut c);
        assert_eq!(r.cursor_id(&c), Some(ObjectId(3)));
        r.cursor_previous(&mut c);
        assert_eq!(r.cursor_id(&c), Some(ObjectId(1)));
        r.cursor_previous(&mut c);
        assert_eq!(c, Cursor::BeforeFirst);
    }

    #[test]
    fn iter_yields_live_pairs_in_id_order() {
        let mut r = Registry::new();
        let a = r.push(10u32).unwrap();
        let b = r.push(20).unwrap();
        let c = r.push(30).unwrap();
        r.pop(b);
        let pairs: Vec<(ObjectId, u32)> = r.iter().map(|(id, &v)| (id, v)).collect();
        assert_eq!(pairs, vec![(a, 10), (c, 30)]);
    }

    #[test]
    fn with_capacity_preallocates_all_buffers() {
        let r: Registry<u32> = Registry::with_capacity(8).unwrap();
        assert!(r.is_valid());
        assert_eq!(r.alloc_count(), 0);
        let empty: Registry<u32> = Registry::new();
        assert!(!empty.is_valid());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ids_without_frees_are_sequential(count in 0usize..64) {
                let mut r = Registry::new();
                for i in 0..count {
                    let id = r.push(i as u32).unwrap();
                    prop_assert_eq!(id, ObjectId(i as u32 + 1));
                }
                prop_assert_eq!(r.alloc_count() as usize, count);
            }

            #[test]
            fn alloc_count_is_monotonic(
                ops in proptest::collection::vec(any::<bool>(), 0..128),
            ) {
                let mut r = Registry::new();
                let mut live = Vec::new();
                let mut high_water = 0u32;
                for (i, push) in ops.into_iter().enumerate() {
                    if push {
                        live.push(r.push(i as u32).unwrap());
                    } else if let Some(id) = live.pop() {
                        prop_assert!(r.release(id));
                    }
                    let now = r.alloc_count();
                    prop_assert!(now >= high_water);
                    high_water = now;
                    prop_assert_eq!(r.live_count(), live.len());
                }
            }

            #[test]
            fn live_elements_survive_churn(
                values in proptest::collection::vec(any::<u32>(), 1..32),
            ) {
                // Every odd-round push is popped straight back, feeding the
                // free list; kept ids must keep their values regardless of
                // how often their neighbours are reissued.
                let mut r = Registry::new();
                let mut kept = Vec::new();
                for (i, &v) in values.iter().enumerate() {
                    let id = r.push(v).unwrap();
                    if i % 2 == 0 {
                        kept.push((id, v));
                    } else {
                        prop_assert_eq!(r.pop(id), Some(v));
                    }
                }
                for &(id, v) in &kept {
                    prop_assert_eq!(r.get(id), Some(&v));
                }
                prop_assert_eq!(r.live_count(), kept.len());
            }
        }
    }
}
