//! Open-addressing hash table with fixed 32-bit keys.
//!
//! [`Table`] stores its slots in one [`Buffer`] and resolves collisions by
//! linear probing: hash the key with a 32-bit avalanche mix, reduce modulo
//! the slot count, then scan forward (wrapping) until a matching key, an
//! unoccupied slot, or a full cycle.
//!
//! Two behavioural caveats are part of the contract and deliberately kept:
//!
//! - **Removal is tombstone-free.** A removed slot becomes plain unoccupied,
//!   and lookups stop at the first unoccupied slot on the probe path. A key
//!   that was placed beyond a later-removed slot is unreachable afterwards.
//! - **Growth does not rehash.** The insert-time growth step enlarges the
//!   slot buffer's reserve capacity only; the probe modulus is fixed at the
//!   slot count chosen at construction, so the table holds at most that
//!   many entries and existing placements never move.

use crate::buffer::{next_pow2, Buffer};
use crate::cursor::Cursor;
use crate::error::ContainerError;

/// Minimum number of slots allocated at construction.
const MIN_SLOTS: usize = 16;

/// One bucket: a key and the value it owns, if occupied.
#[derive(Debug)]
struct Slot<V> {
    key: u32,
    value: Option<V>,
}

impl<V> Slot<V> {
    fn occupied(&self) -> bool {
        self.value.is_some()
    }
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            key: 0,
            value: None,
        }
    }
}

/// Outcome of probing for an insert position.
enum Probe {
    /// An unoccupied slot at this index.
    Vacant(usize),
    /// The key is already present.
    Exists,
    /// Every slot on the probe cycle is occupied.
    Full,
}

/// Murmur3 avalanche finalizer, reduced modulo the slot count.
fn bucket_for(key: u32, slot_count: usize) -> usize {
    let mut k = key;
    k ^= k >> 16;
    k = k.wrapping_mul(0x85eb_ca6b);
    k ^= k >> 13;
    k = k.wrapping_mul(0xc2b2_ae35);
    k ^= k >> 16;
    k as usize % slot_count
}

/// A `u32`-keyed associative map over linearly-probed slots.
///
/// Values are owned by their slot and dropped on removal, [`Table::clear`],
/// or drop of the table itself.
#[derive(Debug)]
pub struct Table<V> {
    buckets: Buffer<Slot<V>>,
    count: usize,
}

impl<V> Table<V> {
    /// Create a table with the default slot count.
    pub fn new() -> Result<Self, ContainerError> {
        Self::with_capacity(0)
    }

    /// Create a table with `max(initial_capacity, 16)` slots, all unoccupied.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, ContainerError> {
        let slot_count = initial_capacity.max(MIN_SLOTS);
        let mut buckets = Buffer::with_capacity(slot_count)?;
        buckets.resize_default(slot_count)?;
        Ok(Self { buckets, count: 0 })
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the slot buffer has backing storage.
    pub fn is_valid(&self) -> bool {
        self.buckets.is_valid()
    }

    /// Number of probeable slots. Fixed at construction; the upper bound on
    /// [`Table::count`].
    pub fn slot_count(&self) -> usize {
        self.buckets.count()
    }

    /// Insert `value` under `key`, taking ownership of it.
    ///
    /// Fails `KeyExists` for a duplicate key and `OutOfMemory` when every
    /// slot on the probe cycle is occupied after the growth attempt.
    pub fn insert(&mut self, key: u32, value: V) -> Result<(), ContainerError> {
        // Growth is best-effort and widens reserve capacity only; the probe
        // below decides whether the insert fits.
        let slot_count = self.buckets.count();
        if slot_count + 1 >= self.buckets.capacity() {
            let _ = self.buckets.reserve(next_pow2(slot_count + 1));
        }

        match self.probe_insert(key) {
            Probe::Exists => Err(ContainerError::KeyExists { key }),
            Probe::Full => Err(ContainerError::OutOfMemory { requested: 1 }),
            Probe::Vacant(index) => match self.buckets.at_mut(index) {
                Some(slot) => {
                    slot.key = key;
                    slot.value = Some(value);
                    self.count += 1;
                    Ok(())
                }
                None => Err(ContainerError::OutOfMemory { requested: 1 }),
            },
        }
    }

    /// Shared access to the value stored under `key`.
    pub fn get(&self, key: u32) -> Option<&V> {
        let index = self.find_entry(key)?;
        self.buckets.at(index)?.value.as_ref()
    }

    /// Remove the entry for `key` and return its value.
    pub fn remove(&mut self, key: u32) -> Result<V, ContainerError> {
        let index = self
            .find_entry(key)
            .ok_or(ContainerError::KeyNotFound { key })?;
        match self.buckets.at_mut(index).and_then(|slot| slot.value.take()) {
            Some(value) => {
                self.count -= 1;
                Ok(value)
            }
            None => Err(ContainerError::KeyNotFound { key }),
        }
    }

    /// Whether `key` is reachable along its probe path.
    pub fn contains(&self, key: u32) -> bool {
        self.find_entry(key).is_some()
    }

    /// Drop every stored value. Slot capacity is retained.
    pub fn clear(&mut self) {
        for index in 0..self.buckets.count() {
            if let Some(slot) = self.buckets.at_mut(index) {
                slot.value = None;
            }
        }
        self.count = 0;
    }

    /// Grow the slot buffer's reserve capacity.
    ///
    /// Refuses (`OutOfMemory`) when `new_capacity` is below the occupied
    /// count. Does not widen the probe range.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), ContainerError> {
        if new_capacity < self.count {
            return Err(ContainerError::OutOfMemory {
                requested: new_capacity,
            });
        }
        self.buckets.reserve(new_capacity)
    }

    /// Cursor on the first occupied slot in bucket order.
    pub fn begin(&self) -> Cursor {
        match self.occupied_at_or_after(0) {
            Some(index) => Cursor::At(index),
            None => Cursor::AfterLast,
        }
    }

    /// Cursor on the last occupied slot in bucket order.
    pub fn end(&self) -> Cursor {
        match self.last_occupied() {
            Some(index) => Cursor::At(index),
            None => Cursor::BeforeFirst,
        }
    }

    /// Advance to the next occupied slot, saturating at `AfterLast`.
    pub fn cursor_next(&self, cursor: &mut Cursor) {
        cursor.step_next(
            || self.occupied_at_or_after(0),
            |pos| self.occupied_at_or_after(pos + 1),
        );
    }

    /// Move back to the previous occupied slot, saturating at `BeforeFirst`.
    pub fn cursor_previous(&self, cursor: &mut Cursor) {
        cursor.step_previous(
            || self.last_occupied(),
            |pos| pos.checked_sub(1).and_then(|end| self.occupied_at_or_before(end)),
        );
    }

    /// The value stored at the cursor's slot, or `None` at a sentinel.
    pub fn cursor_get(&self, cursor: &Cursor) -> Option<&V> {
        let index = cursor.position()?;
        self.buckets.at(index)?.value.as_ref()
    }

    /// Iterate over stored values in ascending bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.buckets.iter().filter_map(|slot| slot.value.as_ref())
    }

    /// Probe for `key`, stopping at the first unoccupied slot on the path.
    fn find_entry(&self, key: u32) -> Option<usize> {
        let slot_count = self.buckets.count();
        if slot_count == 0 {
            return None;
        }
        let origin = bucket_for(key, slot_count);
        let mut index = origin;
        loop {
            let slot = self.buckets.at(index)?;
            if slot.occupied() {
                if slot.key == key {
                    return Some(index);
                }
            } else {
                return None;
            }
            index = (index + 1) % slot_count;
            if index == origin {
                return None;
            }
        }
    }

    /// Probe for a free slot for `key`, sharing the lookup probe order.
    fn probe_insert(&self, key: u32) -> Probe {
        let slot_count = self.buckets.count();
        if slot_count == 0 {
            return Probe::Full;
        }
        let origin = bucket_for(key, slot_count);
        let mut index = origin;
        loop {
            match self.buckets.at(index) {
                Some(slot) if !slot.occupied() => return Probe::Vacant(index),
                Some(slot) if slot.key == key => return Probe::Exists,
                _ => {}
            }
            index = (index + 1) % slot_count;
            if index == origin {
                return Probe::Full;
            }
        }
    }

    fn occupied_at_or_after(&self, start: usize) -> Option<usize> {
        (start..self.buckets.count())
            .find(|&i| self.buckets.at(i).is_some_and(Slot::occupied))
    }

    fn occupied_at_or_before(&self, end: usize) -> Option<usize> {
        (0..=end.min(self.buckets.count().saturating_sub(1)))
            .rev()
            .find(|&i| self.buckets.at(i).is_some_and(Slot::occupied))
    }

    fn last_occupied(&self) -> Option<usize> {
        let count = self.buckets.count();
        self.occupied_at_or_before(count.checked_sub(1)?)
    }
}
