//! Growable contiguous storage with an observable power-of-two growth policy.
//!
//! [`Buffer`] is the foundation the other two containers are built on: the
//! table stores its bucket slots in one, the registry its dense elements,
//! validity flags, and free-ID stack. It is a `Vec`-backed sequence that
//! tracks its *logical* capacity separately, so the growth policy (double
//! exact powers of two, otherwise round up to the next power of two) is
//! visible to callers and growth failure is a recoverable error rather
//! than an abort.
//!
//! Element references obtained through [`Buffer::at`], [`Buffer::front`],
//! or [`Buffer::back`] borrow the buffer, so the borrow checker enforces
//! the pointer-stability rule: no reference survives a capacity-changing
//! operation.

use crate::cursor::Cursor;
use crate::error::ContainerError;

/// Next capacity step for a required element count.
///
/// Zero maps to one, exact powers of two double, everything else rounds up
/// to the next power of two. Saturates near `usize::MAX`; the subsequent
/// reservation reports the failure.
pub(crate) fn next_pow2(x: usize) -> usize {
    if x == 0 {
        1
    } else if x.is_power_of_two() {
        x.saturating_mul(2)
    } else {
        x.checked_next_power_of_two().unwrap_or(usize::MAX)
    }
}

/// Outcome of [`Buffer::shrink_to_fit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shrink {
    /// Storage was reallocated down to exactly `count` elements.
    Shrunk,
    /// Capacity already equals the element count; nothing to do.
    AlreadyExact,
}

/// A contiguous, growable, exclusively-owned sequence of `T`.
///
/// `count <= capacity` always holds, and backing storage exists iff
/// `capacity > 0`. Capacity never shrinks implicitly; only
/// [`Buffer::shrink_to_fit`] gives memory back.
#[derive(Debug)]
pub struct Buffer<T> {
    data: Vec<T>,
    /// Logical capacity. The `Vec` may hold more; it never holds less.
    capacity: usize,
}

impl<T> Buffer<T> {
    /// Create an empty buffer with no backing storage.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
        }
    }

    /// Create an empty buffer with storage for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        let mut buffer = Self::new();
        buffer.reserve(capacity)?;
        Ok(buffer)
    }

    /// Number of live elements.
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Logical capacity in elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether backing storage has been reserved.
    ///
    /// A buffer that is not "valid" in this sense is still safe to use;
    /// the first insertion reserves storage. The predicate mirrors the
    /// construction contract: capacity zero means nothing is allocated.
    pub fn is_valid(&self) -> bool {
        self.capacity > 0
    }

    /// The live prefix as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Grow the logical capacity to at least `new_capacity`.
    ///
    /// No-op if the capacity is already sufficient. On allocator refusal
    /// the buffer is left unchanged and `OutOfMemory` is returned.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), ContainerError> {
        if self.capacity >= new_capacity {
            return Ok(());
        }
        let additional = new_capacity - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|_| ContainerError::OutOfMemory {
                requested: new_capacity,
            })?;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Reallocate storage down to exactly `count` elements.
    ///
    /// Returns [`Shrink::AlreadyExact`] when capacity equals count, and
    /// `Empty` when there are no elements to shrink around.
    pub fn shrink_to_fit(&mut self) -> Result<Shrink, ContainerError> {
        if self.data.len() == self.capacity {
            return Ok(Shrink::AlreadyExact);
        }
        if self.data.is_empty() {
            return Err(ContainerError::Empty);
        }
        self.data.shrink_to_fit();
        self.capacity = self.data.len();
        Ok(Shrink::Shrunk)
    }

    /// Drop all elements. Capacity is retained.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Truncate to `size` elements, or grow by appending clones of `fill`.
    ///
    /// Growth reserves exactly `size` (not a power-of-two step).
    pub fn resize(&mut self, size: usize, fill: &T) -> Result<(), ContainerError>
    where
        T: Clone,
    {
        if size <= self.data.len() {
            self.data.truncate(size);
            return Ok(());
        }
        self.reserve(size)?;
        self.data.resize(size, fill.clone());
        Ok(())
    }

    /// [`Buffer::resize`] with `T::default()` as the fill value.
    pub fn resize_default(&mut self, size: usize) -> Result<(), ContainerError>
    where
        T: Default,
    {
        if size <= self.data.len() {
            self.data.truncate(size);
            return Ok(());
        }
        self.reserve(size)?;
        self.data.resize_with(size, T::default);
        Ok(())
    }

    /// Overwrite the entire capacity with clones of `value`.
    ///
    /// Afterwards `count == capacity`; previous contents are dropped.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.clear();
        self.data.resize(self.capacity, value);
    }

    /// Insert clones of `elements` before `index`, shifting the suffix right.
    ///
    /// Grows to the next power-of-two step when the result would exceed
    /// capacity. Fails `OutOfBounds` if `index > count`.
    pub fn insert(&mut self, index: usize, elements: &[T]) -> Result<(), ContainerError>
    where
        T: Clone,
    {
        let count = self.data.len();
        if index > count {
            return Err(ContainerError::OutOfBounds { index, count });
        }
        let required = count + elements.len();
        if required > self.capacity {
            self.reserve(next_pow2(required))?;
        }
        self.data.splice(index..index, elements.iter().cloned());
        Ok(())
    }

    /// Append one element, growing if full.
    pub fn push_back(&mut self, value: T) -> Result<(), ContainerError> {
        self.grow_for_one()?;
        self.data.push(value);
        Ok(())
    }

    /// Prepend one element, shifting everything right.
    pub fn push_front(&mut self, value: T) -> Result<(), ContainerError> {
        self.grow_for_one()?;
        self.data.insert(0, value);
        Ok(())
    }

    /// Insert one element before `index` (`index == count` appends).
    pub fn push_at(&mut self, index: usize, value: T) -> Result<(), ContainerError> {
        let count = self.data.len();
        if index > count {
            return Err(ContainerError::OutOfBounds { index, count });
        }
        self.grow_for_one()?;
        self.data.insert(index, value);
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Result<T, ContainerError> {
        self.data.pop().ok_or(ContainerError::Empty)
    }

    /// Remove and return the first element, closing the gap.
    pub fn pop_front(&mut self) -> Result<T, ContainerError> {
        if self.data.is_empty() {
            return Err(ContainerError::Empty);
        }
        Ok(self.data.remove(0))
    }

    /// Remove and return the element at `index`, closing the gap.
    pub fn pop_at(&mut self, index: usize) -> Result<T, ContainerError> {
        let count = self.data.len();
        if count == 0 {
            return Err(ContainerError::Empty);
        }
        if index >= count {
            return Err(ContainerError::OutOfBounds { index, count });
        }
        Ok(self.data.remove(index))
    }

    /// Bounds-checked element access.
    pub fn at(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Bounds-checked mutable element access.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// The first element, if any.
    pub fn front(&self) -> Option<&T> {
        self.data.first()
    }

    /// The last element, if any.
    pub fn back(&self) -> Option<&T> {
        self.data.last()
    }

    /// Cursor positioned on the first element (`AfterLast` when empty).
    pub fn begin(&self) -> Cursor {
        if self.data.is_empty() {
            Cursor::AfterLast
        } else {
            Cursor::At(0)
        }
    }

    /// Cursor positioned on the last element (`BeforeFirst` when empty).
    pub fn end(&self) -> Cursor {
        match self.data.len() {
            0 => Cursor::BeforeFirst,
            n => Cursor::At(n - 1),
        }
    }

    /// Advance the cursor toward the end, saturating at `AfterLast`.
    pub fn cursor_next(&self, cursor: &mut Cursor) {
        let count = self.data.len();
        cursor.step_next(
            || (count > 0).then_some(0),
            |pos| {
                let next = pos + 1;
                (next < count).then_some(next)
            },
        );
    }

    /// Move the cursor toward the beginning, saturating at `BeforeFirst`.
    pub fn cursor_previous(&self, cursor: &mut Cursor) {
        let count = self.data.len();
        cursor.step_previous(
            || count.checked_sub(1),
            |pos| pos.checked_sub(1).filter(|&p| p < count),
        );
    }

    /// The element the cursor is on, or `None` at a sentinel.
    pub fn cursor_get(&self, cursor: &Cursor) -> Option<&T> {
        cursor.position().and_then(|index| self.data.get(index))
    }

    /// Iterate over the live prefix in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    /// Reserve a power-of-two step when the next single insertion would
    /// exceed capacity.
    fn grow_for_one(&mut self) -> Result<(), ContainerError> {
        if self.data.len() >= self.capacity {
            self.reserve(next_pow2(self.data.len() + 1))?;
        }
        Ok(())
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Buffer<T> {
    /// Deep-copy the occupied prefix only; the clone's capacity equals its
    /// count.
    fn clone(&self) -> Self {
        let data = self.data.clone();
        let capacity = data.len();
        Self { data, capacity }
    }
}

impl<T: PartialEq> PartialEq for Buffer<T> {
    /// Structural equality over the occupied prefix; capacity is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Buffer<T> {}
