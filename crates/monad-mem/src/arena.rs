//! Fixed-capacity arena with index handles.
//!
//! A [`FixedArena`] is an append-only slab: every allocation takes the next
//! free slot, slots are never reused, and the only way to reclaim space is to
//! [`reset`](FixedArena::reset) the whole arena. A [`Handle`] is the slot
//! index, so it is `Copy`, cheap to compare, and cannot dangle into freed
//! memory the way a raw pointer could.
//!
//! # Examples
//!
//! ```
//! use monad_mem::FixedArena;
//!
//! let mut arena = FixedArena::with_capacity(2);
//! let a = arena.alloc(10).unwrap();
//! let b = arena.alloc(20).unwrap();
//!
//! assert!(arena.alloc(30).is_err());
//! assert_eq!(arena.get(a), Some(&10));
//! assert_eq!(arena.get(b), Some(&20));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Error returned when an arena has no free slot left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaFull {
    /// Number of slots the arena was created with.
    pub capacity: usize,
}

impl fmt::Display for ArenaFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena full: all {} slots are in use", self.capacity)
    }
}

impl std::error::Error for ArenaFull {}

/// Occupancy counters for a [`FixedArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    /// Slots handed out since the last reset.
    pub allocated: usize,
    /// Total number of slots.
    pub capacity: usize,
    /// Allocation requests refused because the arena was full.
    pub failed_allocations: usize,
}

/// A stable reference to a slot in a [`FixedArena<T>`].
///
/// The type parameter only tags which arena the handle belongs to; the
/// handle itself is a `u32` slot index.
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    const fn from_index(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Returns the slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

// Manual impls: deriving would put bounds on `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Append-only slab of `T` with a hard slot limit.
///
/// # Invariants
///
/// - A slot, once handed out, keeps its value until [`reset`](Self::reset);
///   later allocations never overwrite it.
/// - `len() <= capacity()` at all times.
/// - Handles obtained before a reset must not be used after it.
pub struct FixedArena<T> {
    slots: Vec<T>,
    capacity: usize,
    failed: usize,
}

impl<T> FixedArena<T> {
    /// Creates an empty arena that can hold `capacity` values.
    ///
    /// The backing storage is reserved up front so allocation never grows
    /// the buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            failed: 0,
        }
    }

    /// Creates an arena whose first slot already holds `root`.
    ///
    /// The arena always has room for the root, so this cannot fail: a
    /// `capacity` of zero is raised to one.
    #[must_use]
    pub fn with_root(capacity: usize, root: T) -> (Self, Handle<T>) {
        let mut arena = Self::with_capacity(capacity.max(1));
        arena.slots.push(root);
        (arena, Handle::from_index(0))
    }

    /// Stores `value` in the next free slot.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaFull`] when every slot is taken. The refused request is
    /// counted in [`ArenaStats::failed_allocations`]; existing slots are not
    /// touched.
    pub fn alloc(&mut self, value: T) -> Result<Handle<T>, ArenaFull> {
        if self.slots.len() >= self.capacity {
            self.failed += 1;
            return Err(ArenaFull {
                capacity: self.capacity,
            });
        }
        let index = self.slots.len() as u32;
        self.slots.push(value);
        Ok(Handle::from_index(index))
    }

    /// Returns the value in `handle`'s slot.
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots.get(handle.index())
    }

    /// Returns the value in `handle`'s slot mutably.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots.get_mut(handle.index())
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been allocated since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots still free.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity - self.slots.len()
    }

    /// Returns true if the next allocation would fail.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Drops every value and makes all slots available again.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.failed = 0;
    }

    /// Returns occupancy counters.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            allocated: self.slots.len(),
            capacity: self.capacity,
            failed_allocations: self.failed,
        }
    }
}

impl<T> fmt::Debug for FixedArena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedArena")
            .field("len", &self.slots.len())
            .field("capacity", &self.capacity)
            .field("failed", &self.failed)
            .finish()
    }
}
