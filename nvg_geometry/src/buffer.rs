// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Growable storage reused across frames.

use core::ops::{Deref, DerefMut};

/// A growable array that never releases its storage.
///
/// Capacity grows by doubling until a request is satisfied and existing contents are
/// preserved. [`clear`](Self::clear) only resets the logical length, so the working set
/// built up during one frame is available to the next one without touching the allocator.
///
/// Allocation failure aborts, as with [`Vec`]; there is no partially grown state.
#[derive(Clone, Debug)]
pub struct GrowableBuffer<T> {
    items: Vec<T>,
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowableBuffer<T> {
    /// Creates an empty buffer without allocating.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty buffer with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Guarantees storage for at least `n` elements.
    ///
    /// The capacity is doubled, starting from the current capacity, until it reaches `n`.
    pub fn ensure_capacity(&mut self, n: usize) {
        let capacity = self.items.capacity();
        if capacity >= n {
            return;
        }
        let mut target = capacity.max(1);
        while target < n {
            target = target.saturating_mul(2);
        }
        self.items.reserve_exact(target - self.items.len());
    }

    /// Appends an element at the logical end, growing if needed.
    #[inline]
    pub fn push(&mut self, item: T) {
        self.ensure_capacity(self.items.len() + 1);
        self.items.push(item);
    }

    /// Appends every element of `items`, growing at most once.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.ensure_capacity(self.items.len() + items.len());
        self.items.extend_from_slice(items);
    }

    /// Resets the logical length to zero, keeping the storage.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Shortens the logical length to `len`, keeping the storage.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Number of elements the buffer can hold without growing.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns the stored elements.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the stored elements mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> Deref for GrowableBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for GrowableBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}
