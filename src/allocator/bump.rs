//! Bump backend: a fixed-capacity linear allocator.

use core::cell::Cell;
use core::ptr::NonNull;
use std::alloc::{Layout, alloc, dealloc};

use tracing::trace;

use super::traits::dangling_region;
use super::{Allocator, MemoryUsage};
use crate::error::{AllocError, AllocResult};

/// Allocates by advancing a cursor through one flat buffer.
///
/// The buffer is obtained from the host allocator at construction and
/// owned by the instance (released on drop). Individual regions are never
/// freed: [`deallocate`](Allocator::deallocate) is a no-op, and the
/// only way to reclaim space is [`reset`](BumpAllocator::reset), which
/// moves the cursor back to the start and logically invalidates every
/// region handed out so far. Using a region across a reset is the
/// caller's bug, exactly like reading a dead stack frame.
///
/// Invariant: `0 <= cursor <= capacity`, and every returned region lies
/// within `[cursor_before, cursor_before + size)` with the sum within
/// capacity. An allocation filling the buffer to exactly its capacity
/// succeeds; a failing allocation leaves the cursor untouched.
///
/// # Examples
///
/// ```
/// use stratum::{Allocator, BumpAllocator, MemoryUsage};
///
/// let bump = BumpAllocator::new(1024)?;
/// let region = unsafe { bump.allocate(100)? };
/// assert_eq!(region.len(), 100);
/// assert_eq!(bump.used_memory(), 100);
///
/// bump.reset();
/// assert_eq!(bump.used_memory(), 0);
/// # Ok::<(), stratum::AllocError>(())
/// ```
pub struct BumpAllocator {
    base: NonNull<u8>,
    capacity: usize,
    cursor: Cell<usize>,
}

impl BumpAllocator {
    /// Creates a bump allocator owning a fresh buffer of `capacity` bytes.
    ///
    /// A capacity of zero is allowed and produces an allocator on which
    /// every non-empty request fails.
    ///
    /// # Errors
    ///
    /// [`AllocError`] when the host allocator cannot provide the buffer.
    pub fn new(capacity: usize) -> AllocResult<Self> {
        let base = if capacity == 0 {
            NonNull::dangling()
        } else {
            let layout = Layout::from_size_align(capacity, 1)
                .map_err(|_| AllocError::out_of_memory(capacity))?;
            // SAFETY: layout has non-zero size (capacity > 0 here).
            let ptr = unsafe { alloc(layout) };
            NonNull::new(ptr).ok_or(AllocError::out_of_memory(capacity))?
        };

        Ok(Self {
            base,
            capacity,
            cursor: Cell::new(0),
        })
    }

    /// Total capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far (the cursor position).
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes left before the next allocation fails.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity - self.cursor.get()
    }

    /// Start address of the owned buffer, for identity checks.
    #[inline]
    #[must_use]
    pub fn base_ptr(&self) -> *const u8 {
        self.base.as_ptr()
    }

    /// Frees everything at once: the cursor returns to the buffer start.
    ///
    /// Capacity and buffer identity are unchanged; the next allocation
    /// is served from the same address as the first one ever made on
    /// this instance. All previously returned regions become logically
    /// invalid; not using them afterwards is the caller's
    /// responsibility.
    pub fn reset(&self) {
        trace!(reclaimed = self.cursor.get(), "bump allocator reset");
        self.cursor.set(0);
    }
}

// SAFETY: regions are disjoint sub-ranges of the owned buffer (the cursor
// only moves forward between resets), so each one is valid for its full
// length until reset or drop invalidates it.
unsafe impl Allocator for BumpAllocator {
    unsafe fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        if size == 0 {
            return Ok(dangling_region());
        }

        let cursor = self.cursor.get();
        let new_cursor = cursor
            .checked_add(size)
            .ok_or(AllocError::out_of_memory(size))?;

        if new_cursor > self.capacity {
            trace!(size, cursor, capacity = self.capacity, "bump allocation failed");
            return Err(AllocError::out_of_memory(size));
        }

        // SAFETY: cursor + size <= capacity, so the range stays inside
        // the owned buffer.
        let ptr = unsafe { self.base.add(cursor) };
        self.cursor.set(new_cursor);

        Ok(NonNull::slice_from_raw_parts(ptr, size))
    }

    unsafe fn deallocate(&self, _region: NonNull<[u8]>) {
        // Individual release is a no-op; storage comes back via reset().
    }

    unsafe fn reallocate(
        &self,
        _region: NonNull<[u8]>,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // A fresh allocation at the cursor. The old region's bytes are
        // not migrated; only the heap backend preserves contents.
        // SAFETY: plain allocation, caller contract covers the result.
        unsafe { self.allocate(new_size) }
    }
}

impl MemoryUsage for BumpAllocator {
    fn used_memory(&self) -> usize {
        self.used()
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.available())
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.capacity())
    }
}

impl Drop for BumpAllocator {
    fn drop(&mut self) {
        if self.capacity > 0 {
            // SAFETY: base was allocated in new() with exactly this
            // layout and is released exactly once.
            unsafe {
                dealloc(
                    self.base.as_ptr(),
                    Layout::from_size_align_unchecked(self.capacity, 1),
                );
            }
        }
    }
}
