//! Arena backend: a growable linear allocator over a backing allocator.

use core::cell::Cell;
use core::ptr::{self, NonNull};

use tracing::{debug, trace};

use super::traits::dangling_region;
use super::{Allocator, MemoryUsage};
use crate::error::{AllocError, AllocResult};

/// A bump allocator that transparently replaces its buffer with a larger
/// one when exhausted.
///
/// The arena owns a single backing buffer obtained from the backing
/// allocator `B`, itself just another [`Allocator`] value, so arenas
/// compose over the heap, over a [`BumpAllocator`](super::BumpAllocator),
/// or over another arena. The borrow on `B` expresses the lifetime
/// contract directly: the backing allocator must outlive the arena.
///
/// Construction is lazy; no backing allocation happens until the first
/// request, so creating an arena is cheap. On exhaustion the capacity
/// doubles (or jumps straight to the requirement if that is larger) and
/// the live prefix of the old buffer is carried into the new one before
/// the old buffer is returned to the backing allocator.
///
/// As with the bump backend, individual release is a no-op. [`clear`]
/// rewinds the arena for reuse without giving the buffer back;
/// [`destroy`] (also run on drop) returns the buffer to the backing
/// allocator.
///
/// # Examples
///
/// ```
/// use stratum::{Allocator, ArenaAllocator, HeapAllocator, MemoryUsage};
///
/// let heap = HeapAllocator::new();
/// let arena = ArenaAllocator::new(&heap);
/// assert!(arena.base().is_none()); // nothing allocated yet
///
/// let _a = unsafe { arena.allocate(64)? };
/// let _b = unsafe { arena.allocate(64)? };
/// assert_eq!(arena.used_memory(), 128);
///
/// arena.clear(); // rewind, keep the buffer
/// assert_eq!(arena.used_memory(), 0);
/// assert!(arena.base().is_some());
/// # Ok::<(), stratum::AllocError>(())
/// ```
///
/// [`clear`]: ArenaAllocator::clear
/// [`destroy`]: ArenaAllocator::destroy
pub struct ArenaAllocator<'a, B: Allocator + ?Sized> {
    backing: &'a B,
    buf: Cell<*mut u8>,
    used: Cell<usize>,
    capacity: Cell<usize>,
}

impl<'a, B: Allocator + ?Sized> ArenaAllocator<'a, B> {
    /// Creates an empty arena over `backing`.
    ///
    /// No memory is requested until the first allocation.
    #[must_use]
    pub fn new(backing: &'a B) -> Self {
        Self {
            backing,
            buf: Cell::new(ptr::null_mut()),
            used: Cell::new(0),
            capacity: Cell::new(0),
        }
    }

    /// Bytes consumed from the current buffer.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Capacity of the current buffer. Zero until the first allocation.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Start of the current buffer, or `None` before the first
    /// allocation and after [`destroy`](ArenaAllocator::destroy).
    ///
    /// Invariant: this is `None` exactly when `capacity()` is zero.
    #[inline]
    #[must_use]
    pub fn base(&self) -> Option<NonNull<u8>> {
        NonNull::new(self.buf.get())
    }

    /// Frees all allocations at once, keeping the buffer for reuse.
    ///
    /// Intended for running repeated work units without paying for a
    /// backing allocation each round. Previously returned regions become
    /// logically invalid.
    pub fn clear(&self) {
        trace!(reclaimed = self.used.get(), "arena cleared");
        self.used.set(0);
    }

    /// Returns the buffer to the backing allocator and empties the arena.
    ///
    /// Idempotent: calling it again (or dropping the arena afterwards)
    /// is a no-op. A later allocation starts over from the lazy empty
    /// state.
    pub fn destroy(&self) {
        let Some(base) = self.base() else { return };

        trace!(capacity = self.capacity.get(), "arena destroyed");
        // SAFETY: buf/capacity describe exactly the region the backing
        // allocator handed us in grow(); it is released exactly once
        // because buf is nulled right after.
        unsafe {
            self.backing
                .deallocate(NonNull::slice_from_raw_parts(base, self.capacity.get()));
        }

        self.buf.set(ptr::null_mut());
        self.used.set(0);
        self.capacity.set(0);
    }

    /// Replaces the buffer with one of at least `required` bytes,
    /// carrying the live prefix forward.
    fn grow(&self, required: usize) -> AllocResult<()> {
        let old_capacity = self.capacity.get();
        let new_capacity = old_capacity.saturating_mul(2).max(required);

        // SAFETY: a fresh allocation from the backing allocator; we are
        // its caller and release it in grow()/destroy()/drop().
        let new_region = unsafe { self.backing.allocate(new_capacity)? };
        let new_buf = new_region.cast::<u8>().as_ptr();

        if let Some(old_base) = self.base() {
            // SAFETY: both buffers are live and distinct; used <=
            // old_capacity <= new_capacity, so the copy stays in bounds
            // of each.
            unsafe {
                ptr::copy_nonoverlapping(old_base.as_ptr(), new_buf, self.used.get());
                self.backing
                    .deallocate(NonNull::slice_from_raw_parts(old_base, old_capacity));
            }
        }

        debug!(old_capacity, new_capacity, "arena buffer grown");
        self.buf.set(new_buf);
        self.capacity.set(new_capacity);
        Ok(())
    }
}

// SAFETY: regions are disjoint sub-ranges of the current buffer, and
// growth copies the live prefix so offsets stay meaningful; a region is
// valid until clear/destroy/drop invalidates it or growth moves the
// buffer (the documented arena discipline).
unsafe impl<B: Allocator + ?Sized> Allocator for ArenaAllocator<'_, B> {
    unsafe fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        if size == 0 {
            return Ok(dangling_region());
        }

        let used = self.used.get();
        let new_used = used
            .checked_add(size)
            .ok_or(AllocError::out_of_memory(size))?;

        if new_used > self.capacity.get() {
            self.grow(new_used)?;
        }

        // SAFETY: buf is non-null (grow ran if capacity was 0) and
        // used + size <= capacity after the growth check.
        let ptr = unsafe { NonNull::new_unchecked(self.buf.get().add(used)) };
        self.used.set(new_used);

        Ok(NonNull::slice_from_raw_parts(ptr, size))
    }

    unsafe fn deallocate(&self, _region: NonNull<[u8]>) {
        // Individual release is a no-op; storage comes back via clear()
        // or destroy().
    }

    unsafe fn reallocate(
        &self,
        _region: NonNull<[u8]>,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // Same growth-and-bump path as allocate; the old region's bytes
        // are not migrated. Only the heap backend preserves contents.
        // SAFETY: plain allocation, caller contract covers the result.
        unsafe { self.allocate(new_size) }
    }
}

impl<B: Allocator + ?Sized> MemoryUsage for ArenaAllocator<'_, B> {
    fn used_memory(&self) -> usize {
        self.used()
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.capacity.get() - self.used.get())
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.capacity())
    }
}

impl<B: Allocator + ?Sized> Drop for ArenaAllocator<'_, B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
