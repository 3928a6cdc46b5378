//! Allocation failure type.
//!
//! Every backend fails the same way: a requested size could not be
//! satisfied. There is deliberately no second error kind. Misuse of a
//! region (freeing through the wrong allocator, use after a reset) is a
//! precondition violation documented on the operations themselves, not a
//! condition the backends detect.

use thiserror::Error;

/// Result type for allocation operations.
pub type AllocResult<T> = Result<T, AllocError>;

/// Out of memory: the backend could not satisfy the requested size.
///
/// For [`HeapAllocator`](crate::allocator::HeapAllocator) this means the
/// host allocator is exhausted; for
/// [`BumpAllocator`](crate::allocator::BumpAllocator) the fixed capacity
/// would be exceeded; for
/// [`ArenaAllocator`](crate::allocator::ArenaAllocator) the backing
/// allocator refused the grown buffer. The failure is returned to the
/// immediate caller; no backend retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("out of memory: failed to allocate {requested} bytes")]
pub struct AllocError {
    requested: usize,
}

impl AllocError {
    /// Creates an out-of-memory error for a request of `requested` bytes.
    #[must_use]
    pub fn out_of_memory(requested: usize) -> Self {
        Self { requested }
    }

    /// Number of bytes the failed request asked for.
    #[must_use]
    pub fn requested_bytes(&self) -> usize {
        self.requested
    }
}
