//! Composable byte allocators and two sibling stream patterns.
//!
//! The heart of the crate is the [`Allocator`] capability: three
//! operations (allocate, deallocate, reallocate) over raw byte regions,
//! with three conforming backends:
//!
//! - [`HeapAllocator`]: passthrough to the host allocator,
//! - [`BumpAllocator`]: fixed-capacity linear allocation with free-all,
//! - [`ArenaAllocator`]: growable linear allocation over a *backing*
//!   allocator, composing the capability over itself.
//!
//! Alongside it live two independent single-interface patterns from the
//! same family: lazy finite sequence producers ([`iter`]) and
//! incremental folds ([`scan`]).
//!
//! Everything here is single-threaded, synchronous, and deliberately
//! small. Regions are untyped bytes with no alignment or zero-fill
//! guarantee, and arithmetic overflow on sizes is surfaced as an
//! allocation failure rather than checked up front. This is a set of
//! reference building blocks, not a hardened allocator.
//!
//! # Examples
//!
//! Requesting memory through the capability without naming the backend:
//!
//! ```
//! use stratum::{Allocator, ArenaAllocator, BumpAllocator, HeapAllocator};
//!
//! fn fill(allocator: &dyn Allocator, len: usize) -> stratum::AllocResult<()> {
//!     let region = unsafe { allocator.allocate(len)? };
//!     unsafe {
//!         region.cast::<u8>().as_ptr().write_bytes(0xEE, len);
//!         allocator.deallocate(region);
//!     }
//!     Ok(())
//! }
//!
//! let heap = HeapAllocator::new();
//! let bump = BumpAllocator::new(256)?;
//! let arena = ArenaAllocator::new(&heap);
//!
//! fill(&heap, 64)?;
//! fill(&bump, 64)?;
//! fill(&arena, 64)?;
//! # Ok::<(), stratum::AllocError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod allocator;
pub mod error;
pub mod iter;
pub mod scan;

pub use allocator::{Allocator, ArenaAllocator, BumpAllocator, HeapAllocator, MemoryUsage};
pub use error::{AllocError, AllocResult};

/// Convenient glob import for the common types.
pub mod prelude {
    pub use crate::allocator::{
        AllocError, AllocResult, Allocator, ArenaAllocator, BumpAllocator, HeapAllocator,
        MemoryUsage,
    };
    pub use crate::scan::Scan;
}
