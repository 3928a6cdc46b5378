//! Microbenchmarks comparing the three backends on small allocations.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use stratum::{Allocator, ArenaAllocator, BumpAllocator, HeapAllocator};

const REQUEST: usize = 64;

fn bump_allocate(c: &mut Criterion) {
    let bump = BumpAllocator::new(1 << 20).unwrap();

    c.bench_function("bump/allocate_64", |b| {
        b.iter(|| {
            if bump.available() < REQUEST {
                bump.reset();
            }
            // SAFETY: the region is dropped untouched before the next reset.
            let region = unsafe { bump.allocate(black_box(REQUEST)).unwrap() };
            black_box(region);
        });
    });
}

fn arena_allocate(c: &mut Criterion) {
    let heap = HeapAllocator::new();
    let arena = ArenaAllocator::new(&heap);

    c.bench_function("arena/allocate_64", |b| {
        b.iter(|| {
            if arena.used() + REQUEST > (1 << 20) {
                arena.clear();
            }
            // SAFETY: the region is dropped untouched before the next clear.
            let region = unsafe { arena.allocate(black_box(REQUEST)).unwrap() };
            black_box(region);
        });
    });
}

fn heap_round_trip(c: &mut Criterion) {
    let heap = HeapAllocator::new();

    c.bench_function("heap/allocate_release_64", |b| {
        b.iter(|| {
            // SAFETY: the region is released immediately, untouched.
            unsafe {
                let region = heap.allocate(black_box(REQUEST)).unwrap();
                heap.deallocate(black_box(region));
            }
        });
    });
}

criterion_group!(benches, bump_allocate, arena_allocate, heap_round_trip);
criterion_main!(benches);
