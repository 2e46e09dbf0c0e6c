//! Integration tests for the `buffer_pool` package.
//!
//! These tests verify the pool contract end to end: capacity sufficiency and
//! narrowing, best-fit bucket selection, fallback to larger idle buffers,
//! locality rejection, and consistency under concurrent take/give traffic.

#![allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::indexing_slicing,
    reason = "we do not need to worry about these things when writing test code"
)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

use buffer_pool::{Buffer, BufferPool, Locality};

#[test]
fn every_take_satisfies_the_requested_capacity() {
    let pool = BufferPool::<u8>::heap();

    for requested in [0, 1, 7, 64, 1000, 8192] {
        let buffer = pool.take(requested);

        assert!(buffer.capacity() >= requested);
        assert_eq!(buffer.limit(), requested);
        assert_eq!(buffer.position(), 0);

        pool.give(buffer).unwrap();
    }
}

#[test]
fn resident_buffer_is_reused_before_any_allocation() {
    let pool = BufferPool::<u16>::heap();

    let buffer = pool.take(100);
    let identity = buffer.as_ptr();
    pool.give(buffer).unwrap();

    // Any request the resident buffer can satisfy comes back with the same
    // backing allocation.
    let reused = pool.take(60);
    assert_eq!(reused.as_ptr(), identity);
    assert_eq!(reused.capacity(), 100);
    assert_eq!(reused.limit(), 60);
}

#[test]
fn best_fit_drains_smaller_buckets_first() {
    let pool = BufferPool::<u8>::heap();

    // Park one idle buffer at capacity 16 and one at capacity 64.
    let small = pool.take(16);
    let large = pool.take(64);
    let small_identity = small.as_ptr();
    let large_identity = large.as_ptr();
    pool.give(small).unwrap();
    pool.give(large).unwrap();

    // A request for 10 must drain the 16-bucket before touching the 64s.
    let first = pool.take(10);
    assert_eq!(first.as_ptr(), small_identity);

    let second = pool.take(10);
    assert_eq!(second.as_ptr(), large_identity);
    assert_eq!(second.capacity(), 64);
    assert_eq!(second.limit(), 10);
}

#[test]
fn empty_best_fit_bucket_falls_back_to_larger_idle_buffer() {
    let pool = BufferPool::<u8>::heap();

    // The 16-bucket exists but is empty (its buffer is checked out); the
    // 64-bucket holds an idle buffer.
    let small = pool.take(16);
    pool.give(small).unwrap();
    let small = pool.take(16);

    let large = pool.take(64);
    let large_identity = large.as_ptr();
    pool.give(large).unwrap();

    // The request is served from the 64-bucket instead of allocating.
    let fallback = pool.take(10);
    assert_eq!(fallback.as_ptr(), large_identity);
    assert_eq!(fallback.capacity(), 64);
    assert_eq!(fallback.limit(), 10);

    drop(small);
}

#[test]
fn cold_pool_allocates_exactly_the_requested_capacity() {
    let pool = BufferPool::<i64>::direct();

    let buffer = pool.take(777);

    assert_eq!(buffer.capacity(), 777);
    assert_eq!(buffer.limit(), 777);
    assert!(buffer.as_slice().iter().all(|&element| element == 0));
}

#[test]
fn locality_rejection_works_in_both_directions() {
    let heap_pool = BufferPool::<u8>::heap();
    let direct_pool = BufferPool::<u8>::direct();

    let error = heap_pool.give(Buffer::direct(32)).unwrap_err();
    assert_eq!(error.expected(), Locality::Heap);
    assert_eq!(error.found(), Locality::Direct);
    assert!(heap_pool.is_empty());

    let error = direct_pool.give(Buffer::heap(32)).unwrap_err();
    assert_eq!(error.expected(), Locality::Direct);
    assert_eq!(error.found(), Locality::Heap);
    assert!(direct_pool.is_empty());
}

#[test]
fn take_give_lifecycle_matches_the_documented_walkthrough() {
    // Pool empty -> take(8) creates fresh A with capacity 8. give(A) files
    // it. take(8) returns A again. With A checked out, take(4) cannot be
    // served and allocates fresh B with capacity 4.
    let pool = BufferPool::<u8>::heap();

    let a = pool.take(8);
    let a_identity = a.as_ptr();
    assert_eq!(a.capacity(), 8);

    pool.give(a).unwrap();
    assert_eq!(pool.len(), 1);

    let a = pool.take(8);
    assert_eq!(a.as_ptr(), a_identity);
    assert_eq!(a.limit(), 8);
    assert!(pool.is_empty());

    let b = pool.take(4);
    assert_ne!(b.as_ptr(), a_identity);
    assert_eq!(b.capacity(), 4);

    drop((a, b));
}

#[test]
fn narrowed_reuse_bounds_writes_to_the_requested_size() {
    let pool = BufferPool::<u8>::heap();

    let buffer = pool.take(1024);
    pool.give(buffer).unwrap();

    let mut reused = pool.take(10);
    assert_eq!(reused.as_mut_slice().len(), 10);
    assert_eq!(reused.remaining(), 10);

    reused.put_slice(b"0123456789");
    assert!(!reused.has_remaining());
}

#[test]
fn cleared_pool_releases_direct_storage_without_breaking_checkouts() {
    let pool = BufferPool::<u32>::direct();

    let held = pool.take(128);
    let idle = pool.take(256);
    pool.give(idle).unwrap();

    pool.clear();
    assert!(pool.is_empty());

    // The checked-out buffer survives the clear and can still come back.
    pool.give(held).unwrap();
    assert_eq!(pool.len(), 1);
}

#[test]
fn concurrent_traffic_preserves_capacity_and_identity_invariants() {
    const THREADS: usize = 8;
    const ITERATIONS: usize = 100;

    let pool = BufferPool::<u8>::heap();
    let seen_identities = Arc::new(Mutex::new(HashSet::new()));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_index| {
            let pool = pool.clone();
            let seen_identities = Arc::clone(&seen_identities);

            thread::spawn(move || {
                for iteration in 0..ITERATIONS {
                    let requested = (thread_index + iteration * THREADS) % 2048;
                    let mut buffer = pool.take(requested);

                    assert!(buffer.capacity() >= requested);
                    assert_eq!(buffer.limit(), requested);
                    assert_eq!(buffer.position(), 0);

                    // Exercise the storage while the buffer is checked out.
                    if requested > 0 {
                        buffer.as_mut_slice()[0] = thread_index as u8;
                    }

                    seen_identities
                        .lock()
                        .unwrap()
                        .insert(buffer.as_ptr().addr());
                    pool.give(buffer).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Every buffer observed by any thread ended up back in the pool: the
    // number of distinct backing allocations matches the idle count.
    let distinct = seen_identities.lock().unwrap().len();
    assert_eq!(pool.len(), distinct);
}

#[test]
fn element_types_pool_independently() {
    let bytes = BufferPool::<u8>::heap();
    let doubles = BufferPool::<f64>::heap();

    let byte_buffer = bytes.take(32);
    let double_buffer = doubles.take(32);

    bytes.give(byte_buffer).unwrap();
    doubles.give(double_buffer).unwrap();

    assert_eq!(bytes.len(), 1);
    assert_eq!(doubles.len(), 1);
}
