//! Example demonstrating basic usage of `SizeClassPool` with a custom
//! instance type.
//!
//! This shows how the strategy functions bind the generic engine to a
//! concrete reusable resource - here, a scratch allocation with a logical
//! length that is narrowed on reuse.

use size_class_pool::SizeClassPool;

/// A reusable scratch allocation: fixed backing capacity, narrowable length.
#[derive(Debug)]
struct Scratch {
    data: Vec<u8>,
    len: usize,
}

fn main() {
    let pool = SizeClassPool::builder()
        .allocate(|capacity| Scratch {
            data: vec![0; capacity],
            len: capacity,
        })
        .capacity_of(|scratch: &Scratch| scratch.data.len())
        .reset(|scratch, len| scratch.len = len)
        .build();

    // Cold start: the pool is empty, so this allocates.
    let scratch = pool.take(4096);
    println!(
        "cold take: capacity {} bytes, logical length {}",
        scratch.data.len(),
        scratch.len
    );

    // Return the instance for reuse.
    pool.give(scratch);
    println!("idle instances after give: {}", pool.len());

    // A smaller request reuses the same backing allocation, narrowed.
    let scratch = pool.take(1000);
    println!(
        "warm take: capacity {} bytes, logical length {}",
        scratch.data.len(),
        scratch.len
    );

    pool.give(scratch);

    // A larger request cannot be satisfied by the idle instance.
    let scratch = pool.take(10_000);
    println!(
        "oversized take: capacity {} bytes, logical length {}",
        scratch.data.len(),
        scratch.len
    );
}
