//! Example demonstrating basic usage of `BufferPool` with heap byte buffers.
//!
//! This shows the take/give cycle and how a warm pool serves smaller
//! requests from larger resident buffers.

use buffer_pool::BufferPool;

fn main() {
    let pool = BufferPool::<u8>::heap();

    // Cold start: the pool is empty, so this allocates a fresh buffer.
    let mut buffer = pool.take(8192);
    println!(
        "cold take: capacity {}, limit {}",
        buffer.capacity(),
        buffer.limit()
    );

    // Use the buffer as a scratch area for assembling a message.
    buffer.put_slice(b"HELLO ");
    buffer.put_slice(b"WORLD");
    buffer.flip();
    println!("assembled {} bytes", buffer.remaining());

    // Hand the buffer back so it can be reused.
    pool.give(buffer).expect("heap buffer belongs in a heap pool");
    println!("idle buffers after give: {}", pool.len());

    // A smaller request reuses the same backing allocation, narrowed.
    let reused = pool.take(100);
    println!(
        "warm take: capacity {}, limit {}",
        reused.capacity(),
        reused.limit()
    );

    pool.give(reused).expect("heap buffer belongs in a heap pool");
}
