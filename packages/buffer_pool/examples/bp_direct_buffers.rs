//! Example demonstrating direct buffers and the locality check.
//!
//! A direct pool hands out buffers whose storage comes straight from the
//! global allocator, and refuses buffers of the wrong locality instead of
//! silently mixing storage kinds.

use buffer_pool::{Buffer, BufferPool};

fn main() {
    let pool = BufferPool::<f64>::direct();

    let mut samples = pool.take(1024);
    println!(
        "direct buffer: locality {}, capacity {}",
        samples.locality(),
        samples.capacity()
    );

    // Fill the buffer through its slice view.
    for (index, sample) in samples.as_mut_slice().iter_mut().enumerate() {
        *sample = f64::from(u32::try_from(index).expect("index fits in u32")).sin();
    }

    pool.give(samples).expect("direct buffer belongs in a direct pool");

    // A heap buffer is rejected; the error hands it back intact.
    let stray = Buffer::<f64>::heap(64);
    match pool.give(stray) {
        Ok(()) => unreachable!("a heap buffer must not enter a direct pool"),
        Err(error) => {
            println!("rejected: {error}");
            let recovered = error.into_buffer();
            println!("recovered buffer capacity: {}", recovered.capacity());
        }
    }
}
