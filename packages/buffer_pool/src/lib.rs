//! Size-bucketed pools of reusable fixed-capacity buffers.
//!
//! This crate provides [`BufferPool`], a thread-safe cache of [`Buffer`]s
//! indexed by capacity. Hot I/O and serialization paths that repeatedly need
//! large scratch buffers can take a buffer with at least the required
//! capacity from the pool and give it back afterwards, instead of paying for
//! a fresh allocation every time.
//!
//! # Key Features
//!
//! - **Best-fit reuse**: a request is served by the smallest idle buffer
//!   that satisfies it; larger idle buffers are preferred over allocating,
//!   and a fresh buffer is created only when nothing idle fits.
//! - **Narrowed views**: a taken buffer always presents a logical size of
//!   exactly the requested capacity, with its cursor rewound, no matter
//!   which size class served it.
//! - **Heap and direct flavors**: each pool serves one storage locality,
//!   fixed at construction; giving a buffer of the wrong locality is the one
//!   rejected misuse, reported as [`LocalityMismatch`].
//! - **Any fixed-width element type**: pools are generic over the sealed
//!   [`Element`] trait - `BufferPool<u8>` for byte buffers through
//!   `BufferPool<f64>` for double-precision buffers.
//! - **Thread safety**: a pool is a cloneable handle; clones share one pool
//!   and can be used freely from any number of threads.
//!
//! The capacity-indexed engine underneath is provided by the
//! [`size_class_pool`] crate and can be reused for pooling other
//! fixed-capacity resources.
//!
//! # Examples
//!
//! ## Pooled scratch buffers
//!
//! ```rust
//! use buffer_pool::BufferPool;
//!
//! let pool = BufferPool::<u8>::heap();
//!
//! // Cold start: allocates a fresh zero-filled buffer.
//! let mut buffer = pool.take(4096);
//! buffer.put_slice(b"frame payload");
//!
//! // Returning the buffer makes it reusable.
//! pool.give(buffer).unwrap();
//!
//! // A smaller request is served by the same backing allocation,
//! // narrowed to the requested logical size.
//! let reused = pool.take(1024);
//! assert_eq!(reused.capacity(), 4096);
//! assert_eq!(reused.limit(), 1024);
//! ```
//!
//! ## Direct buffers for foreign interfaces
//!
//! ```rust
//! use buffer_pool::{Buffer, BufferPool, Locality};
//!
//! let pool = BufferPool::<i32>::direct();
//!
//! let buffer = pool.take(256);
//! assert_eq!(buffer.locality(), Locality::Direct);
//! pool.give(buffer).unwrap();
//!
//! // Buffers of the wrong locality are rejected, not filed.
//! let error = pool.give(Buffer::heap(256)).unwrap_err();
//! let recovered = error.into_buffer();
//! assert_eq!(recovered.capacity(), 256);
//! ```
//!
//! ## Sharing a pool across threads
//!
//! ```rust
//! use std::thread;
//!
//! use buffer_pool::BufferPool;
//!
//! let pool = BufferPool::<u8>::heap();
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let pool = pool.clone();
//!         thread::spawn(move || {
//!             let buffer = pool.take(8192);
//!             assert_eq!(buffer.limit(), 8192);
//!             pool.give(buffer).unwrap();
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! ```

mod buffer;
mod element;
mod error;
mod locality;
mod pool;

pub use buffer::*;
pub use element::*;
pub use error::*;
pub use locality::*;
pub use pool::*;
