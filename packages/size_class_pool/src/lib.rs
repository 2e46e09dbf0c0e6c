//! A capacity-indexed object pool with a best-fit reuse policy.
//!
//! This crate provides [`SizeClassPool`], a thread-safe cache of reusable
//! fixed-capacity instances keyed by their capacity. Requesting an instance of
//! capacity `n` returns the smallest idle instance whose capacity is at least
//! `n`, narrowed to a logical size of exactly `n`; only when no idle instance
//! fits is a fresh one created. Returning an instance files it back under its
//! true capacity for future reuse.
//!
//! The pool is generic: it knows nothing about the instances it manages beyond
//! three strategy functions supplied at construction time:
//!
//! - `allocate` - creates a brand-new instance of a requested capacity.
//! - `capacity_of` - reports an instance's true, fixed capacity.
//! - `reset` - rewinds an instance's cursor and narrows its usable range to
//!   the requested logical size before it is handed out again.
//!
//! # Key Features
//!
//! - **Best-fit reuse**: the smallest idle instance that satisfies a request
//!   is always preferred, in ascending capacity order.
//! - **Narrowing**: a reused instance always presents a usable range of
//!   exactly the requested size, regardless of its true capacity.
//! - **Thread safety**: [`SizeClassPool`] is a cloneable handle that can be
//!   shared freely across threads; every operation is a single short critical
//!   section over the whole pool.
//! - **No eviction**: idle instances are kept until [`clear()`][1] is called
//!   or the pool is dropped.
//!
//! For single-threaded use without locking, [`RawSizeClassPool`] exposes the
//! same engine directly.
//!
//! # Example
//!
//! ```rust
//! use size_class_pool::SizeClassPool;
//!
//! // A pooled scratch allocation with a fixed capacity and a logical size.
//! struct Scratch {
//!     data: Vec<u8>,
//!     len: usize,
//! }
//!
//! let pool = SizeClassPool::builder()
//!     .allocate(|capacity| Scratch {
//!         data: vec![0; capacity],
//!         len: capacity,
//!     })
//!     .capacity_of(|scratch: &Scratch| scratch.data.len())
//!     .reset(|scratch, len| scratch.len = len)
//!     .build();
//!
//! // Cold request: nothing is pooled yet, so a fresh instance is created.
//! let scratch = pool.take(1024);
//! assert_eq!(scratch.data.len(), 1024);
//!
//! // Return it; the next fitting request reuses it instead of allocating.
//! pool.give(scratch);
//! let reused = pool.take(512);
//! assert_eq!(reused.data.len(), 1024);
//! assert_eq!(reused.len, 512);
//! ```
//!
//! [1]: SizeClassPool::clear

mod builder;
mod constants;
mod pool;
mod raw;

pub use builder::*;
pub use pool::*;
pub use raw::*;
