use std::fmt;
use std::sync::{Arc, Mutex};

use crate::constants::ERR_POISONED_LOCK;
use crate::{RawSizeClassPool, SizeClassPoolBuilder};

/// A thread-safe capacity-indexed pool of reusable fixed-capacity instances.
///
/// This is a cloneable handle to a shared [`RawSizeClassPool`]; clones refer
/// to the same pool, and the pool stays alive as long as any handle does.
/// Every operation takes a single whole-pool lock for the duration of its
/// bucket manipulation, so no operation ever waits on another thread's future
/// action - only on the lock itself.
///
/// The fresh-allocation path also runs under the lock. This trades a little
/// contention during cold start for the guarantee that a `take` never races
/// another `take` into allocating when a fitting instance was just given back.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use size_class_pool::SizeClassPool;
///
/// let pool = SizeClassPool::builder()
///     .allocate(|capacity| vec![0_u8; capacity])
///     .capacity_of(|data: &Vec<u8>| data.len())
///     .reset(|_, _| {})
///     .build();
///
/// let pool_clone = pool.clone();
///
/// let handle = thread::spawn(move || {
///     let data = pool_clone.take(256);
///     pool_clone.give(data);
/// });
///
/// handle.join().unwrap();
/// assert_eq!(pool.len(), 1);
/// ```
pub struct SizeClassPool<T> {
    /// The shared engine, protected by one coarse lock covering every bucket.
    inner: Arc<Mutex<RawSizeClassPool<T>>>,
}

impl<T> From<RawSizeClassPool<T>> for SizeClassPool<T> {
    /// Wraps an existing single-threaded engine in thread-safe sharing.
    fn from(pool: RawSizeClassPool<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}

impl<T> SizeClassPool<T> {
    /// Creates a builder for configuring and constructing a pool.
    ///
    /// All three strategy functions are mandatory; see
    /// [`SizeClassPoolBuilder`] for details.
    pub fn builder() -> SizeClassPoolBuilder<T> {
        SizeClassPoolBuilder::new()
    }

    /// Takes an instance with a capacity of at least `capacity` from the pool.
    ///
    /// See [`RawSizeClassPool::take()`] for the reuse and narrowing rules.
    /// This operation may block briefly if another thread is currently
    /// accessing the pool.
    #[must_use]
    pub fn take(&self, capacity: usize) -> T {
        let mut pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.take(capacity)
    }

    /// Gives an instance to the pool, making it available for reuse.
    ///
    /// See [`RawSizeClassPool::give()`] for the filing rules. This operation
    /// may block briefly if another thread is currently accessing the pool.
    pub fn give(&self, instance: T) {
        let mut pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.give(instance);
    }

    /// The number of idle instances currently held by the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.len()
    }

    /// Whether the pool currently holds no idle instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.is_empty()
    }

    /// Drops every idle instance held by the pool.
    ///
    /// Instances currently checked out to callers are unaffected and may
    /// still be given back afterwards.
    pub fn clear(&self) {
        let mut pool = self.inner.lock().expect(ERR_POISONED_LOCK);
        pool.clear();
    }
}

impl<T> Clone for SizeClassPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SizeClassPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeClassPool")
            .field("inner", &self.inner)
            .finish()
    }
}
