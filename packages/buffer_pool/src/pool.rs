use std::fmt;

use size_class_pool::SizeClassPool;

use crate::{Buffer, Element, Locality, LocalityMismatch};

/// A thread-safe, size-bucketed pool of reusable [`Buffer`]s.
///
/// The pool lends out buffers with at least the requested capacity and
/// accepts them back for reuse, avoiding repeated allocation of large
/// scratch buffers in hot paths. Taking a buffer of capacity `n` returns the
/// smallest idle buffer whose capacity is at least `n`, reset to a logical
/// size of exactly `n`; only when no idle buffer fits is a fresh one
/// allocated. Idle buffers are kept indefinitely - there is no eviction -
/// until [`clear()`][Self::clear] is called or the last handle is dropped.
///
/// Each pool serves exactly one [`Locality`], fixed at construction by
/// choosing the [`heap()`][Self::heap] or [`direct()`][Self::direct]
/// constructor; [`give()`][Self::give] rejects buffers of the other
/// locality. The element type is likewise fixed by the type parameter.
///
/// This type is a cloneable handle: clones share one pool, and every
/// operation is a single short critical section over the shared state.
///
/// # Example
///
/// ```rust
/// use buffer_pool::BufferPool;
///
/// let pool = BufferPool::<u8>::heap();
///
/// // Cold start: the pool is empty, so this allocates a fresh buffer.
/// let mut buffer = pool.take(8192);
/// assert_eq!(buffer.capacity(), 8192);
///
/// buffer.put_slice(b"payload");
///
/// // Hand the buffer back; the next fitting request reuses it.
/// pool.give(buffer).unwrap();
///
/// let reused = pool.take(512);
/// assert_eq!(reused.capacity(), 8192);
/// assert_eq!(reused.limit(), 512);
/// ```
pub struct BufferPool<E: Element> {
    engine: SizeClassPool<Buffer<E>>,
    locality: Locality,
}

impl<E: Element> BufferPool<E> {
    /// Creates an empty pool of heap buffers.
    #[must_use]
    pub fn heap() -> Self {
        Self::with_locality(Locality::Heap)
    }

    /// Creates an empty pool of direct buffers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use buffer_pool::BufferPool;
    ///
    /// let pool = BufferPool::<f64>::direct();
    ///
    /// let buffer = pool.take(256);
    /// assert!(buffer.is_direct());
    /// ```
    #[must_use]
    pub fn direct() -> Self {
        Self::with_locality(Locality::Direct)
    }

    fn with_locality(locality: Locality) -> Self {
        let engine = SizeClassPool::builder()
            .allocate(move |capacity| match locality {
                Locality::Heap => Buffer::heap(capacity),
                Locality::Direct => Buffer::direct(capacity),
            })
            .capacity_of(Buffer::capacity)
            .reset(|buffer, limit| {
                buffer.clear();
                buffer.set_limit(limit);
            })
            .build();

        Self { engine, locality }
    }

    /// Takes a buffer with a capacity of at least `capacity` from the pool.
    ///
    /// The returned buffer has its position at zero and its limit at exactly
    /// `capacity`, regardless of its true capacity. A freshly allocated
    /// buffer is zero-filled; a reused buffer retains whatever elements its
    /// previous user left behind, within and beyond the new limit.
    ///
    /// Ownership of the buffer passes to the caller; return it with
    /// [`give()`][Self::give] to make it reusable.
    #[must_use]
    pub fn take(&self, capacity: usize) -> Buffer<E> {
        self.engine.take(capacity)
    }

    /// Gives a buffer to the pool, making it available for reuse.
    ///
    /// The buffer is filed under its true capacity; its contents are not
    /// cleared until the take that reuses it resets the cursor and limit.
    ///
    /// # Errors
    ///
    /// Returns [`LocalityMismatch`] if the buffer's locality differs from
    /// the pool's; the pool is left unchanged and the rejected buffer can be
    /// recovered from the error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use buffer_pool::{Buffer, BufferPool};
    ///
    /// let pool = BufferPool::<u8>::direct();
    ///
    /// let buffer = pool.take(64);
    /// assert!(pool.give(buffer).is_ok());
    ///
    /// // A heap buffer does not belong in a direct pool.
    /// assert!(pool.give(Buffer::heap(64)).is_err());
    /// ```
    pub fn give(&self, buffer: Buffer<E>) -> Result<(), LocalityMismatch<E>> {
        if buffer.locality() != self.locality {
            return Err(LocalityMismatch::new(self.locality, buffer));
        }

        self.engine.give(buffer);
        Ok(())
    }

    /// The locality of every buffer this pool allocates and accepts.
    #[must_use]
    pub fn locality(&self) -> Locality {
        self.locality
    }

    /// The number of idle buffers currently held by the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Whether the pool currently holds no idle buffers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Drops every idle buffer held by the pool, releasing its backing
    /// storage.
    ///
    /// Buffers currently checked out to callers are unaffected and may still
    /// be given back afterwards.
    pub fn clear(&self) {
        self.engine.clear();
    }
}

impl<E: Element> Default for BufferPool<E> {
    /// Creates an empty pool of heap buffers.
    fn default() -> Self {
        Self::heap()
    }
}

impl<E: Element> Clone for BufferPool<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            locality: self.locality,
        }
    }
}

impl<E: Element> fmt::Debug for BufferPool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("locality", &self.locality)
            .field("engine", &self.engine)
            .finish()
    }
}
