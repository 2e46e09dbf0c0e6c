use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::SizeClassPoolBuilder;

/// Strategy function that creates a brand-new instance of the requested capacity.
pub(crate) type AllocateFn<T> = dyn Fn(usize) -> T + Send + Sync;

/// Strategy function that reports an instance's true, fixed capacity.
pub(crate) type CapacityOfFn<T> = dyn Fn(&T) -> usize + Send + Sync;

/// Strategy function that rewinds an instance's cursor and narrows its usable
/// range to the given logical size.
pub(crate) type ResetFn<T> = dyn Fn(&mut T, usize) + Send + Sync;

/// A single-threaded capacity-indexed pool of reusable fixed-capacity instances.
///
/// The pool maps capacities to buckets of idle instances, where every instance
/// in a bucket has exactly the bucket's capacity. [`take()`][Self::take]
/// serves a request for capacity `n` from the smallest non-empty bucket with
/// capacity at least `n`, creating a fresh instance only when no idle instance
/// fits. [`give()`][Self::give] files an instance back under its true capacity.
///
/// The pool holds no opinion about what an "instance" is: it drives the three
/// strategy functions supplied through the [builder][SizeClassPoolBuilder].
///
/// Idle instances are retained indefinitely; the pool never shrinks on its own.
/// Use [`clear()`][Self::clear] to drop all idle instances, or drop the pool.
///
/// # Example
///
/// ```rust
/// use size_class_pool::RawSizeClassPool;
///
/// struct Scratch {
///     data: Vec<u8>,
///     len: usize,
/// }
///
/// let mut pool = RawSizeClassPool::builder()
///     .allocate(|capacity| Scratch {
///         data: vec![0; capacity],
///         len: capacity,
///     })
///     .capacity_of(|scratch: &Scratch| scratch.data.len())
///     .reset(|scratch, len| scratch.len = len)
///     .build_raw();
///
/// let scratch = pool.take(64);
/// assert_eq!(scratch.data.len(), 64);
///
/// pool.give(scratch);
/// assert_eq!(pool.len(), 1);
/// ```
///
/// # Thread safety
///
/// This type is thread-mobile ([`Send`], when the instances are) but not
/// thread-safe ([`Sync`]). For concurrent use, wrap it via
/// [`SizeClassPool`][crate::SizeClassPool] instead.
pub struct RawSizeClassPool<T> {
    /// Idle instances keyed by their exact capacity. The map is ordered so a
    /// request can resolve "smallest capacity >= n" with one ascending scan.
    ///
    /// Buckets stay in the map once created, even when emptied by checkouts;
    /// an empty bucket simply no longer contributes instances to a scan.
    buckets: BTreeMap<usize, VecDeque<T>>,

    allocate: Box<AllocateFn<T>>,
    capacity_of: Box<CapacityOfFn<T>>,
    reset: Box<ResetFn<T>>,
}

impl<T> RawSizeClassPool<T> {
    /// Creates a builder for configuring and constructing a pool.
    ///
    /// All three strategy functions are mandatory; see
    /// [`SizeClassPoolBuilder`] for details.
    pub fn builder() -> SizeClassPoolBuilder<T> {
        SizeClassPoolBuilder::new()
    }

    pub(crate) fn new_inner(
        allocate: Box<AllocateFn<T>>,
        capacity_of: Box<CapacityOfFn<T>>,
        reset: Box<ResetFn<T>>,
    ) -> Self {
        Self {
            buckets: BTreeMap::new(),
            allocate,
            capacity_of,
            reset,
        }
    }

    /// Takes an instance with a capacity of at least `capacity` from the pool.
    ///
    /// Buckets are inspected in ascending capacity order, starting from the
    /// smallest capacity that can satisfy the request, and the first idle
    /// instance found is used. A reused instance is reset before it is
    /// returned: its cursor is rewound and its usable range narrowed to
    /// exactly `capacity`, regardless of which bucket it came from.
    ///
    /// If every fitting bucket is empty, a fresh instance of exactly
    /// `capacity` is created via the `allocate` strategy function and handed
    /// to the caller directly, without being recorded in any bucket.
    ///
    /// Ownership of the returned instance passes to the caller; return it
    /// with [`give()`][Self::give] to make it reusable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::RawSizeClassPool;
    ///
    /// let mut pool = RawSizeClassPool::builder()
    ///     .allocate(|capacity| (vec![0_u8; capacity], capacity))
    ///     .capacity_of(|(data, _): &(Vec<u8>, usize)| data.len())
    ///     .reset(|(_, len), requested| *len = requested)
    ///     .build_raw();
    ///
    /// let (data, len) = pool.take(16);
    /// assert_eq!(data.len(), 16);
    /// assert_eq!(len, 16);
    /// ```
    #[must_use]
    pub fn take(&mut self, capacity: usize) -> T {
        // Ascending walk over every bucket that could satisfy the request.
        // The first bucket visited is the best fit; later ones are visited
        // only when all smaller fitting buckets have been emptied by
        // checkouts, which is still cheaper than allocating fresh.
        for (_, bucket) in self.buckets.range_mut(capacity..) {
            if let Some(mut instance) = bucket.pop_front() {
                (self.reset)(&mut instance, capacity);
                return instance;
            }
        }

        (self.allocate)(capacity)
    }

    /// Gives an instance to the pool, making it available for reuse.
    ///
    /// The instance is filed under its true capacity, as reported by the
    /// `capacity_of` strategy function, creating the bucket if this is the
    /// first instance of that capacity. Its contents are not touched here;
    /// resetting happens lazily in the [`take()`][Self::take] that reuses it,
    /// so instances that are never reused cost nothing further.
    ///
    /// Giving an instance more than once per checkout files it twice and
    /// corrupts the pool's bookkeeping; the pool does not detect this.
    pub fn give(&mut self, instance: T) {
        let capacity = (self.capacity_of)(&instance);

        self.buckets.entry(capacity).or_default().push_back(instance);
    }

    /// The number of idle instances currently held by the pool.
    ///
    /// Instances checked out to callers are not counted; the pool retains no
    /// record of them until they are given back.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::RawSizeClassPool;
    ///
    /// let mut pool = RawSizeClassPool::builder()
    ///     .allocate(|capacity| vec![0_u8; capacity])
    ///     .capacity_of(|data: &Vec<u8>| data.len())
    ///     .reset(|_, _| {})
    ///     .build_raw();
    ///
    /// assert_eq!(pool.len(), 0);
    ///
    /// let data = pool.take(8);
    /// assert_eq!(pool.len(), 0);
    ///
    /// pool.give(data);
    /// assert_eq!(pool.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(VecDeque::len).sum()
    }

    /// Whether the pool currently holds no idle instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(VecDeque::is_empty)
    }

    /// Drops every idle instance held by the pool.
    ///
    /// Instances currently checked out to callers are unaffected and may
    /// still be given back afterwards.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl<T> fmt::Debug for RawSizeClassPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSizeClassPool")
            .field("size_classes", &self.buckets.len())
            .field("idle_instances", &self.len())
            .finish_non_exhaustive()
    }
}
