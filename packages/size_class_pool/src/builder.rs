use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use crate::raw::{AllocateFn, CapacityOfFn, ResetFn};
use crate::{RawSizeClassPool, SizeClassPool};

/// Builder for creating an instance of [`SizeClassPool`] or
/// [`RawSizeClassPool`].
///
/// The pool requires all three strategy functions to be specified at
/// construction time:
///
/// - [`allocate()`][Self::allocate] - creates a brand-new instance of the
///   requested capacity.
/// - [`capacity_of()`][Self::capacity_of] - reports an instance's true,
///   fixed capacity.
/// - [`reset()`][Self::reset] - rewinds an instance's cursor and narrows its
///   usable range to the requested logical size.
///
/// # Examples
///
/// Building a thread-safe pool:
///
/// ```rust
/// use size_class_pool::SizeClassPool;
///
/// let pool = SizeClassPool::builder()
///     .allocate(|capacity| vec![0_u8; capacity])
///     .capacity_of(|data: &Vec<u8>| data.len())
///     .reset(|_, _| {})
///     .build();
///
/// let data = pool.take(128);
/// assert_eq!(data.len(), 128);
/// ```
///
/// Building the single-threaded engine directly:
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
/// let data = pool.take(128);
/// assert_eq!(data.len(), 128);
/// ```
///
/// # Thread safety
///
/// The builder is thread-mobile ([`Send`]) and can be transferred between
/// threads, but it is not thread-safe ([`Sync`]) as it holds mutable
/// configuration state.
#[must_use]
pub struct SizeClassPoolBuilder<T> {
    allocate: Option<Box<AllocateFn<T>>>,
    capacity_of: Option<Box<CapacityOfFn<T>>>,
    reset: Option<Box<ResetFn<T>>>,

    // Prevents Sync while allowing Send - builders are thread-mobile but not thread-safe.
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> SizeClassPoolBuilder<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            allocate: None,
            capacity_of: None,
            reset: None,
            _not_sync: PhantomData,
        }
    }

    /// Sets the strategy function that creates a brand-new instance with
    /// exactly the requested capacity.
    ///
    /// The pool calls this on a cache miss, i.e. whenever no idle instance
    /// with a sufficient capacity exists.
    #[inline]
    pub fn allocate<F>(mut self, allocate: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        self.allocate = Some(Box::new(allocate));
        self
    }

    /// Sets the strategy function that reports an instance's true, fixed
    /// capacity.
    ///
    /// The pool calls this when an instance is given back, to determine which
    /// bucket it is filed under. The reported value must never change over an
    /// instance's lifetime.
    #[inline]
    pub fn capacity_of<F>(mut self, capacity_of: F) -> Self
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        self.capacity_of = Some(Box::new(capacity_of));
        self
    }

    /// Sets the strategy function that prepares a reused instance for its
    /// next checkout.
    ///
    /// The pool calls this with the requested capacity whenever it hands out
    /// a previously pooled instance; the function must rewind the instance's
    /// cursor and narrow its usable range to exactly that size. Freshly
    /// allocated instances are not reset.
    #[inline]
    pub fn reset<F>(mut self, reset: F) -> Self
    where
        F: Fn(&mut T, usize) + Send + Sync + 'static,
    {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Builds the thread-safe pool with the configured strategy functions.
    ///
    /// # Panics
    ///
    /// Panics if any of the three strategy functions has not been set.
    #[must_use]
    #[inline]
    pub fn build(self) -> SizeClassPool<T> {
        SizeClassPool::from(self.build_raw())
    }

    /// Builds the single-threaded engine with the configured strategy
    /// functions.
    ///
    /// # Panics
    ///
    /// Panics if any of the three strategy functions has not been set.
    #[must_use]
    #[inline]
    pub fn build_raw(self) -> RawSizeClassPool<T> {
        let allocate = self
            .allocate
            .expect("an `allocate` strategy function must be set before building the pool");
        let capacity_of = self
            .capacity_of
            .expect("a `capacity_of` strategy function must be set before building the pool");
        let reset = self
            .reset
            .expect("a `reset` strategy function must be set before building the pool");

        RawSizeClassPool::new_inner(allocate, capacity_of, reset)
    }
}

impl<T> fmt::Debug for SizeClassPoolBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeClassPoolBuilder")
            .field("allocate", &self.allocate.is_some())
            .field("capacity_of", &self.capacity_of.is_some())
            .field("reset", &self.reset.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "an `allocate` strategy function must be set")]
    fn build_without_allocate_panics() {
        _ = SizeClassPoolBuilder::<Vec<u8>>::new()
            .capacity_of(|data: &Vec<u8>| data.len())
            .reset(|_, _| {})
            .build_raw();
    }

    #[test]
    #[should_panic(expected = "a `capacity_of` strategy function must be set")]
    fn build_without_capacity_of_panics() {
        _ = SizeClassPoolBuilder::<Vec<u8>>::new()
            .allocate(|capacity| vec![0_u8; capacity])
            .reset(|_, _| {})
            .build_raw();
    }

    #[test]
    #[should_panic(expected = "a `reset` strategy function must be set")]
    fn build_without_reset_panics() {
        _ = SizeClassPoolBuilder::<Vec<u8>>::new()
            .allocate(|capacity| vec![0_u8; capacity])
            .capacity_of(|data: &Vec<u8>| data.len())
            .build_raw();
    }

    #[test]
    fn debug_reports_configured_strategies() {
        let builder =
            SizeClassPoolBuilder::<Vec<u8>>::new().allocate(|capacity| vec![0_u8; capacity]);

        let output = format!("{builder:?}");

        assert!(output.contains("allocate: true"));
        assert!(output.contains("capacity_of: false"));
    }
}
