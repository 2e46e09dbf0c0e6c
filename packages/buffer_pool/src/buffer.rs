use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::ptr::NonNull;
use std::{fmt, ptr, slice};

use crate::{Element, Locality};

/// A fixed-capacity buffer of primitive elements with a cursor and a limit.
///
/// A buffer has three coordinates:
///
/// - **capacity** - the true size of the backing allocation, fixed for the
///   buffer's whole lifetime;
/// - **limit** - the logical size: elements at indexes below the limit are
///   the buffer's usable contents;
/// - **position** - the cursor at which the bulk transfer operations
///   [`put_slice()`][Self::put_slice] and
///   [`copy_to_slice()`][Self::copy_to_slice] operate.
///
/// The invariant `position <= limit <= capacity` holds at all times; cursor
/// operations that would violate it panic.
///
/// The backing storage lives either on the managed heap or in a direct
/// allocation obtained from the global allocator, chosen at construction and
/// reported by [`locality()`][Self::locality]. Either way the buffer owns its
/// storage exclusively and releases it on drop. Fresh buffers are
/// zero-filled.
///
/// # Example
///
/// ```rust
/// use buffer_pool::Buffer;
///
/// let mut buffer = Buffer::<u8>::heap(8);
/// assert_eq!(buffer.capacity(), 8);
/// assert_eq!(buffer.limit(), 8);
/// assert_eq!(buffer.position(), 0);
///
/// buffer.put_slice(b"abc");
/// assert_eq!(buffer.position(), 3);
///
/// // Flip to read back what was just written.
/// buffer.flip();
/// assert_eq!(buffer.as_slice(), b"abc");
/// ```
pub struct Buffer<E: Element> {
    storage: Storage<E>,

    /// The cursor; always <= `limit`.
    position: usize,

    /// The logical size; always <= the storage capacity.
    limit: usize,
}

enum Storage<E: Element> {
    /// An ordinary owned slice on the managed heap.
    Heap(Box<[E]>),

    /// A manually managed allocation from the global allocator.
    Direct(DirectStorage<E>),
}

/// Owner of a direct allocation of `capacity` elements.
///
/// The pointer is dangling when `capacity` is zero; no allocation is
/// performed or released in that case.
struct DirectStorage<E: Element> {
    ptr: NonNull<E>,
    capacity: usize,
}

impl<E: Element> DirectStorage<E> {
    fn allocate(capacity: usize) -> Self {
        if capacity == 0 {
            return Self {
                ptr: NonNull::dangling(),
                capacity: 0,
            };
        }

        let layout = Layout::array::<E>(capacity)
            .expect("buffer capacity exceeds the maximum allocation size the allocator supports");

        // SAFETY: The layout has non-zero size because capacity > 0 and
        // every sealed element type has non-zero size.
        let untyped = unsafe { alloc_zeroed(layout) };

        let ptr = NonNull::new(untyped)
            .expect("allocation failure for a scratch buffer is not a recoverable condition")
            .cast::<E>();

        Self { ptr, capacity }
    }
}

impl<E: Element> Drop for DirectStorage<E> {
    #[cfg_attr(test, mutants::skip)] // Can be mutated to a leak, which no test can observe.
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }

        let layout = Layout::array::<E>(self.capacity)
            .expect("the same layout computation already succeeded at allocation time");

        // SAFETY: The pointer was returned by the global allocator for this
        // exact layout in allocate() and has not been released before.
        unsafe {
            dealloc(self.ptr.as_ptr().cast(), layout);
        }
    }
}

impl<E: Element> Buffer<E> {
    /// Creates a zero-filled heap buffer of exactly the given capacity.
    ///
    /// The limit starts at the capacity and the position at zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use buffer_pool::{Buffer, Locality};
    ///
    /// let buffer = Buffer::<u64>::heap(16);
    ///
    /// assert_eq!(buffer.capacity(), 16);
    /// assert_eq!(buffer.locality(), Locality::Heap);
    /// assert!(buffer.as_slice().iter().all(|&element| element == 0));
    /// ```
    #[must_use]
    pub fn heap(capacity: usize) -> Self {
        Self {
            storage: Storage::Heap(vec![E::ZERO; capacity].into_boxed_slice()),
            position: 0,
            limit: capacity,
        }
    }

    /// Creates a zero-filled direct buffer of exactly the given capacity.
    ///
    /// The backing storage is obtained straight from the global allocator
    /// and released when the buffer is dropped. The limit starts at the
    /// capacity and the position at zero.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds the maximum allocation size
    /// the allocator supports, or if the allocation itself fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use buffer_pool::{Buffer, Locality};
    ///
    /// let buffer = Buffer::<f32>::direct(16);
    ///
    /// assert_eq!(buffer.capacity(), 16);
    /// assert_eq!(buffer.locality(), Locality::Direct);
    /// ```
    #[must_use]
    pub fn direct(capacity: usize) -> Self {
        Self {
            storage: Storage::Direct(DirectStorage::allocate(capacity)),
            position: 0,
            limit: capacity,
        }
    }

    /// The true size of the backing allocation, in elements.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Heap(data) => data.len(),
            Storage::Direct(direct) => direct.capacity,
        }
    }

    /// The logical size, in elements.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The cursor used by the bulk transfer operations.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of elements between the cursor and the limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        // Cannot underflow: position <= limit is a type invariant.
        self.limit.wrapping_sub(self.position)
    }

    /// Whether any elements remain between the cursor and the limit.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.position < self.limit
    }

    /// Where this buffer's backing storage lives.
    #[must_use]
    pub fn locality(&self) -> Locality {
        match &self.storage {
            Storage::Heap(_) => Locality::Heap,
            Storage::Direct(_) => Locality::Direct,
        }
    }

    /// Whether this buffer's backing storage is a direct allocation.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.locality() == Locality::Direct
    }

    /// Moves the cursor to the given index.
    ///
    /// # Panics
    ///
    /// Panics if `position` exceeds the current limit.
    pub fn set_position(&mut self, position: usize) {
        assert!(
            position <= self.limit,
            "position {position} exceeds the buffer limit {}",
            self.limit
        );

        self.position = position;
    }

    /// Narrows or widens the logical size.
    ///
    /// Lowering the limit below the cursor pulls the cursor back to the new
    /// limit.
    ///
    /// # Panics
    ///
    /// Panics if `limit` exceeds the capacity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use buffer_pool::Buffer;
    ///
    /// let mut buffer = Buffer::<u8>::heap(8);
    /// buffer.set_position(6);
    ///
    /// buffer.set_limit(4);
    ///
    /// assert_eq!(buffer.limit(), 4);
    /// assert_eq!(buffer.position(), 4);
    /// ```
    pub fn set_limit(&mut self, limit: usize) {
        assert!(
            limit <= self.capacity(),
            "limit {limit} exceeds the buffer capacity {}",
            self.capacity()
        );

        self.limit = limit;
        self.position = self.position.min(limit);
    }

    /// Resets the cursor to zero and the limit to the full capacity.
    ///
    /// The element contents are not erased; whatever was written remains in
    /// the backing storage.
    pub fn clear(&mut self) {
        self.position = 0;
        self.limit = self.capacity();
    }

    /// Prepares the buffer for reading back what was just written: the limit
    /// moves to the cursor and the cursor rewinds to zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use buffer_pool::Buffer;
    ///
    /// let mut buffer = Buffer::<u16>::heap(8);
    /// buffer.put_slice(&[1, 2, 3]);
    ///
    /// buffer.flip();
    ///
    /// assert_eq!(buffer.as_slice(), &[1, 2, 3]);
    /// assert_eq!(buffer.remaining(), 3);
    /// ```
    pub fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
    }

    /// Rewinds the cursor to zero, leaving the limit unchanged.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Copies all of `src` into the buffer at the cursor and advances the
    /// cursor past it.
    ///
    /// # Panics
    ///
    /// Panics if `src` is longer than [`remaining()`][Self::remaining].
    pub fn put_slice(&mut self, src: &[E]) {
        assert!(
            src.len() <= self.remaining(),
            "cannot write {} elements into a buffer with {} remaining",
            src.len(),
            self.remaining()
        );

        let start = self.position;

        // Cannot overflow: start + src.len() <= limit <= capacity.
        let end = start.wrapping_add(src.len());

        // SAFETY: The destination range [start, end) lies inside the
        // initialized allocation because src.len() <= remaining().
        let dst = unsafe { self.base_ptr_mut().add(start) };

        // SAFETY: src borrows memory that cannot overlap the buffer's
        // exclusively owned storage, and dst is valid for src.len() writes
        // per the bound above.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len());
        }

        self.position = end;
    }

    /// Copies elements from the buffer at the cursor into all of `dst` and
    /// advances the cursor past them.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is longer than [`remaining()`][Self::remaining].
    pub fn copy_to_slice(&mut self, dst: &mut [E]) {
        assert!(
            dst.len() <= self.remaining(),
            "cannot read {} elements from a buffer with {} remaining",
            dst.len(),
            self.remaining()
        );

        let start = self.position;

        // Cannot overflow: start + dst.len() <= limit <= capacity.
        let end = start.wrapping_add(dst.len());

        // SAFETY: The source range [start, end) lies inside the initialized
        // allocation because dst.len() <= remaining().
        let src = unsafe { self.base_ptr().add(start) };

        // SAFETY: dst borrows memory that cannot overlap the buffer's
        // exclusively owned storage, and src is valid for dst.len() reads
        // per the bound above.
        unsafe {
            ptr::copy_nonoverlapping(src, dst.as_mut_ptr(), dst.len());
        }

        self.position = end;
    }

    /// The buffer's logical contents: the elements below the limit.
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        let base = self.base_ptr();

        // SAFETY: The allocation holds `capacity` initialized elements and
        // limit <= capacity is a type invariant, so the first `limit`
        // elements are valid for reads for as long as the borrow lasts.
        unsafe { slice::from_raw_parts(base, self.limit) }
    }

    /// The buffer's logical contents, mutably.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [E] {
        let limit = self.limit;
        let base = self.base_ptr_mut();

        // SAFETY: The allocation holds `capacity` initialized elements and
        // limit <= capacity is a type invariant; the exclusive borrow of
        // self guarantees no aliasing for as long as the borrow lasts.
        unsafe { slice::from_raw_parts_mut(base, limit) }
    }

    /// A raw pointer to the start of the backing allocation.
    ///
    /// The pointer is stable for the buffer's whole lifetime, including
    /// across moves, which makes it usable as an identity for the backing
    /// allocation. It is dangling for a zero-capacity buffer.
    #[must_use]
    pub fn as_ptr(&self) -> *const E {
        self.base_ptr()
    }

    fn base_ptr(&self) -> *const E {
        match &self.storage {
            Storage::Heap(data) => data.as_ptr(),
            Storage::Direct(direct) => direct.ptr.as_ptr(),
        }
    }

    fn base_ptr_mut(&mut self) -> *mut E {
        match &mut self.storage {
            Storage::Heap(data) => data.as_mut_ptr(),
            Storage::Direct(direct) => direct.ptr.as_ptr(),
        }
    }
}

// SAFETY: A buffer exclusively owns its backing allocation (an owned slice
// or a private direct allocation), so moving it to another thread is sound.
unsafe impl<E: Element> Send for Buffer<E> {}

// SAFETY: A shared reference to a buffer only permits reads of the
// exclusively owned allocation.
unsafe impl<E: Element> Sync for Buffer<E> {}

impl<E: Element> fmt::Debug for Buffer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("locality", &self.locality())
            .field("capacity", &self.capacity())
            .field("limit", &self.limit)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        clippy::float_cmp,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Buffer<u8>: Send, Sync, Debug);
    assert_impl_all!(Buffer<f64>: Send, Sync, Debug);

    #[test]
    fn fresh_heap_buffer_is_zero_filled() {
        let buffer = Buffer::<u32>::heap(16);

        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.limit(), 16);
        assert_eq!(buffer.position(), 0);
        assert!(buffer.as_slice().iter().all(|&element| element == 0));
    }

    #[test]
    fn fresh_direct_buffer_is_zero_filled() {
        let buffer = Buffer::<u64>::direct(16);

        assert_eq!(buffer.capacity(), 16);
        assert!(buffer.is_direct());
        assert!(buffer.as_slice().iter().all(|&element| element == 0));
    }

    #[test]
    fn zero_capacity_buffers_work_in_both_localities() {
        let heap = Buffer::<u8>::heap(0);
        let direct = Buffer::<u8>::direct(0);

        assert_eq!(heap.capacity(), 0);
        assert_eq!(direct.capacity(), 0);
        assert!(heap.as_slice().is_empty());
        assert!(direct.as_slice().is_empty());
    }

    #[test]
    fn put_then_flip_then_copy_round_trips() {
        let mut buffer = Buffer::<i64>::direct(8);

        buffer.put_slice(&[-1, -2, -3]);
        assert_eq!(buffer.position(), 3);
        assert_eq!(buffer.remaining(), 5);

        buffer.flip();
        assert_eq!(buffer.limit(), 3);
        assert_eq!(buffer.position(), 0);

        let mut read_back = [0_i64; 3];
        buffer.copy_to_slice(&mut read_back);

        assert_eq!(read_back, [-1, -2, -3]);
        assert!(!buffer.has_remaining());
    }

    #[test]
    fn set_limit_pulls_position_back() {
        let mut buffer = Buffer::<u8>::heap(8);
        buffer.set_position(6);

        buffer.set_limit(4);

        assert_eq!(buffer.limit(), 4);
        assert_eq!(buffer.position(), 4);

        // Raising the limit again leaves the position alone.
        buffer.set_limit(8);
        assert_eq!(buffer.position(), 4);
    }

    #[test]
    fn clear_restores_full_capacity_without_erasing() {
        let mut buffer = Buffer::<u8>::heap(8);
        buffer.put_slice(b"abcd");
        buffer.set_limit(4);

        buffer.clear();

        assert_eq!(buffer.limit(), 8);
        assert_eq!(buffer.position(), 0);
        assert_eq!(&buffer.as_slice()[..4], b"abcd");
    }

    #[test]
    fn rewind_keeps_limit() {
        let mut buffer = Buffer::<u8>::heap(8);
        buffer.put_slice(b"ab");

        buffer.rewind();

        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.limit(), 8);
    }

    #[test]
    #[should_panic(expected = "position 9 exceeds the buffer limit 8")]
    fn position_beyond_limit_panics() {
        let mut buffer = Buffer::<u8>::heap(8);
        buffer.set_position(9);
    }

    #[test]
    #[should_panic(expected = "limit 9 exceeds the buffer capacity 8")]
    fn limit_beyond_capacity_panics() {
        let mut buffer = Buffer::<u8>::heap(8);
        buffer.set_limit(9);
    }

    #[test]
    #[should_panic(expected = "cannot write 3 elements into a buffer with 2 remaining")]
    fn oversized_put_panics() {
        let mut buffer = Buffer::<u8>::heap(2);
        buffer.put_slice(b"abc");
    }

    #[test]
    #[should_panic(expected = "cannot read 4 elements from a buffer with 2 remaining")]
    fn oversized_copy_panics() {
        let mut buffer = Buffer::<u8>::heap(2);
        let mut sink = [0_u8; 4];
        buffer.copy_to_slice(&mut sink);
    }

    #[test]
    fn mutation_through_slice_is_visible() {
        let mut buffer = Buffer::<f32>::heap(4);

        buffer.as_mut_slice()[2] = 1.5;

        assert_eq!(buffer.as_slice()[2], 1.5);
    }

    #[test]
    fn backing_pointer_is_stable_across_moves() {
        let buffer = Buffer::<u8>::direct(64);
        let before = buffer.as_ptr();

        let moved = buffer;

        assert_eq!(moved.as_ptr(), before);
    }

    #[test]
    fn dropping_a_direct_buffer_releases_its_allocation() {
        // Exercises the dealloc path; failures surface under address
        // sanitizers and leak checkers.
        for _ in 0..64 {
            let mut buffer = Buffer::<u64>::direct(1024);
            buffer.put_slice(&[7; 16]);
            drop(buffer);
        }
    }

    #[test]
    fn debug_output_reports_coordinates() {
        let mut buffer = Buffer::<u8>::direct(8);
        buffer.put_slice(b"ab");
        buffer.set_limit(4);

        let output = format!("{buffer:?}");

        assert!(output.contains("Direct"));
        assert!(output.contains("capacity: 8"));
        assert!(output.contains("limit: 4"));
        assert!(output.contains("position: 2"));
    }
}
