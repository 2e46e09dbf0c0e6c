use thiserror::Error;

use crate::{Buffer, Element, Locality};

/// Error returned by [`BufferPool::give()`][crate::BufferPool::give] when a
/// buffer's locality does not match the pool's declared locality.
///
/// The rejected buffer is carried inside the error so the caller can recover
/// it with [`into_buffer()`][Self::into_buffer]; the pool's contents are left
/// untouched by the failed give.
///
/// # Example
///
/// ```rust
/// use buffer_pool::{Buffer, BufferPool, Locality};
///
/// let pool = BufferPool::<u8>::heap();
/// let stray = Buffer::direct(64);
///
/// let error = pool.give(stray).unwrap_err();
///
/// assert_eq!(error.expected(), Locality::Heap);
/// assert_eq!(error.found(), Locality::Direct);
///
/// // The buffer is not lost.
/// let stray = error.into_buffer();
/// assert_eq!(stray.capacity(), 64);
/// ```
#[derive(Debug, Error)]
#[error("a {} buffer cannot be given to a {expected} pool", .buffer.locality())]
pub struct LocalityMismatch<E: Element> {
    expected: Locality,
    buffer: Buffer<E>,
}

impl<E: Element> LocalityMismatch<E> {
    pub(crate) fn new(expected: Locality, buffer: Buffer<E>) -> Self {
        Self { expected, buffer }
    }

    /// The locality the pool accepts.
    #[must_use]
    pub fn expected(&self) -> Locality {
        self.expected
    }

    /// The locality of the rejected buffer.
    #[must_use]
    pub fn found(&self) -> Locality {
        self.buffer.locality()
    }

    /// Recovers the rejected buffer.
    #[must_use]
    pub fn into_buffer(self) -> Buffer<E> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(LocalityMismatch<u8>: Send, Sync, Debug, Error);

    #[test]
    fn message_names_both_localities() {
        let error = LocalityMismatch::new(Locality::Direct, Buffer::<u8>::heap(8));

        assert_eq!(
            error.to_string(),
            "a heap buffer cannot be given to a direct pool"
        );
    }
}
