use std::fmt::Debug;

/// The element types a [`Buffer`][crate::Buffer] can store.
///
/// This trait is sealed and implemented for the fixed-width numeric
/// primitives: `u8`, `i8`, `u16`, `i16`, `u32`, `i32`, `u64`, `i64`, `f32`
/// and `f64`. Sealing keeps every element type trivially copyable with a
/// well-defined zero value, which is what allows buffers to be allocated
/// zero-filled and moved between threads freely.
pub trait Element: Copy + Debug + Send + Sync + sealed::Sealed + 'static {
    /// The zero value this element type is initialized to in a freshly
    /// allocated buffer.
    const ZERO: Self;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_element {
    ($($element:ty => $zero:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $element {}

            impl Element for $element {
                const ZERO: Self = $zero;
            }
        )*
    };
}

impl_element! {
    u8 => 0,
    i8 => 0,
    u16 => 0,
    i16 => 0,
    u32 => 0,
    i32 => 0,
    u64 => 0,
    i64 => 0,
    f32 => 0.0,
    f64 => 0.0,
}
