//! Plain values that can be stored in a page
//!
//! Values use the platform's native byte order, with no normalization.

/// A fixed-size value read from or written to page bytes.
pub trait PageValue: Copy {
    const SIZE: usize;

    /// `bytes` is exactly `SIZE` long.
    fn read_from(bytes: &[u8]) -> Self;

    /// `bytes` is exactly `SIZE` long.
    fn write_to(&self, bytes: &mut [u8]);
}

macro_rules! impl_page_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PageValue for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn read_from(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }

                fn write_to(&self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_page_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl PageValue for bool {
    const SIZE: usize = 1;

    fn read_from(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn write_to(&self, bytes: &mut [u8]) {
        bytes[0] = *self as u8;
    }
}
