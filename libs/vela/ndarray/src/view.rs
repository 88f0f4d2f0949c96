//! Borrowed views over contiguous array storage.
use core::fmt;

use zerocopy::{Immutable, IntoBytes, TryFromBytes};

/// A borrowed view of an array's flattened storage plus its shape.
#[derive(Clone, Copy, Debug)]
pub struct ArrayView<'a, T> {
    buf: &'a [T],
    shape: &'a [usize],
}

impl<'a, T> ArrayView<'a, T> {
    /// Reinterprets raw bytes as an element buffer with the given shape.
    /// Returns `None` when the byte length, alignment, or bit patterns do
    /// not match the element type.
    pub fn try_from_bytes(bytes: &'a [u8], shape: &'a [usize]) -> Option<Self>
    where
        [T]: TryFromBytes + Immutable,
    {
        let count = shape.iter().product();
        let buf = <[T]>::try_ref_from_bytes_with_elems(bytes, count).ok()?;
        Some(ArrayView { buf, shape })
    }

    pub fn from_buf_shape(buf: &'a [T], shape: &'a [usize]) -> Self {
        debug_assert_eq!(buf.len(), shape.iter().product::<usize>());
        ArrayView { buf, shape }
    }

    pub fn as_bytes(&self) -> &[u8]
    where
        T: IntoBytes + Immutable,
    {
        self.buf.as_bytes()
    }

    pub fn buf(&self) -> &'a [T] {
        self.buf
    }

    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: fmt::Display> fmt::Display for ArrayView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_nested<T: fmt::Display>(
            buf: &[T],
            shape: &[usize],
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let Some((_, rest)) = shape.split_first() else {
                // rank 0: a single scalar
                return match buf.first() {
                    Some(scalar) => write!(f, "{}", scalar),
                    None => Ok(()),
                };
            };
            let chunk_len = rest.iter().product::<usize>().max(1);
            write!(f, "[")?;
            for (i, chunk) in buf.chunks(chunk_len).enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_nested(chunk, rest, f)?;
            }
            write!(f, "]")
        }
        fmt_nested(self.buf, self.shape, f)
    }
}
