//! The fixed-shape array container and its bounds-checking policies.
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use approx::{AbsDiffEq, RelativeEq};

use crate::{ArrayBuf, ArrayView, Const, ConstShape, Elem, Error};

/// Type-level switch deciding how index tuples are validated.
///
/// The policy is fixed per array type; there is no runtime flag.
pub trait IndexPolicy {
    fn offset(
        shape: &'static [usize],
        strides: &'static [usize],
        index: &[usize],
    ) -> Result<usize, Error>;
}

/// Skips per-axis validation entirely. An out-of-range axis index is a
/// caller contract violation: the access may alias another element or
/// land beyond the storage, where the usual slice bounds rules apply.
pub struct Unchecked;

/// Validates every axis index against its extent, left to right, failing
/// on the first violation.
pub struct Checked;

impl IndexPolicy for Unchecked {
    #[inline]
    fn offset(
        _shape: &'static [usize],
        strides: &'static [usize],
        index: &[usize],
    ) -> Result<usize, Error> {
        Ok(index.iter().zip(strides).map(|(i, s)| i * s).sum())
    }
}

impl IndexPolicy for Checked {
    fn offset(
        shape: &'static [usize],
        strides: &'static [usize],
        index: &[usize],
    ) -> Result<usize, Error> {
        let mut offset = 0;
        for (axis, ((&index, &extent), &stride)) in
            index.iter().zip(shape).zip(strides).enumerate()
        {
            if index >= extent {
                return Err(Error::OutOfBounds {
                    axis,
                    index,
                    extent,
                });
            }
            offset += index * stride;
        }
        Ok(offset)
    }
}

/// A fixed-shape N-dimensional array backed by one contiguous block of
/// `S::LEN` elements in row-major order (last dimension fastest).
///
/// The element for indices `(i1, ..., ik)` lives at the flattened offset
/// `i1 * (D2 * ... * Dk) + i2 * (D3 * ... * Dk) + ... + ik`, so every
/// in-range index tuple addresses a unique slot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "S::Buf<T>: serde::Serialize",
        deserialize = "S::Buf<T>: serde::Deserialize<'de>"
    ))
)]
pub struct NdArray<T: Elem, S: ConstShape, P: IndexPolicy = Unchecked> {
    buf: S::Buf<T>,
    policy: PhantomData<P>,
}

/// A fixed-shape array that reports out-of-range indices as recoverable
/// errors instead of treating them as a caller obligation.
pub type NdArrayStrict<T, S> = NdArray<T, S, Checked>;

impl<T: Elem, S: ConstShape, P: IndexPolicy> NdArray<T, S, P> {
    /// Total element count, the product of all extents.
    pub const SIZE: usize = S::LEN;

    /// Creates an array with every element at the element type's zero
    /// value.
    pub fn zeroed() -> Self {
        NdArray {
            buf: S::Buf::<T>::zeroed(),
            policy: PhantomData,
        }
    }

    pub const fn len(&self) -> usize {
        S::LEN
    }

    pub const fn is_empty(&self) -> bool {
        S::LEN == 0
    }

    pub const fn shape(&self) -> &'static [usize] {
        S::SHAPE
    }

    pub const fn strides(&self) -> &'static [usize] {
        S::STRIDES
    }

    /// The flattened row-major storage.
    pub fn as_buf(&self) -> &[T] {
        self.buf.as_buf()
    }

    pub fn as_mut_buf(&mut self) -> &mut [T] {
        self.buf.as_mut_buf()
    }

    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView::from_buf_shape(self.buf.as_buf(), S::SHAPE)
    }

    /// Returns the element at `index`, validated according to the array's
    /// policy. Under [`Checked`] the first out-of-range axis fails the
    /// whole access.
    pub fn get(&self, index: S::Index) -> Result<&T, Error> {
        let offset = P::offset(S::SHAPE, S::STRIDES, index.as_ref())?;
        self.buf.as_buf().get(offset).ok_or(Error::OutOfRange {
            offset,
            len: S::LEN,
        })
    }

    pub fn get_mut(&mut self, index: S::Index) -> Result<&mut T, Error> {
        let offset = P::offset(S::SHAPE, S::STRIDES, index.as_ref())?;
        self.buf
            .as_mut_buf()
            .get_mut(offset)
            .ok_or(Error::OutOfRange {
                offset,
                len: S::LEN,
            })
    }

    /// Returns the element at `index` with no validation at all.
    ///
    /// Safety: every component of `index` must be within its extent.
    pub unsafe fn get_unchecked(&self, index: S::Index) -> &T {
        let offset: usize = index
            .as_ref()
            .iter()
            .zip(S::STRIDES)
            .map(|(i, s)| i * s)
            .sum();
        unsafe { self.buf.as_buf().get_unchecked(offset) }
    }
}

impl<T: Elem, S: ConstShape, P: IndexPolicy> Index<S::Index> for NdArray<T, S, P> {
    type Output = T;

    fn index(&self, index: S::Index) -> &T {
        match self.get(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: Elem, S: ConstShape, P: IndexPolicy> IndexMut<S::Index> for NdArray<T, S, P> {
    fn index_mut(&mut self, index: S::Index) -> &mut T {
        match self.get_mut(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<T: Elem, S: ConstShape, P: IndexPolicy> Default for NdArray<T, S, P> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Elem, S: ConstShape, P: IndexPolicy> Clone for NdArray<T, S, P>
where
    S::Buf<T>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            policy: PhantomData,
        }
    }
}

impl<T: Elem, S: ConstShape, P: IndexPolicy> Copy for NdArray<T, S, P> where S::Buf<T>: Copy {}

impl<T: Elem, S: ConstShape, P: IndexPolicy> fmt::Debug for NdArray<T, S, P>
where
    S::Buf<T>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.buf.fmt(f)
    }
}

impl<T: Elem + PartialEq, S: ConstShape, P: IndexPolicy> PartialEq for NdArray<T, S, P> {
    fn eq(&self, other: &Self) -> bool {
        self.buf.as_buf() == other.buf.as_buf()
    }
}

impl<T, S: ConstShape, P: IndexPolicy> AbsDiffEq for NdArray<T, S, P>
where
    T: Elem + AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.buf.as_buf().abs_diff_eq(other.buf.as_buf(), epsilon)
    }
}

impl<T, S: ConstShape, P: IndexPolicy> RelativeEq for NdArray<T, S, P>
where
    T: Elem + RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> T::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T::Epsilon, max_relative: T::Epsilon) -> bool {
        self.buf
            .as_buf()
            .relative_eq(other.buf.as_buf(), epsilon, max_relative)
    }
}

impl<T: Elem, P: IndexPolicy, const D1: usize> From<[T; D1]> for NdArray<T, Const<D1>, P> {
    fn from(buf: [T; D1]) -> Self {
        NdArray {
            buf,
            policy: PhantomData,
        }
    }
}

impl<T: Elem, P: IndexPolicy, const D1: usize, const D2: usize> From<[[T; D2]; D1]>
    for NdArray<T, (Const<D1>, Const<D2>), P>
{
    fn from(buf: [[T; D2]; D1]) -> Self {
        NdArray {
            buf,
            policy: PhantomData,
        }
    }
}

impl<T: Elem, P: IndexPolicy, const D1: usize, const D2: usize, const D3: usize>
    From<[[[T; D3]; D2]; D1]> for NdArray<T, (Const<D1>, Const<D2>, Const<D3>), P>
{
    fn from(buf: [[[T; D3]; D2]; D1]) -> Self {
        NdArray {
            buf,
            policy: PhantomData,
        }
    }
}

#[macro_export]
macro_rules! ndarray {
    ($([$([$($x:expr),* $(,)*]),+ $(,)*]),+ $(,)*) => {{
        $crate::NdArray::from([$([$([$($x,)*],)*],)*])
    }};
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::NdArray::from([$([$($x,)*],)*])
    }};
    ($($x:expr),* $(,)*) => {{
        $crate::NdArray::from([$($x,)*])
    }};

    ($elem:expr; $n:expr) => {{
        $crate::NdArray::from([$elem; $n])
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    type Shape567 = (Const<5>, Const<6>, Const<7>);

    #[test]
    fn test_zero_init() {
        let arr: NdArray<i32, Shape567> = NdArray::zeroed();
        for i in 0..5 {
            for j in 0..6 {
                for k in 0..7 {
                    assert_eq!(arr[[i, j, k]], 0);
                }
            }
        }
    }

    #[test]
    fn test_size() {
        assert_eq!(NdArray::<i32, Shape567>::SIZE, 5 * 6 * 7);
        assert_eq!(NdArray::<i32, Const<9>>::SIZE, 9);
        assert_eq!(NdArray::<i32, (Const<1>, Const<4>, Const<1>)>::SIZE, 4);
        let arr: NdArray<u8, (Const<2>, Const<3>)> = NdArray::zeroed();
        assert_eq!(arr.len(), 6);
    }

    #[test]
    fn test_read_write() {
        let mut arr: NdArray<i64, Shape567> = NdArray::zeroed();
        for i in 0..5 {
            for j in 0..6 {
                for k in 0..7 {
                    arr[[i, j, k]] = (i * 1009 + j * 131 + k * 17) as i64;
                }
            }
        }
        for i in 0..5 {
            for j in 0..6 {
                for k in 0..7 {
                    assert_eq!(arr[[i, j, k]], (i * 1009 + j * 131 + k * 17) as i64);
                }
            }
        }
    }

    #[test]
    fn test_single_write_leaves_rest() {
        let mut arr: NdArray<i32, (Const<3>, Const<4>)> = NdArray::zeroed();
        arr[[1, 2]] = 42;
        for i in 0..3 {
            for j in 0..4 {
                let expected = if (i, j) == (1, 2) { 42 } else { 0 };
                assert_eq!(arr[[i, j]], expected);
            }
        }
    }

    #[test]
    fn test_offset_law() {
        let mut arr: NdArray<usize, (Const<2>, Const<3>, Const<4>)> = NdArray::zeroed();
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    arr[[i, j, k]] = i * 12 + j * 4 + k;
                }
            }
        }
        for (offset, &elem) in arr.as_buf().iter().enumerate() {
            assert_eq!(elem, offset);
        }
    }

    #[test]
    fn test_strict_out_of_bounds() {
        let arr: NdArrayStrict<i32, Shape567> = NdArray::zeroed();
        assert_eq!(
            arr.get([5, 0, 0]),
            Err(Error::OutOfBounds {
                axis: 0,
                index: 5,
                extent: 5
            })
        );
        assert_eq!(
            arr.get([0, 6, 0]),
            Err(Error::OutOfBounds {
                axis: 1,
                index: 6,
                extent: 6
            })
        );
        assert_eq!(
            arr.get([0, 0, 7]),
            Err(Error::OutOfBounds {
                axis: 2,
                index: 7,
                extent: 7
            })
        );
        assert!(arr.get([4, 5, 6]).is_ok());
    }

    #[test]
    fn test_strict_reports_first_violation() {
        let mut arr: NdArrayStrict<i32, (Const<2>, Const<2>)> = NdArray::zeroed();
        // both axes out of range; axis 0 is the one reported
        assert_eq!(
            arr.get([2, 9]),
            Err(Error::OutOfBounds {
                axis: 0,
                index: 2,
                extent: 2
            })
        );
        assert_eq!(
            arr.get_mut([0, 2]),
            Err(Error::OutOfBounds {
                axis: 1,
                index: 2,
                extent: 2
            })
        );
    }

    #[test]
    #[should_panic(expected = "index 6 out of bounds for axis 1 with extent 6")]
    fn test_strict_index_panics() {
        let arr: NdArrayStrict<i32, Shape567> = NdArray::zeroed();
        let _ = arr[[0, 6, 0]];
    }

    #[test]
    fn test_permissive_in_range_never_fails() {
        let arr: NdArray<i32, Shape567> = NdArray::zeroed();
        for i in 0..5 {
            for j in 0..6 {
                for k in 0..7 {
                    assert!(arr.get([i, j, k]).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_unchecked_access() {
        let mut arr: NdArray<i32, (Const<2>, Const<2>)> = NdArray::zeroed();
        arr[[1, 1]] = 7;
        // In-range unchecked access observes the same slot as checked
        // access.
        assert_eq!(unsafe { *arr.get_unchecked([1, 1]) }, 7);
    }

    #[test]
    fn test_degenerate_extents() {
        let mut arr: NdArrayStrict<i32, (Const<1>, Const<3>, Const<1>)> = NdArray::zeroed();
        arr[[0, 2, 0]] = 9;
        assert_eq!(arr[[0, 2, 0]], 9);
        assert!(arr.get([1, 0, 0]).is_err());
        assert!(arr.get([0, 0, 1]).is_err());
    }

    #[test]
    fn test_from_and_macro() {
        let arr: NdArray<i32, (Const<2>, Const<2>)> = ndarray![[1, 2], [3, 4]];
        assert_eq!(arr.as_buf(), &[1, 2, 3, 4]);
        let arr: NdArray<i32, Const<3>> = ndarray![7, 8, 9];
        assert_eq!(arr[[1]], 8);
        let strict: NdArrayStrict<i32, (Const<2>, Const<2>)> = ndarray![[1, 2], [3, 4]];
        assert_eq!(strict[[1, 0]], 3);
    }

    #[test]
    fn test_shape_and_strides() {
        let arr: NdArray<i32, Shape567> = NdArray::zeroed();
        assert_eq!(arr.shape(), &[5, 6, 7]);
        assert_eq!(arr.strides(), &[42, 7, 1]);
    }

    #[test]
    fn test_eq_and_clone() {
        let a: NdArray<i32, (Const<2>, Const<2>)> = ndarray![[1, 2], [3, 4]];
        let b = a;
        assert_eq!(a, b);
        let c: NdArray<i32, (Const<2>, Const<2>)> = NdArray::zeroed();
        assert_ne!(a, c);
    }

    #[test]
    fn test_error_display() {
        let arr: NdArrayStrict<i32, Const<4>> = NdArray::zeroed();
        let err = arr.get([4]).unwrap_err();
        assert_eq!(
            std::format!("{}", err),
            "index 4 out of bounds for axis 0 with extent 4"
        );
    }
}
