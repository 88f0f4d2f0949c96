//! Element and field traits shared by every matrix shape.
use core::ops::{Add, Div, Mul, Neg, Sub};

use approx::RelativeEq;
use num_traits::{One, Zero};

/// Marker for element types storable in a matrix: plain copyable values
/// with a zero-equivalent default.
pub trait Elem: Copy + Default {}
impl<T: Copy + Default> Elem for T {}

/// A set of scalars closed under the four arithmetic operators.
pub trait Field:
    Elem
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
}

macro_rules! impl_field {
    ($($t:ty),+) => {
        $(
            impl Field for $t {
                fn zero() -> Self {
                    <$t as Zero>::zero()
                }

                fn one() -> Self {
                    <$t as One>::one()
                }
            }
        )+
    };
}

impl_field!(f32, f64, i16, i32, i64, u16, u32, u64);

/// Scalars with a real square root, required by the norm family of
/// operations.
pub trait RealField: Field + Neg<Output = Self> + RelativeEq<Epsilon = Self> {
    /// Relative tolerance under which a vector norm counts as zero.
    const NORM_TOLERANCE: Self;

    fn sqrt(self) -> Self;
}

impl RealField for f32 {
    const NORM_TOLERANCE: Self = 1e-5;

    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
}

impl RealField for f64 {
    const NORM_TOLERANCE: Self = 1e-5;

    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
}
