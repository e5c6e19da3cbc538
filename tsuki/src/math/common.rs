use num::traits::{Float, FromPrimitive, Num, NumCast, ToPrimitive};
use std::{
    fmt::Debug,
    ops::{AddAssign, DivAssign, MulAssign, SubAssign},
};

/// Generic types that can be stored in the math containers
pub trait ValueType:
    Num
    + Mini
    + Maxi
    + PartialOrd
    + ToPrimitive
    + FromPrimitive
    + NumCast
    + Copy
    + Debug
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
}

/// Floating point types that geometry is evaluated in
pub trait FloatValueType: ValueType + Float {}

impl<T> ValueType for T where
    T: Num
        + Mini
        + Maxi
        + PartialOrd
        + ToPrimitive
        + FromPrimitive
        + NumCast
        + Copy
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
{
}
impl<T> FloatValueType for T where T: ValueType + Float {}

/// Minimum that is defined for both floats and integers.
pub trait Mini {
    /// Returns the smaller of `self` and `other`.
    fn mini(&self, other: Self) -> Self;
}

/// Maximum that is defined for both floats and integers.
pub trait Maxi {
    /// Returns the larger of `self` and `other`.
    fn maxi(&self, other: Self) -> Self;
}

macro_rules! impl_mini_maxi {
    ( $( $t:ty ),+ ) => {
        $(
            impl Mini for $t {
                #[inline]
                fn mini(&self, other: $t) -> $t {
                    if *self < other { *self } else { other }
                }
            }

            impl Maxi for $t {
                #[inline]
                fn maxi(&self, other: $t) -> $t {
                    if *self > other { *self } else { other }
                }
            }
        )*
    }
}
impl_mini_maxi!(f32, f64, u8, u16, u32, u64, usize, i8, i16, i32, i64);

/// Returns `2` in `T`.
#[inline]
pub fn two<T: ValueType>() -> T {
    T::one() + T::one()
}

/// Returns `0.5` in `T`.
#[inline]
pub fn half<T: FloatValueType>() -> T {
    T::one() / two()
}
