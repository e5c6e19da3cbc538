use super::{common::ValueType, vector::Vec3};

/// An RGB triple of radiance or reflectance
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spectrum<T>
where
    T: ValueType,
{
    /// The r component
    pub r: T,
    /// The g component
    pub g: T,
    /// The b component
    pub b: T,
}

impl_vec_like!(Spectrum [0 => r, 1 => g, 2 => b]);
impl_binop!(Add add Spectrum [r g b]);
impl_binop!(Sub sub Spectrum [r g b]);
impl_binop!(Mul mul Spectrum [r g b]);
impl_assign_op!(AddAssign add_assign Spectrum [r g b]);
impl_assign_op!(MulAssign mul_assign Spectrum [r g b]);

/// Shorthand constructor
#[inline]
pub fn spectrum<T: ValueType>(r: T, g: T, b: T) -> Spectrum<T> {
    Spectrum::new(r, g, b)
}

impl<T> Spectrum<T>
where
    T: ValueType,
{
    /// Checks if all components are zero
    #[inline]
    pub fn is_black(&self) -> bool {
        self.r == T::zero() && self.g == T::zero() && self.b == T::zero()
    }

    /// Returns the largest component
    #[inline]
    pub fn max_comp(&self) -> T {
        self.r.maxi(self.g.maxi(self.b))
    }

    /// Clamps every component into `[min, max]`
    #[inline]
    pub fn clamped(&self, min: T, max: T) -> Self {
        Self {
            r: self.r.maxi(min).mini(max),
            g: self.g.maxi(min).mini(max),
            b: self.b.maxi(min).mini(max),
        }
    }
}

impl<T> From<Vec3<T>> for Spectrum<T>
where
    T: ValueType,
{
    fn from(v: Vec3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
