use serde::{Deserialize, Serialize};

use super::{
    common::{FloatValueType, ValueType},
    normal::Normal,
    point::Point3,
};

/// A two-dimensional vector.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Vec2<T>
where
    T: ValueType,
{
    /// The x component of the vector.
    pub x: T,
    /// The y component of the vector.
    pub y: T,
}

/// A three-dimensional vector.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Vec3<T>
where
    T: ValueType,
{
    /// The x component of the vector.
    pub x: T,
    /// The y component of the vector.
    pub y: T,
    /// The z component of the vector.
    pub z: T,
}

impl_vec_like!(Vec2 [0 => x, 1 => y]);
impl_vec_like!(Vec3 [0 => x, 1 => y, 2 => z]);
impl_binop!(Add add Vec2 [x y]);
impl_binop!(Sub sub Vec2 [x y]);
impl_binop!(Add add Vec3 [x y z]);
impl_binop!(Sub sub Vec3 [x y z]);
impl_assign_op!(AddAssign add_assign Vec2 [x y]);
impl_assign_op!(SubAssign sub_assign Vec2 [x y]);
impl_assign_op!(AddAssign add_assign Vec3 [x y z]);
impl_assign_op!(SubAssign sub_assign Vec3 [x y z]);

/// Shorthand constructor
#[inline]
pub fn vec2<T: ValueType>(x: T, y: T) -> Vec2<T> {
    Vec2::new(x, y)
}

/// Shorthand constructor
#[inline]
pub fn vec3<T: ValueType>(x: T, y: T, z: T) -> Vec3<T> {
    Vec3::new(x, y, z)
}

impl<T> Vec2<T>
where
    T: ValueType,
{
    /// Calculates the dot product of this `Vec2` and another `Vec2`.
    #[inline]
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Calculates the squared length of this `Vec2`.
    #[inline]
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }
}

impl<T> Vec3<T>
where
    T: ValueType,
{
    /// Calculates the dot product of this `Vec3` and another `Vec3`.
    #[inline]
    pub fn dot(&self, other: Self) -> T {
        debug_assert!(!self.has_nans());
        debug_assert!(!other.has_nans());

        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculates the squared length of this `Vec3`.
    #[inline]
    pub fn len_sqr(&self) -> T {
        self.dot(*self)
    }

    /// Finds the value of the minimum component in this `Vec3`.
    #[inline]
    pub fn min_comp(&self) -> T {
        debug_assert!(!self.has_nans());

        self.x.mini(self.y.mini(self.z))
    }

    /// Finds the value of the maximum component in this `Vec3`.
    #[inline]
    pub fn max_comp(&self) -> T {
        debug_assert!(!self.has_nans());

        self.x.maxi(self.y.maxi(self.z))
    }

    /// Finds the index of the maximum component in this `Vec3`.
    #[inline]
    pub fn max_dimension(&self) -> usize {
        debug_assert!(!self.has_nans());

        if self.x > self.y {
            if self.x > self.z {
                0
            } else {
                2
            }
        } else if self.y > self.z {
            1
        } else {
            2
        }
    }

    /// Returns the component-wise product of this `Vec3` and another `Vec3`.
    #[inline]
    pub fn mul_elem(&self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }
}

impl<T> Vec3<T>
where
    T: FloatValueType,
{
    /// Calculates the length of this `Vec3`.
    #[inline]
    pub fn len(&self) -> T {
        self.len_sqr().sqrt()
    }

    /// Returns the normalized version of this `Vec3`.
    #[inline]
    pub fn normalized(&self) -> Self {
        *self / self.len()
    }

    /// Returns the component-wise absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Calculates the dot product of this `Vec3` and a [Normal].
    #[inline]
    pub fn dot_n(&self, n: Normal<T>) -> T {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    /// Calculates the cross product of this `Vec3` and another `Vec3`.
    //
    // Evaluated in f64 to dodge catastrophic cancellation.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        debug_assert!(!self.has_nans());
        debug_assert!(!other.has_nans());

        let v1x = self.x.to_f64().unwrap_or(f64::NAN);
        let v1y = self.y.to_f64().unwrap_or(f64::NAN);
        let v1z = self.z.to_f64().unwrap_or(f64::NAN);
        let v2x = other.x.to_f64().unwrap_or(f64::NAN);
        let v2y = other.y.to_f64().unwrap_or(f64::NAN);
        let v2z = other.z.to_f64().unwrap_or(f64::NAN);
        Self {
            x: T::from_f64((v1y * v2z) - (v1z * v2y)).unwrap_or_else(T::nan),
            y: T::from_f64((v1z * v2x) - (v1x * v2z)).unwrap_or_else(T::nan),
            z: T::from_f64((v1x * v2y) - (v1y * v2x)).unwrap_or_else(T::nan),
        }
    }

    /// Reflects this direction about `n`.
    #[inline]
    pub fn reflected(&self, n: Normal<T>) -> Self {
        let n = Vec3::from(n);
        *self - n * (self.dot(n) + self.dot(n))
    }
}

impl<T> From<Normal<T>> for Vec3<T>
where
    T: ValueType,
{
    fn from(n: Normal<T>) -> Self {
        Self::new(n.x, n.y, n.z)
    }
}

impl<T> From<Point3<T>> for Vec3<T>
where
    T: ValueType,
{
    fn from(p: Point3<T>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}
