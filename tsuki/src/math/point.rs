use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::{
    common::{FloatValueType, ValueType},
    vector::{Vec2, Vec3},
};

/// A two-dimensional point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point2<T>
where
    T: ValueType,
{
    /// The x component of the point.
    pub x: T,
    /// The y component of the point.
    pub y: T,
}

/// A three-dimensional point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point3<T>
where
    T: ValueType,
{
    /// The x component of the point.
    pub x: T,
    /// The y component of the point.
    pub y: T,
    /// The z component of the point.
    pub z: T,
}

impl_vec_like!(Point2 [0 => x, 1 => y]);
impl_vec_like!(Point3 [0 => x, 1 => y, 2 => z]);
// Weighted sums of points, e.g. barycentric interpolation
impl_binop!(Add add Point2 [x y]);
impl_binop!(Add add Point3 [x y z]);

/// Shorthand constructor
#[inline]
pub fn point2<T: ValueType>(x: T, y: T) -> Point2<T> {
    Point2::new(x, y)
}

/// Shorthand constructor
#[inline]
pub fn point3<T: ValueType>(x: T, y: T, z: T) -> Point3<T> {
    Point3::new(x, y, z)
}

macro_rules! impl_point_vec_ops {
    ( $point:ident $vec:ident [ $( $c:ident )+ ] ) => {
        impl<T> Add<$vec<T>> for $point<T>
        where
            T: ValueType,
        {
            type Output = Self;

            #[inline]
            fn add(self, v: $vec<T>) -> Self {
                Self {
                    $($c: self.$c + v.$c,)*
                }
            }
        }

        impl<T> AddAssign<$vec<T>> for $point<T>
        where
            T: ValueType,
        {
            #[inline]
            fn add_assign(&mut self, v: $vec<T>) {
                $(self.$c += v.$c;)*
            }
        }

        impl<T> Sub<$vec<T>> for $point<T>
        where
            T: ValueType,
        {
            type Output = Self;

            #[inline]
            fn sub(self, v: $vec<T>) -> Self {
                Self {
                    $($c: self.$c - v.$c,)*
                }
            }
        }

        impl<T> SubAssign<$vec<T>> for $point<T>
        where
            T: ValueType,
        {
            #[inline]
            fn sub_assign(&mut self, v: $vec<T>) {
                $(self.$c -= v.$c;)*
            }
        }

        impl<T> Sub for $point<T>
        where
            T: ValueType,
        {
            type Output = $vec<T>;

            #[inline]
            fn sub(self, other: Self) -> $vec<T> {
                $vec {
                    $($c: self.$c - other.$c,)*
                }
            }
        }
    };
}
impl_point_vec_ops!(Point2 Vec2 [x y]);
impl_point_vec_ops!(Point3 Vec3 [x y z]);

impl<T> Point3<T>
where
    T: FloatValueType,
{
    /// Calculates the distance between this `Point3` and another `Point3`.
    #[inline]
    pub fn dist(&self, other: Self) -> T {
        (*self - other).len()
    }

    /// Calculates the squared distance between this `Point3` and another `Point3`.
    #[inline]
    pub fn dist_sqr(&self, other: Self) -> T {
        (*self - other).len_sqr()
    }
}

impl<T> From<Vec3<T>> for Point3<T>
where
    T: ValueType,
{
    fn from(v: Vec3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
