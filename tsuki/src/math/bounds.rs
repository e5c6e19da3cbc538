use num::Integer;
use std::ops::{Index, IndexMut};

use super::{
    common::{FloatValueType, ValueType},
    point::{Point2, Point3},
    ray::Ray,
    vector::{Vec2, Vec3},
};

/// Two-dimensional bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2<T>
where
    T: ValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Point2<T>,
    /// The maximum extent of the bounds.
    pub p_max: Point2<T>,
}

/// Three-dimensional axis-aligned bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T>
where
    T: ValueType,
{
    /// The minimum extent of the bounds.
    pub p_min: Point3<T>,
    /// The maximum extent of the bounds.
    pub p_max: Point3<T>,
}

macro_rules! impl_bounds {
    ( $bounds:ident $point:ident $vec:ident [ $( $c:ident )+ ] ) => {
        impl<T> $bounds<T>
        where
            T: ValueType,
        {
            /// Creates new bounds that span `p0` and `p1` in any order.
            #[inline]
            pub fn new(p0: $point<T>, p1: $point<T>) -> Self {
                Self {
                    p_min: p0.min(p1),
                    p_max: p0.max(p1),
                }
            }

            /// Returns the vector from `p_min` to `p_max`.
            #[inline]
            pub fn diagonal(&self) -> $vec<T> {
                self.p_max - self.p_min
            }

            /// Returns bounds that contain both these bounds and `p`.
            #[inline]
            pub fn union_p(&self, p: $point<T>) -> Self {
                Self {
                    p_min: self.p_min.min(p),
                    p_max: self.p_max.max(p),
                }
            }

            /// Returns bounds that contain both these bounds and `other`.
            #[inline]
            pub fn union_b(&self, other: Self) -> Self {
                Self {
                    p_min: self.p_min.min(other.p_min),
                    p_max: self.p_max.max(other.p_max),
                }
            }

            /// Checks if `p` is inside these bounds, inclusive.
            #[inline]
            pub fn inside(&self, p: $point<T>) -> bool {
                self.p_min.min(p) == self.p_min && self.p_max.max(p) == self.p_max
            }

            /// Checks if `other` is completely contained by these bounds.
            #[inline]
            pub fn contains(&self, other: Self) -> bool {
                other.is_empty() || (self.inside(other.p_min) && self.inside(other.p_max))
            }

            /// Checks if these bounds contain no points.
            #[inline]
            pub fn is_empty(&self) -> bool {
                $(self.p_min.$c > self.p_max.$c)||*
            }
        }

        impl<T> Index<usize> for $bounds<T>
        where
            T: ValueType,
        {
            type Output = $point<T>;

            fn index(&self, i: usize) -> &$point<T> {
                match i {
                    0 => &self.p_min,
                    1 => &self.p_max,
                    _ => panic!("{}: Out of bounds access {}", stringify!($bounds), i),
                }
            }
        }

        impl<T> IndexMut<usize> for $bounds<T>
        where
            T: ValueType,
        {
            fn index_mut(&mut self, i: usize) -> &mut $point<T> {
                match i {
                    0 => &mut self.p_min,
                    1 => &mut self.p_max,
                    _ => panic!("{}: Out of bounds access {}", stringify!($bounds), i),
                }
            }
        }
    };
}
impl_bounds!(Bounds2 Point2 Vec2 [x y]);
impl_bounds!(Bounds3 Point3 Vec3 [x y z]);

impl<T> Bounds2<T>
where
    T: ValueType,
{
    /// Calculates the area of this `Bounds2`
    #[inline]
    pub fn area(&self) -> T {
        let d = self.diagonal();
        d.x * d.y
    }
}

/// A row-by-row iterator over the [Point2]s in a `Bounds2`.
/// Starts from `p_min` and excludes the upper bounds.
pub struct Bounds2IntoIter<T>
where
    T: ValueType + Integer,
{
    bb: Bounds2<T>,
    curr: Point2<T>,
}

impl<T> IntoIterator for Bounds2<T>
where
    T: ValueType + Integer,
{
    type Item = Point2<T>;
    type IntoIter = Bounds2IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        // Empty bounds start past the end
        let curr = if self.p_min.x < self.p_max.x {
            self.p_min
        } else {
            Point2::new(self.p_min.x, self.p_max.y)
        };
        Bounds2IntoIter { bb: self, curr }
    }
}

impl<T> Iterator for Bounds2IntoIter<T>
where
    T: ValueType + Integer,
{
    type Item = Point2<T>;

    fn next(&mut self) -> Option<Self::Item> {
        // We exclude the max bound
        if self.curr.y >= self.bb.p_max.y {
            return None;
        }

        let ret = self.curr;
        self.curr.x += T::one();
        if self.curr.x >= self.bb.p_max.x {
            self.curr.x = self.bb.p_min.x;
            self.curr.y += T::one();
        }

        Some(ret)
    }
}

impl<T> Bounds3<T>
where
    T: ValueType,
{
    /// Calculates the surface area of this `Bounds3`
    #[inline]
    pub fn surface_area(&self) -> T {
        let d = self.diagonal();
        let two = T::one() + T::one();
        two * (d.x * d.y + d.z * d.y + d.x * d.z)
    }

    /// Finds the axis with the largest extent in this `Bounds3`
    #[inline]
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }
}

impl<T> Bounds3<T>
where
    T: FloatValueType,
{
    /// Returns the center point of this `Bounds3`
    #[inline]
    pub fn center(&self) -> Point3<T> {
        let two = T::one() + T::one();
        (self.p_min + self.p_max) / two
    }

    /// Finds the parametric interval `ray` spends inside this `Bounds3`.
    ///
    /// The interval is clipped to `[0, ray.t_max]` and `None` is returned if it is empty.
    pub fn intersections(&self, ray: Ray<T>) -> Option<(T, T)> {
        if self.is_empty() {
            return None;
        }

        let mut t0 = T::zero();
        let mut t1 = ray.t_max;
        for i in 0..3 {
            let inv_d = T::one() / ray.d[i];
            let mut t_near = (self.p_min[i] - ray.o[i]) * inv_d;
            let mut t_far = (self.p_max[i] - ray.o[i]) * inv_d;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // Parallel rays on the slab plane produce NaNs, which are ignored here
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

impl<T> Default for Bounds3<T>
where
    T: FloatValueType,
{
    /// Creates empty bounds that any union absorbs.
    fn default() -> Self {
        Self {
            p_min: Point3::from(T::max_value()),
            p_max: Point3::from(T::min_value()),
        }
    }
}
