use super::{
    common::{FloatValueType, ValueType},
    point::Point3,
    vector::Vec3,
};

/// A ray with an origin, a direction and a parametric extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<T>
where
    T: ValueType,
{
    /// The origin of the ray.
    pub o: Point3<T>,
    /// The direction of the ray.
    pub d: Vec3<T>,
    /// The maximum parametric distance of the ray.
    pub t_max: T,
}

impl<T> Ray<T>
where
    T: FloatValueType,
{
    /// Creates a new `Ray`.
    pub fn new(o: Point3<T>, d: Vec3<T>, t_max: T) -> Self {
        debug_assert!(!o.has_nans());
        debug_assert!(!d.has_nans());
        debug_assert!(!t_max.is_nan());

        Self { o, d, t_max }
    }

    /// Creates a new `Ray` with no upper bound on `t`.
    pub fn unbounded(o: Point3<T>, d: Vec3<T>) -> Self {
        Self::new(o, d, T::infinity())
    }

    /// Finds the [Point3] at `t` on this `Ray`.
    pub fn point(&self, t: T) -> Point3<T> {
        self.o + self.d * t
    }
}
