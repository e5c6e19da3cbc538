use super::{
    common::{FloatValueType, ValueType},
    vector::Vec3,
};

/// A three-dimensional surface normal.
///
/// Kept apart from [Vec3] since normals transform with the inverse transpose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normal<T>
where
    T: ValueType,
{
    /// The x component of the normal.
    pub x: T,
    /// The y component of the normal.
    pub y: T,
    /// The z component of the normal.
    pub z: T,
}

impl_vec_like!(Normal [0 => x, 1 => y, 2 => z]);
impl_binop!(Add add Normal [x y z]);
impl_binop!(Sub sub Normal [x y z]);
impl_assign_op!(AddAssign add_assign Normal [x y z]);

/// Shorthand constructor
#[inline]
pub fn normal<T: ValueType>(x: T, y: T, z: T) -> Normal<T> {
    Normal::new(x, y, z)
}

impl<T> Normal<T>
where
    T: FloatValueType,
{
    /// Calculates the dot product of this `Normal` and a [Vec3].
    #[inline]
    pub fn dot_v(&self, v: Vec3<T>) -> T {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Calculates the dot product of this `Normal` and another `Normal`.
    #[inline]
    pub fn dot(&self, n: Self) -> T {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    /// Calculates the length of this `Normal`.
    #[inline]
    pub fn len(&self) -> T {
        self.dot(*self).sqrt()
    }

    /// Returns the normalized version of this `Normal`.
    #[inline]
    pub fn normalized(&self) -> Self {
        *self / self.len()
    }
}

impl<T> From<Vec3<T>> for Normal<T>
where
    T: ValueType,
{
    fn from(v: Vec3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
