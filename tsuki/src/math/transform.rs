use std::ops::Mul;

use super::{
    bounds::Bounds3, common::FloatValueType, matrix::Matrix4x4, normal::Normal, point::Point3,
    ray::Ray, vector::Vec3,
};

/// A 3D transformation with its cached inverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform<T>
where
    T: FloatValueType,
{
    m: Matrix4x4<T>,
    m_inv: Matrix4x4<T>,
}

impl<T> Transform<T>
where
    T: FloatValueType,
{
    /// Creates a new `Transform` from `m`, returning `None` if `m` is not invertible.
    pub fn try_new(m: Matrix4x4<T>) -> Option<Self> {
        m.inverted().map(|m_inv| Self { m, m_inv })
    }

    /// Creates a new `Transform` from a matrix and its inverse.
    pub fn new_full(m: Matrix4x4<T>, m_inv: Matrix4x4<T>) -> Self {
        Self { m, m_inv }
    }

    /// Creates a new identity `Transform`.
    pub fn identity() -> Self {
        Self {
            m: Matrix4x4::identity(),
            m_inv: Matrix4x4::identity(),
        }
    }

    /// Returns the matrix of this `Transform`.
    pub fn m(&self) -> &Matrix4x4<T> {
        &self.m
    }

    /// Returns the inverse matrix of this `Transform`.
    pub fn m_inv(&self) -> &Matrix4x4<T> {
        &self.m_inv
    }

    /// Returns the inverse of this `Transform`.
    pub fn inverted(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Returns the inverse transpose of the upper 3x3 block, the matrix normals transform with.
    pub fn normal_matrix(&self) -> Matrix4x4<T> {
        self.m_inv.upper3x3().transposed()
    }
}

impl<T> Default for Transform<T>
where
    T: FloatValueType,
{
    fn default() -> Self {
        Self::identity()
    }
}

impl<'a, T> Mul<Vec3<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Vec3<T>;

    fn mul(self, v: Vec3<T>) -> Vec3<T> {
        let m = &self.m.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl<'a, T> Mul<Point3<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Point3<T>;

    fn mul(self, p: Point3<T>) -> Point3<T> {
        let m = &self.m.m;
        let xp = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let yp = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let zp = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let wp = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if wp == T::one() {
            Point3::new(xp, yp, zp)
        } else {
            Point3::new(xp, yp, zp) / wp
        }
    }
}

impl<'a, T> Mul<Normal<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Normal<T>;

    fn mul(self, n: Normal<T>) -> Normal<T> {
        let m_inv = &self.m_inv.m;
        // Inverse transpose through the accesses
        Normal::new(
            m_inv[0][0] * n.x + m_inv[1][0] * n.y + m_inv[2][0] * n.z,
            m_inv[0][1] * n.x + m_inv[1][1] * n.y + m_inv[2][1] * n.z,
            m_inv[0][2] * n.x + m_inv[1][2] * n.y + m_inv[2][2] * n.z,
        )
    }
}

impl<'a, T> Mul<Ray<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Ray<T>;

    fn mul(self, ray: Ray<T>) -> Ray<T> {
        Ray::new(self * ray.o, self * ray.d, ray.t_max)
    }
}

impl<'a, T> Mul<Bounds3<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Bounds3<T>;

    fn mul(self, bb: Bounds3<T>) -> Bounds3<T> {
        if bb.is_empty() {
            return bb;
        }

        let mut ret = Bounds3::default();
        for corner in 0..8 {
            let p = Point3::new(
                bb[corner & 1].x,
                bb[(corner >> 1) & 1].y,
                bb[(corner >> 2) & 1].z,
            );
            ret = ret.union_p(self * p);
        }
        ret
    }
}

impl<'a, 'b, T> Mul<&'b Transform<T>> for &'a Transform<T>
where
    T: FloatValueType,
{
    type Output = Transform<T>;

    fn mul(self, other: &'b Transform<T>) -> Transform<T> {
        Transform::new_full(&self.m * &other.m, &other.m_inv * &self.m_inv)
    }
}
