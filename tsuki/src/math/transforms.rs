use super::{
    common::FloatValueType, matrix::Matrix4x4, point::Point3, transform::Transform, vector::Vec3,
};

/// Creates a new `Transform` that is a translation by `delta`.
pub fn translation<T>(delta: Vec3<T>) -> Transform<T>
where
    T: FloatValueType,
{
    let mut m = Matrix4x4::identity();
    let mut m_inv = Matrix4x4::identity();
    for i in 0..3 {
        m.m[i][3] = delta[i];
        m_inv.m[i][3] = -delta[i];
    }

    Transform::new_full(m, m_inv)
}

/// Creates a new `Transform` that is a scaling by `x`, `y` and `z`.
///
/// Panics if any of the factors is zero.
pub fn scale<T>(x: T, y: T, z: T) -> Transform<T>
where
    T: FloatValueType,
{
    assert!(
        x != T::zero() && y != T::zero() && z != T::zero(),
        "Scale with a zero factor is not invertible"
    );

    let factors = [x, y, z];
    let mut m = Matrix4x4::identity();
    let mut m_inv = Matrix4x4::identity();
    for (i, &f) in factors.iter().enumerate() {
        m.m[i][i] = f;
        m_inv.m[i][i] = T::one() / f;
    }

    Transform::new_full(m, m_inv)
}

/// Creates a new `Transform` that is a rotation of `theta` radians around `axis`.
pub fn rotation<T>(theta: T, axis: Vec3<T>) -> Transform<T>
where
    T: FloatValueType,
{
    let a = axis.normalized();
    let c = theta.cos();
    let s = theta.sin();
    let t = T::one() - c;
    let m = Matrix4x4::new([
        [
            t * a.x * a.x + c,
            t * a.x * a.y - s * a.z,
            t * a.x * a.z + s * a.y,
            T::zero(),
        ],
        [
            t * a.x * a.y + s * a.z,
            t * a.y * a.y + c,
            t * a.y * a.z - s * a.x,
            T::zero(),
        ],
        [
            t * a.x * a.z - s * a.y,
            t * a.y * a.z + s * a.x,
            t * a.z * a.z + c,
            T::zero(),
        ],
        [T::zero(), T::zero(), T::zero(), T::one()],
    ]);

    // Rotations are orthonormal
    Transform::new_full(m, m.transposed())
}

/// Creates a new `Transform` that is a rotation of `theta` radians around the x-axis.
pub fn rotation_x<T>(theta: T) -> Transform<T>
where
    T: FloatValueType,
{
    rotation(theta, Vec3::new(T::one(), T::zero(), T::zero()))
}

/// Creates a new `Transform` that is a rotation of `theta` radians around the y-axis.
pub fn rotation_y<T>(theta: T) -> Transform<T>
where
    T: FloatValueType,
{
    rotation(theta, Vec3::new(T::zero(), T::one(), T::zero()))
}

/// Creates a new `Transform` that is a rotation of `theta` radians around the z-axis.
pub fn rotation_z<T>(theta: T) -> Transform<T>
where
    T: FloatValueType,
{
    rotation(theta, Vec3::new(T::zero(), T::zero(), T::one()))
}

/// Creates a camera-to-world [`Transform`] with the camera at `pos` looking at `target`.
///
/// The camera looks down its local -z with +y up and +x right.
/// Returns `None` if the view direction is degenerate or parallel to `up`.
pub fn look_at<T>(pos: Point3<T>, target: Point3<T>, up: Vec3<T>) -> Option<Transform<T>>
where
    T: FloatValueType,
{
    let forward = target - pos;
    if forward.len_sqr() == T::zero() {
        return None;
    }
    let forward = forward.normalized();
    let right = forward.cross(up);
    if right.len_sqr() <= T::epsilon() {
        return None;
    }
    let right = right.normalized();
    let new_up = right.cross(forward);
    let back = -forward;

    let camera_to_world = Matrix4x4::new([
        [right.x, new_up.x, back.x, pos.x],
        [right.y, new_up.y, back.y, pos.y],
        [right.z, new_up.z, back.z, pos.z],
        [T::zero(), T::zero(), T::zero(), T::one()],
    ]);
    // Orthonormal basis so the inverse is [R^T | -R^T p]
    let p = Vec3::from(pos);
    let world_to_camera = Matrix4x4::new([
        [right.x, right.y, right.z, -right.dot(p)],
        [new_up.x, new_up.y, new_up.z, -new_up.dot(p)],
        [back.x, back.y, back.z, -back.dot(p)],
        [T::zero(), T::zero(), T::zero(), T::one()],
    ]);

    Some(Transform::new_full(camera_to_world, world_to_camera))
}
