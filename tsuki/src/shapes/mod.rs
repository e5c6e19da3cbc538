mod cuboid;
mod mesh;
mod sphere;
mod square;
mod triangle;

pub use cuboid::Cuboid;
pub use mesh::{Face, Mesh, MeshError};
pub use sphere::Sphere;
pub use square::Square;
pub use triangle::Triangle;

use std::sync::Arc;

use crate::{
    hit::Hit,
    math::{Bounds3, Matrix4x4, Ray, Transform},
};

/// Surface that can be intersected in its local space.
pub trait Shape: Send + Sync {
    /// Intersects a local space `ray` with a unit length direction.
    ///
    /// Hits are accepted on `(RAY_EPSILON, ray.t_max)`. The returned [Hit] is in local space.
    fn intersect_local(&self, ray: Ray<f32>) -> Option<Hit>;
    /// Returns the local space AABB of this `Shape`.
    fn local_bound(&self) -> Bounds3<f32>;
}

/// A [Shape] placed in the world by its composed object-to-world [Transform].
#[derive(Clone)]
pub struct Geometry {
    shape: Arc<dyn Shape>,
    to_world: Transform<f32>,
    normal_matrix: Matrix4x4<f32>,
    world_bound: Bounds3<f32>,
}

impl Geometry {
    pub fn new(shape: Arc<dyn Shape>, to_world: Transform<f32>) -> Self {
        Self::with_normal_matrix(shape, to_world, to_world.normal_matrix())
    }

    /// Creates a new `Geometry` with a precomputed `normal_matrix` of `to_world`.
    pub fn with_normal_matrix(
        shape: Arc<dyn Shape>,
        to_world: Transform<f32>,
        normal_matrix: Matrix4x4<f32>,
    ) -> Self {
        let world_bound = &to_world * shape.local_bound();
        Self {
            shape,
            to_world,
            normal_matrix,
            world_bound,
        }
    }

    /// Returns the world space AABB of this `Geometry`.
    pub fn world_bound(&self) -> Bounds3<f32> {
        self.world_bound
    }

    /// Returns the object-to-world [Transform] of this `Geometry`.
    pub fn to_world(&self) -> &Transform<f32> {
        &self.to_world
    }

    /// Intersects a world space `ray` with this `Geometry`.
    ///
    /// The returned `t` is in the units of `ray.d` and `n` is a unit length world space normal.
    pub fn intersect(&self, ray: Ray<f32>) -> Option<Hit> {
        self.world_bound.intersections(ray)?;

        let local = &self.to_world.inverted() * ray;
        let len = local.d.len();
        if len == 0.0 {
            return None;
        }
        let local = Ray::new(local.o, local.d / len, ray.t_max * len);

        let mut hit = self.shape.intersect_local(local)?;
        hit.t /= len;
        hit.p = ray.point(hit.t);
        hit.n = (&self.normal_matrix * hit.n).normalized();
        Some(hit)
    }
}

/// Finds the closest hit of `ray` in `objects` by testing each one.
///
/// The hit's `object` is its index in `objects`.
pub fn intersect_linear(objects: &[Geometry], mut ray: Ray<f32>) -> Option<Hit> {
    let mut closest = None;
    for (i, object) in objects.iter().enumerate() {
        if let Some(mut hit) = object.intersect(ray) {
            // Later tests only accept closer hits
            ray.t_max = hit.t;
            hit.object = i;
            closest = Some(hit);
        }
    }
    closest
}
