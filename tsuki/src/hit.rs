use crate::{
    materials::Material,
    math::{Normal, Point2, Point3, Ray, Vec3},
};

/// Closest distance a local intersection is accepted at.
pub const RAY_EPSILON: f32 = 1e-5;

/// Distance secondary rays are pushed along their direction to escape the surface they start on.
pub const RAY_OFFSET: f32 = 1e-4;

/// Length given to rays that hit nothing when they are collected for debugging.
pub const NO_HIT_T: f32 = 1000.0;

/// A surface intersection.
#[derive(Clone, Debug)]
pub struct Hit {
    /// Distance along the ray, in the units of the ray's direction.
    pub t: f32,
    /// Hit position.
    pub p: Point3<f32>,
    /// Unit length surface normal.
    pub n: Normal<f32>,
    /// Barycentric weights of the hit for triangles, `[1, 0, 0]` for other shapes.
    pub bary: [f32; 3],
    /// Surface coordinates at the hit.
    pub uv: Point2<f32>,
    /// Resolved, possibly interpolated, material at the hit.
    pub material: Material,
    /// Index of the hit object in the queried object list.
    pub object: usize,
}

impl Hit {
    /// Spawns a new ray from this `Hit` into direction `d`.
    pub fn spawn_ray(&self, d: Vec3<f32>) -> Ray<f32> {
        spawn_ray(self.p, d, f32::INFINITY)
    }
}

/// Spawns a ray from `p` into unit direction `d`, offset along `d` so that it misses the surface at `p`.
pub fn spawn_ray(p: Point3<f32>, d: Vec3<f32>, t_max: f32) -> Ray<f32> {
    Ray::new(p + d * RAY_OFFSET, d, t_max)
}
