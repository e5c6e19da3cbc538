use std::f32::consts::PI;

use super::Shape;
use crate::{
    hit::{Hit, RAY_EPSILON},
    materials::Material,
    math::{point2, Bounds3, Normal, Point3, Ray, Vec3},
};

/// A unit sphere at the local origin.
pub struct Sphere {
    material: Material,
}

impl Sphere {
    pub fn new(material: Material) -> Self {
        Self { material }
    }
}

impl Shape for Sphere {
    fn intersect_local(&self, ray: Ray<f32>) -> Option<Hit> {
        // |o + td|^2 = 1 with |d| = 1
        let o = Vec3::from(ray.o);
        let b = o.dot(ray.d);
        let c = o.len_sqr() - 1.0;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t_near = -b - root;
        let t_far = -b + root;
        let t = if t_near > RAY_EPSILON {
            t_near
        } else if t_far > RAY_EPSILON {
            t_far
        } else {
            return None;
        };
        if t >= ray.t_max {
            return None;
        }

        let p = ray.point(t);
        let n = Normal::from(Vec3::from(p)).normalized();
        let uv = point2(
            0.5 + p.z.atan2(p.x) / (2.0 * PI),
            p.y.clamp(-1.0, 1.0).acos() / PI,
        );

        Some(Hit {
            t,
            p,
            n,
            bary: [1.0, 0.0, 0.0],
            uv,
            material: self.material.clone(),
            object: 0,
        })
    }

    fn local_bound(&self) -> Bounds3<f32> {
        Bounds3::new(Point3::from(-1.0), Point3::from(1.0))
    }
}
