use super::Shape;
use crate::{
    hit::{Hit, RAY_EPSILON},
    materials::Material,
    math::{normal, point2, point3, Bounds3, Ray},
};

/// A unit square on the local z = 0 plane, centered at the origin and facing +z.
pub struct Square {
    material: Material,
}

impl Square {
    pub fn new(material: Material) -> Self {
        Self { material }
    }
}

impl Shape for Square {
    fn intersect_local(&self, ray: Ray<f32>) -> Option<Hit> {
        if ray.d.z.abs() < RAY_EPSILON {
            return None;
        }

        let t = -ray.o.z / ray.d.z;
        if t <= RAY_EPSILON || t >= ray.t_max {
            return None;
        }

        let p = ray.point(t);
        if p.x.abs() > 0.5 || p.y.abs() > 0.5 {
            return None;
        }

        Some(Hit {
            t,
            p: point3(p.x, p.y, 0.0),
            n: normal(0.0, 0.0, 1.0),
            bary: [1.0, 0.0, 0.0],
            uv: point2(p.x + 0.5, p.y + 0.5),
            material: self.material.clone(),
            object: 0,
        })
    }

    fn local_bound(&self) -> Bounds3<f32> {
        // Flat on z, which union and slab tests handle
        Bounds3::new(point3(-0.5, -0.5, 0.0), point3(0.5, 0.5, 0.0))
    }
}
