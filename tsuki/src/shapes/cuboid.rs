use super::Shape;
use crate::{
    hit::{Hit, RAY_EPSILON},
    materials::Material,
    math::{Bounds3, Normal, Point2, Point3, Ray},
};

/// A unit cube centered at the local origin.
pub struct Cuboid {
    material: Material,
}

impl Cuboid {
    pub fn new(material: Material) -> Self {
        Self { material }
    }
}

impl Shape for Cuboid {
    fn intersect_local(&self, ray: Ray<f32>) -> Option<Hit> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut near_axis = 0;
        let mut far_axis = 0;
        for axis in 0..3 {
            let d = ray.d[axis];
            let o = ray.o[axis];
            if d.abs() < RAY_EPSILON {
                // Parallel to the slab
                if o.abs() > 0.5 {
                    return None;
                }
                continue;
            }

            let mut t0 = (-0.5 - o) / d;
            let mut t1 = (0.5 - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
            }
            if t1 < t_far {
                t_far = t1;
                far_axis = axis;
            }
            if t_near > t_far {
                return None;
            }
        }

        // Rays starting inside hit the exit face
        let (t, axis) = if t_near > RAY_EPSILON {
            (t_near, near_axis)
        } else if t_far > RAY_EPSILON {
            (t_far, far_axis)
        } else {
            return None;
        };
        if t >= ray.t_max {
            return None;
        }

        let p = ray.point(t);
        let mut n = Normal::zeros();
        n[axis] = if p[axis] > 0.0 { 1.0 } else { -1.0 };
        let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
        let uv = Point2::new(p[u_axis] + 0.5, p[v_axis] + 0.5);

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
        Bounds3::new(Point3::from(-0.5), Point3::from(0.5))
    }
}
