use crate::{
    hit::{spawn_ray, RAY_OFFSET},
    integrators::{IntegratorRay, RayType},
    math::{Point3, Spectrum, Vec3},
    scene::Scene,
};

/// Shadow query from a point toward a light.
pub struct VisibilityTester {
    p: Point3<f32>,
    l: Vec3<f32>,
    dist: f32,
    color: Spectrum<f32>,
}

impl VisibilityTester {
    /// Creates a new `VisibilityTester` from `p` along unit `l` for a light `dist` away.
    pub fn new(p: Point3<f32>, l: Vec3<f32>, dist: f32, color: Spectrum<f32>) -> Self {
        Self { p, l, dist, color }
    }

    /// Returns the light color as it arrives at the point.
    ///
    /// Each occluder between the point and the light filters the color by its transmission
    /// at the hit. Occluders at or past the light are ignored. Shadow rays are appended to
    /// `rays` if given.
    ///
    /// Every relay moves past the occluder it hit, so the walk ends once the remaining distance
    /// runs out or the ray escapes the scene.
    pub fn attenuation(
        &self,
        scene: &Scene,
        mut rays: Option<&mut Vec<IntegratorRay>>,
    ) -> Spectrum<f32> {
        let mut filter = self.color;
        let mut p = self.p;
        let mut dist = self.dist;

        loop {
            let t_max = dist - RAY_OFFSET;
            if t_max <= 0.0 {
                return filter;
            }

            let ray = spawn_ray(p, self.l, t_max);
            if let Some(rays) = rays.as_deref_mut() {
                rays.push(IntegratorRay {
                    ray,
                    ray_type: RayType::Shadow,
                });
            }

            match scene.intersect(ray) {
                Some(hit) => {
                    filter *= hit.material.kt;
                    if filter.is_black() {
                        return filter;
                    }
                    // Continue from the occluder toward the light
                    dist -= hit.t + RAY_OFFSET;
                    p = hit.p;
                }
                None => return filter,
            }
        }
    }
}
