use serde::{Deserialize, Serialize};

use super::{debug_ray, Integrator, RadianceResult, RayType};
use crate::{
    hit::Hit,
    math::{Normal, Ray, Spectrum, Vec3},
    scene::Scene,
};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Params {
    pub max_depth: u32,
    /// Rays that miss sample the scene's environment map if it has one.
    pub use_environment_map: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_depth: 5,
            use_environment_map: false,
        }
    }
}

/// Recursive ray tracer with local Phong shading, mirror reflection and refraction.
pub struct Whitted {
    max_depth: u32,
    use_environment_map: bool,
}

impl Whitted {
    pub fn new(params: Params) -> Self {
        Self {
            max_depth: params.max_depth,
            use_environment_map: params.use_environment_map,
        }
    }

    fn miss(&self, ray: &Ray<f32>, scene: &Scene) -> Spectrum<f32> {
        match &scene.environment {
            Some(env) if self.use_environment_map => env.sample(ray.d),
            _ => scene.background,
        }
    }
}

impl Integrator for Whitted {
    fn li(&self, ray: Ray<f32>, scene: &Scene, depth: u32, collect_rays: bool) -> RadianceResult {
        let hit = scene.intersect(ray);

        let mut collected_rays = Vec::new();
        if collect_rays {
            collected_rays.push(debug_ray(
                ray,
                hit.as_ref().map(|h| h.t),
                RayType::Primary,
            ));
        }

        let hit: Hit = match hit {
            Some(hit) => hit,
            None => {
                return RadianceResult {
                    li: self.miss(&ray, scene),
                    ray_scene_intersections: 1,
                    rays: collected_rays,
                };
            }
        };

        let mut ray_count = 1;
        let mut sum_li = hit.material.shade(
            scene,
            &ray,
            &hit,
            if collect_rays {
                Some(&mut collected_rays)
            } else {
                None
            },
        );

        if depth > 0 {
            macro_rules! spec {
                ($k:expr, $dir:expr, $rt:expr) => {{
                    let k: Spectrum<f32> = $k;
                    if !k.is_black() {
                        if let Some(d) = $dir {
                            let RadianceResult {
                                li,
                                ray_scene_intersections,
                                mut rays,
                            } = self.li(hit.spawn_ray(d), scene, depth - 1, collect_rays);
                            sum_li += li * k;
                            ray_count += ray_scene_intersections;
                            if !rays.is_empty() {
                                rays[0].ray_type = $rt;
                                collected_rays.append(&mut rays);
                            }
                        }
                    }
                }};
            }
            spec!(
                hit.material.kr,
                Some(ray.d.reflected(hit.n).normalized()),
                RayType::Reflection
            );
            spec!(
                hit.material.kt,
                refracted(ray.d, hit.n, hit.material.index),
                RayType::Refraction
            );
        }

        RadianceResult {
            li: sum_li,
            ray_scene_intersections: ray_count,
            rays: collected_rays,
        }
    }

    fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// Refracts the unit direction `d` through a surface with the unit normal `n` and the index of
/// refraction `index`.
///
/// Rays along `n` are exiting the surface into a medium with index 1. Returns `None` on total
/// internal reflection and for rays in the surface plane, which neither enter nor exit.
pub fn refracted(d: Vec3<f32>, n: Normal<f32>, index: f32) -> Option<Vec3<f32>> {
    let n = Vec3::from(n);
    let cos_i = -n.dot(d);
    if cos_i == 0.0 {
        return None;
    }
    let (eta, n, cos_i) = if cos_i > 0.0 {
        (1.0 / index, n, cos_i)
    } else {
        (index, -n, -cos_i)
    };

    let cos_t_sqr = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if cos_t_sqr <= 0.0 {
        return None;
    }

    let t = n * (eta * cos_i - cos_t_sqr.sqrt()) + d * eta;
    Some(t.normalized())
}
