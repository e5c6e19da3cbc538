mod whitted;

pub use whitted::{refracted, Whitted};

use crate::{
    camera::Camera,
    film::FilmTile,
    hit::NO_HIT_T,
    math::{Point2, Ray, Spectrum, Vec2},
    sampling::Sampler,
    scene::Scene,
};

pub type WhittedParams = whitted::Params;

pub struct RadianceResult {
    pub li: Spectrum<f32>,
    /// Number of rays intersected with the scene, shadow rays excluded.
    pub ray_scene_intersections: usize,
    /// Every ray that was spawned if they were collected, the first one is the traced ray.
    pub rays: Vec<IntegratorRay>,
}

impl Default for RadianceResult {
    fn default() -> Self {
        Self {
            li: Spectrum::zeros(),
            ray_scene_intersections: 0,
            rays: Vec::new(),
        }
    }
}

/// A ray spawned during integration, for debug visualization.
///
/// `t_max` is set to the distance of the hit or [NO_HIT_T] on a miss.
#[derive(Debug, Clone)]
pub struct IntegratorRay {
    pub ray: Ray<f32>,
    pub ray_type: RayType,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RayType {
    Primary,
    Reflection,
    Refraction,
    Shadow,
}

// Public interface for scene integrators.
pub trait Integrator: Send + Sync {
    /// Evaluates the incoming radiance along `ray` with `depth` levels of secondary rays left.
    ///
    /// Spawned rays are returned in the result if `collect_rays` is set.
    fn li(&self, ray: Ray<f32>, scene: &Scene, depth: u32, collect_rays: bool) -> RadianceResult;

    /// Returns the depth primary rays are traced with.
    fn max_depth(&self) -> u32;

    /// Renders the given `tile` into `tile_pixels` in row-major order, clamped to `[0, 1]`.
    ///
    /// Returns the number of rays intersected with `scene`. Stops between pixels when
    /// `early_termination_predicate` returns `true`, leaving the rest of the tile black.
    fn render(
        &self,
        scene: &Scene,
        camera: &Camera,
        sampler: &dyn Sampler,
        tile: &FilmTile,
        tile_pixels: &mut [Spectrum<f32>],
        early_termination_predicate: &mut dyn FnMut() -> bool,
    ) -> usize {
        let tile_width = tile.width();
        assert!(tile_pixels.len() >= tile_width * tile.height());
        tile_pixels.fill(Spectrum::zeros());

        // Seed per tile so that results don't depend on which thread renders which tile
        let corner = tile.bb.p_min;
        let mut sampler = Sampler::clone(sampler, ((corner.y as u64) << 16) | (corner.x as u64));

        let res = camera.res();
        let inv_res = Vec2::new(1.0 / (res.x as f32), 1.0 / (res.y as f32));
        let sample_count = sampler.samples_per_pixel();

        let mut ray_count = 0;
        for p in tile.bb {
            if early_termination_predicate() {
                return ray_count;
            }

            sampler.start_pixel();
            let mut color = Spectrum::zeros();
            for _ in 0..sample_count {
                let offset = sampler.get_2d();
                let p_film = Point2::new(
                    ((p.x as f32) + offset.x) * inv_res.x,
                    ((p.y as f32) + offset.y) * inv_res.y,
                );
                let result = self.li(camera.ray(p_film), scene, self.max_depth(), false);
                color += result.li;
                ray_count += result.ray_scene_intersections;
            }
            color = color / (sample_count as f32);

            let tile_x = (p.x - corner.x) as usize;
            let tile_y = (p.y - corner.y) as usize;
            tile_pixels[tile_y * tile_width + tile_x] = color.clamped(0.0, 1.0);
        }
        ray_count
    }
}

/// Traces a single primary ray through `p_film` in `[0, 1]^2` and collects every ray it spawns.
///
/// This is the single threaded diagnostic path, renders never collect rays.
pub fn trace_debug_ray(
    integrator: &dyn Integrator,
    scene: &Scene,
    camera: &Camera,
    p_film: Point2<f32>,
) -> RadianceResult {
    let mut result = integrator.li(camera.ray(p_film), scene, integrator.max_depth(), true);
    result.li = result.li.clamped(0.0, 1.0);
    result
}

// Debug rays end at the hit or at a fixed distance on a miss
fn debug_ray(ray: Ray<f32>, hit_t: Option<f32>, ray_type: RayType) -> IntegratorRay {
    IntegratorRay {
        ray: Ray::new(ray.o, ray.d, hit_t.unwrap_or(NO_HIT_T)),
        ray_type,
    }
}
