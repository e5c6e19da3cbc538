mod directional_light;
mod point_light;

pub use directional_light::DirectionalLight;
pub use point_light::PointLight;

use crate::{
    math::{Point3, Spectrum, Vec3},
    scene::Scene,
    visibility::VisibilityTester,
};

/// Sample from a light source for visibility testing and shading
pub struct LightSample {
    /// Unit direction from the shaded point toward the light.
    pub l: Vec3<f32>,
    /// Distance to the light, infinite for lights at infinity.
    pub dist: f32,
    /// Falloff factor in `[0, 1]`.
    pub distance_attenuation: f32,
    /// Shadow query toward the light.
    pub vis: VisibilityTester,
}

pub trait Light: Send + Sync {
    /// Returns the unattenuated color of this `Light`.
    fn color(&self) -> Spectrum<f32>;
    /// Returns the unit direction from `p` toward this `Light`.
    fn direction(&self, p: Point3<f32>) -> Vec3<f32>;
    /// Returns the distance from `p` to this `Light`.
    fn distance(&self, p: Point3<f32>) -> f32;
    /// Returns the distance falloff factor at `p`.
    fn distance_attenuation(&self, p: Point3<f32>) -> f32;

    /// Returns a [`LightSample`] from `p` to this `Light`.
    fn sample_li(&self, p: Point3<f32>) -> LightSample {
        let l = self.direction(p);
        let dist = self.distance(p);
        LightSample {
            l,
            dist,
            distance_attenuation: self.distance_attenuation(p),
            vis: VisibilityTester::new(p, l, dist, self.color()),
        }
    }

    /// Returns the color of this `Light` as seen from `p` through any transmissive occluders.
    fn shadow_attenuation(&self, p: Point3<f32>, scene: &Scene) -> Spectrum<f32> {
        self.sample_li(p).vis.attenuation(scene, None)
    }
}
