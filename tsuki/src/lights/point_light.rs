use super::Light;
use crate::math::{Point3, Spectrum, Vec3};

pub struct PointLight {
    p: Point3<f32>,
    color: Spectrum<f32>,
    // Constant, linear and quadratic falloff terms
    falloff: [f32; 3],
}

impl PointLight {
    /// Creates a new `PointLight` at `p` with the given color and no falloff.
    pub fn new(p: Point3<f32>, color: Spectrum<f32>) -> Self {
        Self::with_falloff(p, color, [1.0, 0.0, 0.0])
    }

    /// Creates a new `PointLight` that falls off as `1 / (c0 + c1 d + c2 d^2)`.
    pub fn with_falloff(p: Point3<f32>, color: Spectrum<f32>, falloff: [f32; 3]) -> Self {
        Self { p, color, falloff }
    }

    pub fn position(&self) -> Point3<f32> {
        self.p
    }
}

impl Light for PointLight {
    fn color(&self) -> Spectrum<f32> {
        self.color
    }

    fn direction(&self, p: Point3<f32>) -> Vec3<f32> {
        (self.p - p).normalized()
    }

    fn distance(&self, p: Point3<f32>) -> f32 {
        self.p.dist(p)
    }

    fn distance_attenuation(&self, p: Point3<f32>) -> f32 {
        let d = self.distance(p);
        let [c0, c1, c2] = self.falloff;
        let denom = c0 + c1 * d + c2 * d * d;
        // Intensity never increases past the source color
        if denom <= 1.0 {
            1.0
        } else {
            1.0 / denom
        }
    }
}
