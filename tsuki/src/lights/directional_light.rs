use super::Light;
use crate::math::{Point3, Spectrum, Vec3};

/// A light at infinity shining along a fixed direction.
pub struct DirectionalLight {
    // Direction toward the light
    to_light: Vec3<f32>,
    color: Spectrum<f32>,
}

impl DirectionalLight {
    /// Creates a new `DirectionalLight` with light traveling along `direction`.
    pub fn new(direction: Vec3<f32>, color: Spectrum<f32>) -> Self {
        Self {
            to_light: -direction.normalized(),
            color,
        }
    }
}

impl Light for DirectionalLight {
    fn color(&self) -> Spectrum<f32> {
        self.color
    }

    fn direction(&self, _p: Point3<f32>) -> Vec3<f32> {
        self.to_light
    }

    fn distance(&self, _p: Point3<f32>) -> f32 {
        f32::INFINITY
    }

    fn distance_attenuation(&self, _p: Point3<f32>) -> f32 {
        1.0
    }
}
