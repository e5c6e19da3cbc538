use std::sync::Arc;

use crate::{
    math::{point2, Point2, Spectrum, Vec3},
    textures::Texture,
};

/// Color seen along directions that escape the scene.
pub trait EnvironmentMap: Send + Sync {
    /// Returns the color seen in direction `d`.
    fn sample(&self, d: Vec3<f32>) -> Spectrum<f32>;
}

/// Faces of a [CubeMap] in the order they are given to [CubeMap::new].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// Cube of six textures around the scene.
pub struct CubeMap {
    faces: [Arc<dyn Texture<Spectrum<f32>>>; 6],
}

impl CubeMap {
    /// Creates a new `CubeMap` from textures for `+x`, `-x`, `+y`, `-y`, `+z`, `-z`.
    pub fn new(faces: [Arc<dyn Texture<Spectrum<f32>>>; 6]) -> Self {
        Self { faces }
    }

    /// Finds the face `d` points to and the coordinates of `d` on it.
    pub fn face_coordinates(d: Vec3<f32>) -> (CubeFace, Point2<f32>) {
        let abs = d.abs();
        // Coordinates follow the usual cube map layout with v pointing down on the side faces
        let (face, major, sc, tc) = match abs.max_dimension() {
            0 if d.x >= 0.0 => (CubeFace::PositiveX, abs.x, -d.z, -d.y),
            0 => (CubeFace::NegativeX, abs.x, d.z, -d.y),
            1 if d.y >= 0.0 => (CubeFace::PositiveY, abs.y, d.x, d.z),
            1 => (CubeFace::NegativeY, abs.y, d.x, -d.z),
            _ if d.z >= 0.0 => (CubeFace::PositiveZ, abs.z, d.x, -d.y),
            _ => (CubeFace::NegativeZ, abs.z, -d.x, -d.y),
        };
        if major == 0.0 {
            return (face, point2(0.5, 0.5));
        }

        (
            face,
            point2(0.5 * (sc / major + 1.0), 0.5 * (tc / major + 1.0)),
        )
    }
}

impl EnvironmentMap for CubeMap {
    fn sample(&self, d: Vec3<f32>) -> Spectrum<f32> {
        let (face, uv) = Self::face_coordinates(d);
        self.faces[face as usize].evaluate(uv)
    }
}
