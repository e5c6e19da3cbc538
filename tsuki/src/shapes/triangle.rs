use std::sync::Arc;

use super::{mesh::Mesh, Shape};
use crate::{
    hit::Hit,
    math::{Bounds3, Ray},
};

/// A single face of a shared [Mesh], so that an index can partition a mesh by face.
pub struct Triangle {
    mesh: Arc<Mesh>,
    face: usize,
}

impl Triangle {
    /// Creates a new `Triangle` for the face with index `face` in `mesh`.
    pub fn new(mesh: Arc<Mesh>, face: usize) -> Self {
        assert!(face < mesh.faces().len(), "Triangle: face out of range");
        Self { mesh, face }
    }
}

impl Shape for Triangle {
    fn intersect_local(&self, ray: Ray<f32>) -> Option<Hit> {
        self.mesh.faces()[self.face].intersect(&self.mesh, ray)
    }

    fn local_bound(&self) -> Bounds3<f32> {
        self.mesh.face_bound(self.face)
    }
}
