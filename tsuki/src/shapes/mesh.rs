use std::fmt;

use super::Shape;
use crate::{
    hit::{Hit, RAY_EPSILON},
    materials::Material,
    math::{point2, Bounds3, Normal, Point3, Ray, Vec3},
    tsuki_debug,
};

// Faces with a smaller area are dropped on construction
const DEGENERATE_AREA: f32 = 1e-12;
// Slivers whose barycentric determinant is lost to rounding, relative to |u|^2 |v|^2
const DEGENERATE_DENOM: f32 = 4.0 * f32::EPSILON;

#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    WrongNormalCount { normals: usize, vertices: usize },
    WrongMaterialCount { materials: usize, vertices: usize },
    FaceIndexOutOfRange { index: usize, vertices: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::WrongNormalCount { normals, vertices } => write!(
                f,
                "Bad mesh: {} normals for {} vertices",
                normals, vertices
            ),
            MeshError::WrongMaterialCount {
                materials,
                vertices,
            } => write!(
                f,
                "Bad mesh: {} materials for {} vertices",
                materials, vertices
            ),
            MeshError::FaceIndexOutOfRange { index, vertices } => write!(
                f,
                "Bad mesh: face index {} with {} vertices",
                index, vertices
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// A triangle of a [Mesh] with the constants of its intersection test.
#[derive(Debug, Clone)]
pub struct Face {
    /// Vertex indices into the parent mesh
    pub ids: [usize; 3],
    /// Unit plane normal
    pub normal: Normal<f32>,
    /// Plane offset, `normal . p` for any point `p` on the plane
    pub dist: f32,
    pub area: f32,
    // Edge basis b - a, c - a and the products of the barycentric solve
    u: Vec3<f32>,
    v: Vec3<f32>,
    uu: f32,
    vv: f32,
    uv: f32,
    denom: f32,
}

impl Face {
    // Returns `None` for zero area triangles and slivers with no usable barycentric solve
    fn new(ids: [usize; 3], vertices: &[Point3<f32>]) -> Option<Self> {
        let a = vertices[ids[0]];
        let b = vertices[ids[1]];
        let c = vertices[ids[2]];

        let u = b - a;
        let v = c - a;
        let cross = u.cross(v);
        let area = cross.len() / 2.0;
        if !(area >= DEGENERATE_AREA) {
            return None;
        }

        let normal = Normal::from(cross / (area * 2.0));
        let uu = u.len_sqr();
        let vv = v.len_sqr();
        let uv = u.dot(v);
        let denom = uv * uv - uu * vv;
        if !(denom.abs() > DEGENERATE_DENOM * uu * vv) {
            return None;
        }

        Some(Self {
            ids,
            normal,
            dist: normal.dot_v(Vec3::from(a)),
            area,
            u,
            v,
            uu,
            vv,
            uv,
            denom,
        })
    }

    /// Intersects a local space `ray` with this `Face` of `mesh`.
    pub fn intersect(&self, mesh: &Mesh, ray: Ray<f32>) -> Option<Hit> {
        if self.area < DEGENERATE_AREA {
            return None;
        }

        let cos_theta = self.normal.dot_v(ray.d);
        if cos_theta.abs() < RAY_EPSILON {
            return None;
        }

        let a = mesh.vertices[self.ids[0]];
        let t = self.normal.dot_v(a - ray.o) / cos_theta;
        if t <= RAY_EPSILON || t >= ray.t_max {
            return None;
        }

        let p = ray.point(t);
        let w = p - a;
        let wu = w.dot(self.u);
        let wv = w.dot(self.v);
        let beta = (self.uv * wv - self.vv * wu) / self.denom;
        let gamma = (self.uv * wu - self.uu * wv) / self.denom;
        let alpha = 1.0 - beta - gamma;
        if !(alpha >= 0.0 && beta >= 0.0 && gamma >= 0.0) {
            return None;
        }
        let bary = [alpha, beta, gamma];

        let n = if mesh.normals.is_empty() {
            self.normal
        } else {
            let [na, nb, nc] = self.ids.map(|i| mesh.normals[i]);
            let n = na * alpha + nb * beta + nc * gamma;
            // Averaged normals can cancel out
            if n.len() > 0.0 {
                n.normalized()
            } else {
                self.normal
            }
        };

        let material = if mesh.materials.is_empty() {
            mesh.material.clone()
        } else {
            let [ma, mb, mc] = self.ids.map(|i| &mesh.materials[i]);
            Material::blend([ma, mb, mc], bary)
        };

        Some(Hit {
            t,
            p,
            n,
            bary,
            uv: point2(beta, gamma),
            material,
            object: 0,
        })
    }
}

/// An indexed triangle mesh in its local space.
///
/// Per-vertex normals and materials are optional but must match the vertex count when given.
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    normals: Vec<Normal<f32>>,
    materials: Vec<Material>,
    material: Material,
    faces: Vec<Face>,
    bound: Bounds3<f32>,
}

impl Mesh {
    /// Creates an empty `Mesh` whose faces use `material` when no per-vertex materials are given.
    pub fn new(material: Material) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            materials: Vec::new(),
            material,
            faces: Vec::new(),
            bound: Bounds3::default(),
        }
    }

    /// Creates a `Mesh` from vertices and triangle indices, dropping degenerate faces.
    pub fn from_triangles(
        vertices: Vec<Point3<f32>>,
        triangles: &[[usize; 3]],
        material: Material,
    ) -> Result<Self, MeshError> {
        let mut mesh = Self::new(material);
        for v in vertices {
            mesh.add_vertex(v);
        }
        for &[a, b, c] in triangles {
            mesh.add_face(a, b, c)?;
        }
        Ok(mesh)
    }

    pub fn add_vertex(&mut self, p: Point3<f32>) {
        self.bound = self.bound.union_p(p);
        self.vertices.push(p);
    }

    pub fn add_normal(&mut self, n: Normal<f32>) {
        self.normals.push(n);
    }

    pub fn add_material(&mut self, m: Material) {
        self.materials.push(m);
    }

    /// Adds a face over existing vertices `a`, `b`, `c` in counter-clockwise order.
    ///
    /// Returns `Ok(false)` if the face was degenerate and dropped.
    pub fn add_face(&mut self, a: usize, b: usize, c: usize) -> Result<bool, MeshError> {
        let vertex_count = self.vertices.len();
        if let Some(&index) = [a, b, c].iter().find(|&&i| i >= vertex_count) {
            return Err(MeshError::FaceIndexOutOfRange {
                index,
                vertices: vertex_count,
            });
        }

        match Face::new([a, b, c], &self.vertices) {
            Some(face) => {
                self.faces.push(face);
                Ok(true)
            }
            None => {
                tsuki_debug!("Dropped degenerate face {} {} {}", a, b, c);
                Ok(false)
            }
        }
    }

    /// Checks that per-vertex attributes match the vertex count.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertices = self.vertices.len();
        if !self.materials.is_empty() && self.materials.len() != vertices {
            return Err(MeshError::WrongMaterialCount {
                materials: self.materials.len(),
                vertices,
            });
        }
        if !self.normals.is_empty() && self.normals.len() != vertices {
            return Err(MeshError::WrongNormalCount {
                normals: self.normals.len(),
                vertices,
            });
        }
        Ok(())
    }

    /// Replaces the vertex normals with the average of the adjacent face normals.
    ///
    /// Vertices without faces get a zero normal.
    pub fn generate_normals(&mut self) {
        let mut sums = vec![Normal::zeros(); self.vertices.len()];
        let mut counts = vec![0u32; self.vertices.len()];
        for face in &self.faces {
            for &i in &face.ids {
                sums[i] += face.normal;
                counts[i] += 1;
            }
        }

        self.normals = sums
            .into_iter()
            .zip(counts)
            .map(|(n, count)| {
                if count > 0 {
                    n / (count as f32)
                } else {
                    n
                }
            })
            .collect();
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Normal<f32>] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the local space AABB of the face with index `face`.
    pub fn face_bound(&self, face: usize) -> Bounds3<f32> {
        let [a, b, c] = self.faces[face].ids;
        Bounds3::new(self.vertices[a], self.vertices[b]).union_p(self.vertices[c])
    }
}

impl Shape for Mesh {
    fn intersect_local(&self, mut ray: Ray<f32>) -> Option<Hit> {
        let mut closest = None;
        for face in &self.faces {
            if let Some(hit) = face.intersect(self, ray) {
                ray.t_max = hit.t;
                closest = Some(hit);
            }
        }
        closest
    }

    fn local_bound(&self) -> Bounds3<f32> {
        self.bound
    }
}
