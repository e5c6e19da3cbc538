mod demo;
mod transform_tree;

pub use demo::cornell_box;
pub use transform_tree::{TransformId, TransformTree};

use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Instant};

use crate::{
    camera::CameraParameters,
    environment::EnvironmentMap,
    hit::Hit,
    kdtree::{KdTree, KdTreeSettings, KdTreeStats, TraversalMethod},
    lights::Light,
    math::{transforms::look_at, Ray, Spectrum, Transform},
    shapes::{intersect_linear, Geometry, Mesh, MeshError, Shape, Triangle},
    tsuki_info,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    Mesh(MeshError),
    UnknownTransform(usize),
    DegenerateCamera,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Mesh(why) => write!(f, "{}", why),
            SceneError::UnknownTransform(id) => write!(f, "Unknown transform node {}", id),
            SceneError::DegenerateCamera => {
                write!(f, "Camera target is at its position or parallel to up")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Mesh(why) => Some(why),
            _ => None,
        }
    }
}

impl From<MeshError> for SceneError {
    fn from(why: MeshError) -> Self {
        SceneError::Mesh(why)
    }
}

/// Settings for the spatial index built by [Scene::build_index].
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Falls back to testing every object when `false`.
    pub use_kd_tree: bool,
    pub traversal: TraversalMethod,
    pub kd_tree: KdTreeSettings,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            use_kd_tree: true,
            traversal: TraversalMethod::default(),
            kd_tree: KdTreeSettings::default(),
        }
    }
}

#[derive(Clone)]
enum ObjectKind {
    Shape(Arc<dyn Shape>),
    Mesh(Arc<Mesh>),
}

#[derive(Clone)]
struct SceneObject {
    kind: ObjectKind,
    transform: TransformId,
}

enum SceneIndex {
    Linear(Arc<Vec<Geometry>>),
    KdTree {
        tree: KdTree,
        traversal: TraversalMethod,
    },
}

/// Everything a render reads.
///
/// The index has to be rebuilt with [Scene::build_index] after any change to the objects or
/// transforms before the scene is intersected again.
pub struct Scene {
    pub name: String,
    camera: CameraParameters,
    pub lights: Vec<Arc<dyn Light>>,
    /// Ambient light that materials reflect with their `ka`.
    pub ambient: Spectrum<f32>,
    /// Color of rays that miss everything when no environment map is used.
    pub background: Spectrum<f32>,
    pub environment: Option<Arc<dyn EnvironmentMap>>,
    transforms: TransformTree,
    objects: Vec<SceneObject>,
    index: Option<SceneIndex>,
}

impl Scene {
    /// Creates an empty `Scene` with a default camera.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            camera: CameraParameters::default(),
            lights: Vec::new(),
            ambient: Spectrum::zeros(),
            background: Spectrum::zeros(),
            environment: None,
            transforms: TransformTree::new(),
            objects: Vec::new(),
            index: None,
        }
    }

    pub fn camera(&self) -> CameraParameters {
        self.camera
    }

    pub fn transforms(&self) -> &TransformTree {
        &self.transforms
    }

    /// Adds a transform node under `parent`.
    pub fn add_transform(
        &mut self,
        parent: TransformId,
        local: Transform<f32>,
    ) -> Result<TransformId, SceneError> {
        self.index = None;
        self.transforms.add_child(parent, local)
    }

    /// Replaces the local transform of `id`, moving everything under it.
    pub fn set_transform(
        &mut self,
        id: TransformId,
        local: Transform<f32>,
    ) -> Result<(), SceneError> {
        self.index = None;
        self.transforms.set_local(id, local)
    }

    /// Adds `shape` placed by the world transform of `transform`.
    pub fn add_shape(
        &mut self,
        shape: Arc<dyn Shape>,
        transform: TransformId,
    ) -> Result<(), SceneError> {
        self.transforms.world(transform)?;
        self.index = None;
        self.objects.push(SceneObject {
            kind: ObjectKind::Shape(shape),
            transform,
        });
        Ok(())
    }

    /// Adds `mesh` placed by the world transform of `transform`.
    ///
    /// Meshes with per-vertex attribute counts that don't match the vertex count are rejected.
    pub fn add_mesh(&mut self, mesh: Arc<Mesh>, transform: TransformId) -> Result<(), SceneError> {
        self.transforms.world(transform)?;
        mesh.validate()?;
        self.index = None;
        self.objects.push(SceneObject {
            kind: ObjectKind::Mesh(mesh),
            transform,
        });
        Ok(())
    }

    pub fn add_light(&mut self, light: Arc<dyn Light>) {
        self.lights.push(light);
    }

    /// Sets the camera, rejecting parameters that don't define a view.
    pub fn set_camera(&mut self, camera: CameraParameters) -> Result<(), SceneError> {
        if look_at(camera.position, camera.target, camera.up).is_none() {
            return Err(SceneError::DegenerateCamera);
        }
        self.camera = camera;
        Ok(())
    }

    /// Returns the number of objects added to this `Scene`.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the index is up to date with the objects.
    pub fn index_built(&self) -> bool {
        self.index.is_some()
    }

    /// Places every object in world space and builds the spatial index over them.
    ///
    /// With the kd-tree, meshes are split into their faces so that the tree can partition them.
    pub fn build_index(&mut self, settings: &IndexSettings) {
        let start = Instant::now();

        let mut geometry = Vec::new();
        for object in &self.objects {
            // Objects are only added with valid transforms and nodes are never removed
            let (to_world, normal_matrix) = match (
                self.transforms.world(object.transform),
                self.transforms.normal_matrix(object.transform),
            ) {
                (Ok(t), Ok(n)) => (*t, *n),
                (Err(why), _) | (_, Err(why)) => panic!("Scene: {}", why),
            };
            let place = |shape: Arc<dyn Shape>| {
                Geometry::with_normal_matrix(shape, to_world, normal_matrix)
            };
            match &object.kind {
                ObjectKind::Shape(shape) => geometry.push(place(Arc::clone(shape))),
                ObjectKind::Mesh(mesh) if settings.use_kd_tree => {
                    geometry.extend((0..mesh.faces().len()).map(|face| {
                        place(Arc::new(Triangle::new(Arc::clone(mesh), face)))
                    }));
                }
                ObjectKind::Mesh(mesh) => geometry.push(place(Arc::clone(mesh) as Arc<dyn Shape>)),
            }
        }
        let geometry = Arc::new(geometry);

        self.index = Some(if settings.use_kd_tree {
            SceneIndex::KdTree {
                tree: KdTree::new(geometry, settings.kd_tree),
                traversal: settings.traversal,
            }
        } else {
            SceneIndex::Linear(geometry)
        });

        tsuki_info!(
            "Scene '{}': Index of {} objects built in {:.3}s",
            self.name,
            self.geometry().len(),
            start.elapsed().as_secs_f32()
        );
    }

    fn index(&self) -> &SceneIndex {
        match &self.index {
            Some(index) => index,
            None => panic!("Scene '{}': Index queried before build_index", self.name),
        }
    }

    /// Returns the world space objects the index was built over.
    ///
    /// Panics if the index isn't built.
    pub fn geometry(&self) -> &Arc<Vec<Geometry>> {
        match self.index() {
            SceneIndex::Linear(geometry) => geometry,
            SceneIndex::KdTree { tree, .. } => tree.objects(),
        }
    }

    /// Returns the kd-tree statistics if the index is a kd-tree.
    pub fn index_stats(&self) -> Option<KdTreeStats> {
        match self.index() {
            SceneIndex::Linear(_) => None,
            SceneIndex::KdTree { tree, .. } => Some(tree.stats()),
        }
    }

    /// Finds the closest hit of `ray`. The hit's `object` indexes [Scene::geometry].
    ///
    /// Panics if the index isn't built.
    pub fn intersect(&self, ray: Ray<f32>) -> Option<Hit> {
        match self.index() {
            SceneIndex::Linear(geometry) => intersect_linear(geometry, ray),
            SceneIndex::KdTree { tree, traversal } => tree.intersect(ray, *traversal),
        }
    }
}
