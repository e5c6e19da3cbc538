use super::SceneError;
use crate::math::{Matrix4x4, Transform};

/// Index of a node in a [TransformTree].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransformId(pub usize);

struct TransformNode {
    parent: Option<usize>,
    local: Transform<f32>,
    // Cached parent.world * local
    world: Transform<f32>,
    normal_matrix: Matrix4x4<f32>,
}

impl TransformNode {
    fn new(parent: Option<usize>, local: Transform<f32>, parent_world: &Transform<f32>) -> Self {
        let world = parent_world * &local;
        Self {
            parent,
            local,
            world,
            normal_matrix: world.normal_matrix(),
        }
    }
}

/// Arena of the scene's transform hierarchy.
///
/// Children are always stored after their parents so a single forward pass updates a subtree.
pub struct TransformTree {
    nodes: Vec<TransformNode>,
}

impl TransformTree {
    /// Creates a new `TransformTree` with an identity root.
    pub fn new() -> Self {
        Self {
            nodes: vec![TransformNode::new(
                None,
                Transform::identity(),
                &Transform::identity(),
            )],
        }
    }

    /// The identity root node.
    pub fn root(&self) -> TransformId {
        TransformId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node under `parent` with `local` relative to it.
    pub fn add_child(
        &mut self,
        parent: TransformId,
        local: Transform<f32>,
    ) -> Result<TransformId, SceneError> {
        let parent_world = self.world(parent)?;
        let node = TransformNode::new(Some(parent.0), local, parent_world);
        self.nodes.push(node);
        Ok(TransformId(self.nodes.len() - 1))
    }

    /// Replaces the local transform of `id`, recomputing it and all of its descendants.
    pub fn set_local(&mut self, id: TransformId, local: Transform<f32>) -> Result<(), SceneError> {
        if id.0 >= self.nodes.len() {
            return Err(SceneError::UnknownTransform(id.0));
        }
        self.nodes[id.0].local = local;

        let mut dirty = vec![false; self.nodes.len()];
        dirty[id.0] = true;
        for i in id.0..self.nodes.len() {
            let parent = self.nodes[i].parent;
            if i != id.0 {
                match parent {
                    Some(p) if dirty[p] => dirty[i] = true,
                    _ => continue,
                }
            }

            let parent_world = parent.map_or_else(Transform::identity, |p| self.nodes[p].world);
            let node = &mut self.nodes[i];
            *node = TransformNode::new(node.parent, node.local, &parent_world);
        }
        Ok(())
    }

    /// Returns the composed object-to-world [Transform] of `id`.
    pub fn world(&self, id: TransformId) -> Result<&Transform<f32>, SceneError> {
        self.nodes
            .get(id.0)
            .map(|n| &n.world)
            .ok_or(SceneError::UnknownTransform(id.0))
    }

    /// Returns the local [Transform] of `id` relative to its parent.
    pub fn local(&self, id: TransformId) -> Result<&Transform<f32>, SceneError> {
        self.nodes
            .get(id.0)
            .map(|n| &n.local)
            .ok_or(SceneError::UnknownTransform(id.0))
    }

    /// Returns the inverse transpose of the upper 3x3 block of the world transform of `id`.
    pub fn normal_matrix(&self, id: TransformId) -> Result<&Matrix4x4<f32>, SceneError> {
        self.nodes
            .get(id.0)
            .map(|n| &n.normal_matrix)
            .ok_or(SceneError::UnknownTransform(id.0))
    }
}

impl Default for TransformTree {
    fn default() -> Self {
        Self::new()
    }
}
