use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    hit::Hit,
    math::{Bounds3, Ray},
    shapes::Geometry,
    tsuki_info,
};

/// Deepest supported tree, the traversal stack holds at most one entry per level.
pub const MAX_DEPTH: usize = 63;

// Subtrees above this depth are built in parallel
const PARALLEL_BUILD_DEPTH: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KdTreeSettings {
    /// Nodes with at most this many objects become leaves.
    pub max_objects_in_leaf: usize,
    /// Nodes at this depth become leaves.
    pub max_depth: usize,
}

impl Default for KdTreeSettings {
    fn default() -> Self {
        Self {
            max_objects_in_leaf: 20,
            max_depth: 12,
        }
    }
}

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumVariantNames,
)]
pub enum TraversalMethod {
    /// Tests the node box and descends into both children.
    Recursive,
    /// Walks cells front to back with an explicit stack, skipping cells the ray doesn't reach.
    #[default]
    Stack,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct KdTreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
    /// Sum of leaf object counts, larger than the object count when objects straddle splits.
    pub object_references: usize,
    pub build_s: f32,
}

#[derive(Copy, Clone, Debug)]
enum NodeContent {
    Interior {
        second_child: u32,
        axis: u8,
        pivot: f32,
    },
    Leaf {
        first_index: u32,
        count: u32,
    },
}

#[derive(Copy, Clone, Debug)]
struct KdNode {
    // Cell of this node, halved by each split
    bounds: Bounds3<f32>,
    content: NodeContent,
}

enum BuildNode {
    Interior {
        bounds: Bounds3<f32>,
        axis: usize,
        pivot: f32,
        children: Box<[BuildNode; 2]>,
    },
    Leaf {
        bounds: Bounds3<f32>,
        objects: Vec<u32>,
    },
}

#[derive(Copy, Clone)]
struct StackEntry {
    node: usize,
    t_min: f32,
    t_max: f32,
}

/// Kd-tree over world space [Geometry].
///
/// Each interior node splits its cell at the middle of the longest axis. Objects whose bounds
/// straddle the split are referenced by both children.
pub struct KdTree {
    objects: Arc<Vec<Geometry>>,
    nodes: Vec<KdNode>,
    object_indices: Vec<u32>,
    stats: KdTreeStats,
}

impl KdTree {
    /// Builds a new `KdTree` over `objects`.
    ///
    /// Panics if `settings.max_depth` is larger than the supported depth.
    pub fn new(objects: Arc<Vec<Geometry>>, settings: KdTreeSettings) -> Self {
        assert!(
            settings.max_depth <= MAX_DEPTH,
            "KdTree: max depth {} is larger than supported {}",
            settings.max_depth,
            MAX_DEPTH
        );

        let build_start = Instant::now();

        let bounds: Vec<Bounds3<f32>> = objects.iter().map(|o| o.world_bound()).collect();
        let root_bounds = bounds
            .iter()
            .fold(Bounds3::default(), |acc, &b| acc.union_b(b));
        let all = (0..objects.len() as u32).collect();
        let root = build(&bounds, all, root_bounds, 0, settings);

        let mut ret = Self {
            objects,
            nodes: Vec::new(),
            object_indices: Vec::new(),
            stats: KdTreeStats::default(),
        };
        ret.flatten(root, 0);
        ret.stats.node_count = ret.nodes.len();
        ret.stats.build_s = build_start.elapsed().as_secs_f32();

        tsuki_info!(
            "KdTree: {} objects, {} nodes, {} leaves, depth {}, {} references, built in {:.3}s",
            ret.objects.len(),
            ret.stats.node_count,
            ret.stats.leaf_count,
            ret.stats.max_depth,
            ret.stats.object_references,
            ret.stats.build_s
        );

        ret
    }

    pub fn objects(&self) -> &Arc<Vec<Geometry>> {
        &self.objects
    }

    pub fn stats(&self) -> KdTreeStats {
        self.stats
    }

    /// Returns the bounds of all objects in this `KdTree`.
    pub fn bounds(&self) -> Bounds3<f32> {
        self.nodes[0].bounds
    }

    /// Finds the closest hit of `ray`. The hit's `object` indexes [KdTree::objects].
    pub fn intersect(&self, ray: Ray<f32>, method: TraversalMethod) -> Option<Hit> {
        match method {
            TraversalMethod::Recursive => self.intersect_recursive(0, ray),
            TraversalMethod::Stack => self.intersect_stack(ray),
        }
    }

    fn intersect_leaf(&self, first_index: u32, count: u32, mut ray: Ray<f32>) -> Option<Hit> {
        let range = (first_index as usize)..((first_index + count) as usize);
        let mut closest = None;
        for &i in &self.object_indices[range] {
            if let Some(mut hit) = self.objects[i as usize].intersect(ray) {
                ray.t_max = hit.t;
                hit.object = i as usize;
                closest = Some(hit);
            }
        }
        closest
    }

    fn intersect_recursive(&self, node_index: usize, mut ray: Ray<f32>) -> Option<Hit> {
        let node = &self.nodes[node_index];
        node.bounds.intersections(ray)?;

        match node.content {
            NodeContent::Leaf { first_index, count } => {
                self.intersect_leaf(first_index, count, ray)
            }
            NodeContent::Interior { second_child, .. } => {
                let first = self.intersect_recursive(node_index + 1, ray);
                if let Some(hit) = &first {
                    ray.t_max = hit.t;
                }
                // Only closer hits come back from the second child
                self.intersect_recursive(second_child as usize, ray)
                    .or(first)
            }
        }
    }

    fn intersect_stack(&self, mut ray: Ray<f32>) -> Option<Hit> {
        let (t_min, t_max) = self.nodes[0].bounds.intersections(ray)?;

        let mut stack = [StackEntry {
            node: 0,
            t_min: 0.0,
            t_max: 0.0,
        }; MAX_DEPTH + 1];
        let mut stack_len = 0;

        let mut closest: Option<Hit> = None;
        let mut current = StackEntry {
            node: 0,
            t_min,
            t_max,
        };
        loop {
            match self.nodes[current.node].content {
                NodeContent::Interior {
                    second_child,
                    axis,
                    pivot,
                } => {
                    let axis = axis as usize;
                    let left = current.node + 1;
                    let right = second_child as usize;
                    let diff = pivot - ray.o[axis];
                    let d = ray.d[axis];

                    if diff == 0.0 {
                        // Origin on the split plane, the direction picks the side
                        if d > 0.0 {
                            current.node = right;
                        } else if d < 0.0 {
                            current.node = left;
                        } else {
                            stack[stack_len] = StackEntry {
                                node: right,
                                ..current
                            };
                            stack_len += 1;
                            current.node = left;
                        }
                        continue;
                    }

                    let (near, far) = if diff > 0.0 {
                        (left, right)
                    } else {
                        (right, left)
                    };
                    if d == 0.0 {
                        current.node = near;
                        continue;
                    }

                    let t_split = diff / d;
                    if t_split > current.t_max || t_split <= 0.0 {
                        current.node = near;
                    } else if t_split < current.t_min {
                        current.node = far;
                    } else {
                        stack[stack_len] = StackEntry {
                            node: far,
                            t_min: t_split,
                            t_max: current.t_max,
                        };
                        stack_len += 1;
                        current = StackEntry {
                            node: near,
                            t_min: current.t_min,
                            t_max: t_split,
                        };
                    }
                }
                NodeContent::Leaf { first_index, count } => {
                    if let Some(hit) = self.intersect_leaf(first_index, count, ray) {
                        ray.t_max = hit.t;
                        closest = Some(hit);
                    }

                    // Cells left on the stack are further than this one
                    if let Some(hit) = &closest {
                        if hit.t <= current.t_max {
                            return closest;
                        }
                    }

                    if stack_len == 0 {
                        return closest;
                    }
                    stack_len -= 1;
                    current = stack[stack_len];
                }
            }
        }
    }

    fn flatten(&mut self, node: BuildNode, depth: usize) {
        self.stats.max_depth = self.stats.max_depth.max(depth);
        match node {
            BuildNode::Interior {
                bounds,
                axis,
                pivot,
                children,
            } => {
                let self_index = self.nodes.len();
                self.nodes.push(KdNode {
                    bounds,
                    content: NodeContent::Interior {
                        second_child: 0,
                        axis: axis as u8,
                        pivot,
                    },
                });

                let [first, second] = *children;
                self.flatten(first, depth + 1);
                let second_index = self.nodes.len() as u32;
                if let NodeContent::Interior { second_child, .. } =
                    &mut self.nodes[self_index].content
                {
                    *second_child = second_index;
                }
                self.flatten(second, depth + 1);
            }
            BuildNode::Leaf { bounds, objects } => {
                self.stats.leaf_count += 1;
                self.stats.object_references += objects.len();
                self.nodes.push(KdNode {
                    bounds,
                    content: NodeContent::Leaf {
                        first_index: self.object_indices.len() as u32,
                        count: objects.len() as u32,
                    },
                });
                self.object_indices.extend(objects);
            }
        }
    }
}

fn build(
    object_bounds: &[Bounds3<f32>],
    objects: Vec<u32>,
    bounds: Bounds3<f32>,
    depth: usize,
    settings: KdTreeSettings,
) -> BuildNode {
    if objects.len() <= settings.max_objects_in_leaf || depth >= settings.max_depth {
        return BuildNode::Leaf { bounds, objects };
    }

    let axis = bounds.maximum_extent();
    let pivot = bounds.center()[axis];
    if bounds.p_max[axis] <= bounds.p_min[axis] {
        return BuildNode::Leaf { bounds, objects };
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    for &o in &objects {
        let b = &object_bounds[o as usize];
        if b.p_min[axis] <= pivot {
            left.push(o);
        }
        if b.p_max[axis] >= pivot {
            right.push(o);
        }
    }

    // Every object straddles, splitting would only duplicate them
    if left.len() == objects.len() && right.len() == objects.len() {
        return BuildNode::Leaf { bounds, objects };
    }

    let mut left_bounds = bounds;
    left_bounds.p_max[axis] = pivot;
    let mut right_bounds = bounds;
    right_bounds.p_min[axis] = pivot;

    let (left_node, right_node) = if depth < PARALLEL_BUILD_DEPTH {
        rayon::join(
            || build(object_bounds, left, left_bounds, depth + 1, settings),
            || build(object_bounds, right, right_bounds, depth + 1, settings),
        )
    } else {
        (
            build(object_bounds, left, left_bounds, depth + 1, settings),
            build(object_bounds, right, right_bounds, depth + 1, settings),
        )
    };

    BuildNode::Interior {
        bounds,
        axis,
        pivot,
        children: Box::new([left_node, right_node]),
    }
}
