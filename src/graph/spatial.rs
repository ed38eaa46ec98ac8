//! Spatial index for pointer hit testing
//!
//! R-tree (via `rstar`) over the nodes a renderer currently draws. Hidden
//! nodes are never indexed, so they cannot be hovered or clicked.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::ids::NodeKind;
use super::reducer::GraphOverlay;
use super::store::GraphModel;

/// Index entry for one drawn node
#[derive(Debug, Clone)]
pub struct SpatialNode {
    pub id: String,
    pub kind: NodeKind,
    bounds: AABB<[f32; 2]>,
    pub center: [f32; 2],
    pub radius: f32,
}

impl SpatialNode {
    pub fn new(id: impl Into<String>, center: [f32; 2], radius: f32) -> Self {
        let id = id.into();
        let bounds = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        Self {
            kind: NodeKind::of(&id),
            id,
            bounds,
            center,
            radius,
        }
    }

    fn distance_to(&self, point: [f32; 2]) -> f32 {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        ((dx * dx + dy * dy).sqrt() - self.radius).max(0.0)
    }
}

impl RTreeObject for SpatialNode {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialNode {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let d = self.distance_to(*point);
        d * d
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Spatial index over visible nodes
#[derive(Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialNode>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl Iterator<Item = SpatialNode>) -> Self {
        let mut index = Self::new();
        index.rebuild(nodes);
        index
    }

    /// Index the visible nodes of `model` under `overlay`, using the overlay
    /// size where the overlay enlarges a node
    pub fn from_overlay(model: &GraphModel, overlay: &GraphOverlay) -> Self {
        Self::from_nodes(
            model
                .nodes()
                .iter()
                .zip(&overlay.nodes)
                .filter(|(_, o)| !o.hidden)
                .map(|(node, o)| {
                    SpatialNode::new(
                        node.id.as_str(),
                        [node.attrs.x, node.attrs.y],
                        o.size.unwrap_or(node.attrs.size),
                    )
                }),
        )
    }

    pub fn rebuild(&mut self, nodes: impl Iterator<Item = SpatialNode>) {
        let nodes: Vec<_> = nodes.collect();
        self.count = nodes.len();
        self.tree = RTree::bulk_load(nodes);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.count = 0;
    }

    /// Closest node within `threshold` of `point`
    ///
    /// Ties are broken by id so repeated queries return the same node.
    pub fn hit_test(&self, point: [f32; 2], threshold: f32) -> Option<&SpatialNode> {
        let search = AABB::from_corners(
            [point[0] - threshold, point[1] - threshold],
            [point[0] + threshold, point[1] + threshold],
        );
        self.tree
            .locate_in_envelope_intersecting(&search)
            .filter(|node| node.distance_to(point) <= threshold)
            .min_by(|a, b| {
                a.distance_to(point)
                    .partial_cmp(&b.distance_to(point))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.id.cmp(&b.id))
            })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
