//! Graph store - the authoritative node/edge collection for one dataset snapshot
//!
//! `GraphStore` is the narrow capability the builder and the reducer need.
//! `GraphModel` is the in-memory implementation: nodes in insertion order, an
//! id index, an edge list and a direction-agnostic adjacency set per node.
//!
//! Positions are written by the layout pass during construction. After the
//! snapshot is handed to a view it is only ever read.

use std::collections::{BTreeSet, HashMap};

use pattern_types::GraphError;
use serde::{Deserialize, Serialize};

use super::ids::NodeKind;

// =============================================================================
// NODE / EDGE RECORDS
// =============================================================================

/// Render shape for a node (solved problems use squares)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeShape {
    #[default]
    Circle,
    Square,
}

/// Base visual attributes supplied when a node is added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub label: String,
    pub color: String,
    /// Excluded from force-directed movement
    pub fixed: bool,
    pub shape: NodeShape,
}

impl NodeAttributes {
    pub fn new(label: impl Into<String>, color: impl Into<String>, size: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size,
            label: label.into(),
            color: color.into(),
            fixed: false,
            shape: NodeShape::Circle,
        }
    }

    /// Builder: set position
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder: set render shape
    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }
}

/// A node in the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub attrs: NodeAttributes,
}

/// Edge kind, inferred from the endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// pattern → subpattern
    Hierarchy,
    /// problem → subpattern
    Membership,
}

/// An edge between two node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
}

impl GraphEdge {
    /// True if the edge touches node index `idx`
    pub fn touches(&self, idx: usize) -> bool {
        self.source == idx || self.target == idx
    }
}

// =============================================================================
// CAPABILITY TRAIT
// =============================================================================

/// Narrow graph capability used by construction and filtering
pub trait GraphStore {
    /// Add a node. Fails with `DuplicateNode` if the id is taken.
    fn add_node(&mut self, id: &str, attrs: NodeAttributes) -> Result<(), GraphError>;

    /// Add an undirected edge. Both endpoints must exist.
    fn add_edge(&mut self, a: &str, b: &str) -> Result<(), GraphError>;

    fn has_node(&self, id: &str) -> bool;

    /// Adjacency check in either direction
    fn has_edge(&self, a: &str, b: &str) -> bool;

    /// Direct neighbours in node insertion order
    fn neighbors(&self, id: &str) -> Vec<&str>;
}

// =============================================================================
// GRAPH MODEL
// =============================================================================

/// In-memory graph snapshot
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Get node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Get node index by id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Adjacency check by index
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Neighbour indices of a node index
    pub fn neighbor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(idx).into_iter().flatten().copied()
    }

    /// Degree of a node index
    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency.get(idx).map_or(0, BTreeSet::len)
    }

    /// Endpoint ids of an edge
    pub fn edge_endpoints(&self, edge: &GraphEdge) -> (&str, &str) {
        (
            self.nodes[edge.source].id.as_str(),
            self.nodes[edge.target].id.as_str(),
        )
    }

    /// Overwrite a node position (layout passes only)
    pub fn set_position(&mut self, idx: usize, x: f32, y: f32) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.attrs.x = x;
            node.attrs.y = y;
        }
    }

    /// Pin or unpin a node for the force pass
    pub fn set_fixed(&mut self, idx: usize, fixed: bool) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.attrs.fixed = fixed;
        }
    }

    fn require(&self, id: &str) -> Result<usize, GraphError> {
        self.index_of(id)
            .ok_or_else(|| GraphError::MissingEndpoint(id.to_string()))
    }
}

impl GraphStore for GraphModel {
    fn add_node(&mut self, id: &str, attrs: NodeAttributes) -> Result<(), GraphError> {
        if self.index.contains_key(id) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        let idx = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.to_string(),
            kind: NodeKind::of(id),
            attrs,
        });
        self.index.insert(id.to_string(), idx);
        self.adjacency.push(BTreeSet::new());
        Ok(())
    }

    fn add_edge(&mut self, a: &str, b: &str) -> Result<(), GraphError> {
        let source = self.require(a)?;
        let target = self.require(b)?;
        if self.adjacent(source, target) {
            return Err(GraphError::DuplicateEdge(a.to_string(), b.to_string()));
        }

        let kind = if self.nodes[source].kind == NodeKind::Problem
            || self.nodes[target].kind == NodeKind::Problem
        {
            EdgeKind::Membership
        } else {
            EdgeKind::Hierarchy
        };

        self.edges.push(GraphEdge {
            source,
            target,
            kind,
        });
        self.adjacency[source].insert(target);
        self.adjacency[target].insert(source);
        Ok(())
    }

    fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.adjacent(a, b),
            _ => false,
        }
    }

    fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.neighbor_indices(idx)
            .map(|n| self.nodes[n].id.as_str())
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
