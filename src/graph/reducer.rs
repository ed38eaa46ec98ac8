//! Filter/highlight reducer
//!
//! Pure function from `(PatternGraph, FilterState)` to a full `GraphOverlay`:
//! one `NodeOverlay` per node and one `EdgeOverlay` per edge, index-aligned
//! with the graph model. The overlay is recomputed in full on every call; the
//! same inputs always produce the same overlay.
//!
//! # Node visibility (first hide wins)
//!
//! ```text
//! category node ── show_patterns off ─────────────────────────► hidden
//!               └─ pattern filter: parent → outside category ──► hidden
//!                                  leaf   → not sub / parent ──► hidden
//! problem node ─── difficulty ∧ search ∧ company ∧ collection ∧ pattern
//! ```
//!
//! # Hover overlay (visible nodes only)
//!
//! Emphasized nodes are raised and enlarged. Everything else is grayed out,
//! except that hovering a problem leaves the category tree untouched.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::build::{PatternGraph, ProblemSummary};
use super::colors;
use super::filter::{FilterState, PatternFilter};
use super::ids::{self, NodeKind};
use super::store::GraphNode;

/// Size multiplier for emphasized nodes
pub const EMPHASIS_FACTOR: f32 = 1.5;

// =============================================================================
// OVERLAY TYPES
// =============================================================================

/// Derived display attributes for one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOverlay {
    pub id: String,
    pub hidden: bool,
    /// Color override (desaturation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Size override (emphasis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    pub z_index: u8,
    pub highlighted: bool,
}

impl NodeOverlay {
    fn visible(id: &str) -> Self {
        Self {
            id: id.to_string(),
            hidden: false,
            color: None,
            size: None,
            z_index: 0,
            highlighted: false,
        }
    }
}

/// Derived display attributes for one edge
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeOverlay {
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub z_index: u8,
}

/// Full overlay for one graph snapshot under one filter state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphOverlay {
    /// Index-aligned with `GraphModel::nodes()`
    pub nodes: Vec<NodeOverlay>,
    /// Index-aligned with `GraphModel::edges()`
    pub edges: Vec<EdgeOverlay>,
    /// Problem nodes left visible ("N" in "N of M shown")
    pub visible_problems: usize,
}

impl GraphOverlay {
    /// Overlay for a node id
    pub fn node(&self, id: &str) -> Option<&NodeOverlay> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Ids of visible nodes of the given kind, in graph order
    pub fn visible_ids(&self, kind: NodeKind) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| !n.hidden && NodeKind::of(&n.id) == kind)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// True if the node exists and is not hidden
    pub fn is_visible(&self, id: &str) -> bool {
        self.node(id).is_some_and(|n| !n.hidden)
    }
}

// =============================================================================
// VISIBILITY
// =============================================================================

/// Filter inputs resolved once per reduction
struct FilterContext<'a> {
    graph: &'a PatternGraph,
    filter: &'a FilterState,
    query: String,
    /// `None` when no company is selected or the name is unknown
    company: Option<&'a BTreeSet<u32>>,
    collection: Option<&'a BTreeSet<u32>>,
    /// Leaf filter target resolved to its subpattern node id
    leaf_node: Option<&'a str>,
}

impl<'a> FilterContext<'a> {
    fn new(graph: &'a PatternGraph, filter: &'a FilterState) -> Self {
        let company = filter.company.as_deref().and_then(|name| {
            let set = graph.companies.get(name);
            if set.is_none() {
                tracing::debug!("company filter '{}' not in dataset, ignoring", name);
            }
            set
        });
        let collection = filter.collection.as_deref().and_then(|name| {
            let set = graph.collections.get(name);
            if set.is_none() {
                tracing::debug!("collection filter '{}' not in dataset, ignoring", name);
            }
            set
        });
        let leaf_node = match &filter.pattern {
            Some(PatternFilter::Leaf(slug)) => graph.patterns.resolve(slug),
            _ => None,
        };

        Self {
            graph,
            filter,
            query: filter.search.to_lowercase(),
            company,
            collection,
            leaf_node,
        }
    }

    fn is_hidden(&self, node: &GraphNode) -> bool {
        match node.kind {
            NodeKind::Pattern | NodeKind::Subpattern => self.category_hidden(&node.id),
            NodeKind::Problem => match self.graph.problem(&node.id) {
                Some(summary) => self.problem_hidden(summary),
                None => true,
            },
        }
    }

    fn category_hidden(&self, id: &str) -> bool {
        if !self.filter.show_patterns {
            return true;
        }
        match &self.filter.pattern {
            None => false,
            Some(PatternFilter::Parent(slug)) => !ids::in_category(id, slug),
            Some(PatternFilter::Leaf(_)) => match self.leaf_node {
                Some(sub_id) => id != sub_id && id != ids::parent_slug(sub_id),
                None => true,
            },
        }
    }

    fn problem_hidden(&self, problem: &ProblemSummary) -> bool {
        if !self.filter.difficulties.contains(&problem.difficulty) {
            return true;
        }
        if !self.query.is_empty()
            && !problem.name.to_lowercase().contains(&self.query)
            && !problem.id.to_string().contains(&self.query)
        {
            return true;
        }
        if self.company.is_some_and(|members| !members.contains(&problem.id)) {
            return true;
        }
        if self.collection.is_some_and(|members| !members.contains(&problem.id)) {
            return true;
        }
        match &self.filter.pattern {
            None => false,
            Some(PatternFilter::Parent(slug)) => match self.graph.patterns.subpatterns_of(slug) {
                Some(subs) => !problem.patterns.iter().any(|p| subs.contains(p)),
                None => true,
            },
            Some(PatternFilter::Leaf(slug)) => !problem.patterns.iter().any(|p| p == slug),
        }
    }
}

// =============================================================================
// HOVER
// =============================================================================

/// Hovered node resolved against the graph
struct Hover<'a> {
    idx: usize,
    id: &'a str,
    kind: NodeKind,
    /// Problems connected to any subpattern under a hovered pattern
    category_problems: HashSet<usize>,
}

impl<'a> Hover<'a> {
    fn resolve(graph: &'a PatternGraph, hovered: Option<&str>) -> Option<Self> {
        let idx = graph.model.index_of(hovered?)?;
        let node = &graph.model.nodes()[idx];
        let kind = node.kind;
        let id = node.id.as_str();

        let mut category_problems = HashSet::new();
        if kind == NodeKind::Pattern {
            for (sub_idx, sub) in graph.model.nodes().iter().enumerate() {
                if sub.kind != NodeKind::Subpattern || !ids::in_category(&sub.id, id) {
                    continue;
                }
                category_problems.extend(
                    graph
                        .model
                        .neighbor_indices(sub_idx)
                        .filter(|&n| graph.model.nodes()[n].kind == NodeKind::Problem),
                );
            }
        }

        Some(Self {
            idx,
            id,
            kind,
            category_problems,
        })
    }

    fn emphasizes(&self, graph: &PatternGraph, idx: usize, node: &GraphNode) -> bool {
        if idx == self.idx {
            return true;
        }
        // Subpattern of the hovered pattern
        if self.kind == NodeKind::Pattern
            && node.kind == NodeKind::Subpattern
            && ids::in_category(&node.id, self.id)
        {
            return true;
        }
        // Parent pattern of the hovered subpattern
        if node.kind == NodeKind::Pattern
            && self.kind == NodeKind::Subpattern
            && ids::parent_slug(self.id) == node.id
        {
            return true;
        }
        if graph.model.adjacent(idx, self.idx) {
            return true;
        }
        self.category_problems.contains(&idx)
    }

    /// Hovering a problem never grays out the category tree
    fn desaturates(&self, kind: NodeKind) -> bool {
        self.kind != NodeKind::Problem || kind == NodeKind::Problem
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Compute the full overlay for `graph` under `filter`
pub fn reduce(graph: &PatternGraph, filter: &FilterState) -> GraphOverlay {
    let ctx = FilterContext::new(graph, filter);
    let model = &graph.model;

    let mut nodes: Vec<NodeOverlay> = model
        .nodes()
        .iter()
        .map(|node| {
            let mut overlay = NodeOverlay::visible(&node.id);
            overlay.hidden = ctx.is_hidden(node);
            overlay
        })
        .collect();

    let hover = Hover::resolve(graph, filter.hovered.as_deref());

    if let Some(hover) = &hover {
        for (idx, node) in model.nodes().iter().enumerate() {
            let overlay = &mut nodes[idx];
            if overlay.hidden {
                continue;
            }
            if hover.emphasizes(graph, idx, node) {
                overlay.z_index = 1;
                overlay.highlighted = true;
                overlay.size = Some(node.attrs.size * EMPHASIS_FACTOR);
            } else if hover.desaturates(node.kind) {
                overlay.color = Some(colors::DESATURATED.to_string());
                overlay.z_index = 0;
            }
        }
    }

    let edges = model
        .edges()
        .iter()
        .map(|edge| {
            if nodes[edge.source].hidden || nodes[edge.target].hidden {
                return EdgeOverlay {
                    hidden: true,
                    ..EdgeOverlay::default()
                };
            }
            match &hover {
                Some(hover) if edge.touches(hover.idx) => EdgeOverlay {
                    z_index: 1,
                    ..EdgeOverlay::default()
                },
                Some(hover) if hover.kind != NodeKind::Problem => EdgeOverlay {
                    color: Some(colors::DESATURATED.to_string()),
                    ..EdgeOverlay::default()
                },
                _ => EdgeOverlay::default(),
            }
        })
        .collect();

    let visible_problems = model
        .nodes()
        .iter()
        .zip(&nodes)
        .filter(|(node, overlay)| node.kind == NodeKind::Problem && !overlay.hidden)
        .count();

    GraphOverlay {
        nodes,
        edges,
        visible_problems,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::GraphBuilder;
    use pattern_types::{Company, Dataset, Difficulty, Pattern, Problem, Subpattern};

    fn graph() -> PatternGraph {
        let mut dataset = Dataset::new(
            vec![
                Pattern::new("P", "Pattern P")
                    .with_subpattern(Subpattern::new("A", "Sub A"))
                    .with_subpattern(Subpattern::new("B", "Sub B")),
                Pattern::new("Q", "Pattern Q").with_subpattern(Subpattern::new("C", "Sub C")),
            ],
            vec![
                Problem::new(1, "one", "Two Sum", Difficulty::Easy).with_pattern("A"),
                Problem::new(2, "two", "Merge Intervals", Difficulty::Hard).with_pattern("B"),
                Problem::new(30, "thirty", "Course Schedule", Difficulty::Medium)
                    .with_pattern("C"),
            ],
        );
        dataset.companies.push(Company::new("Acme", [1, 30]));
        dataset
            .collections
            .insert("Starter".into(), [2].into_iter().collect());
        GraphBuilder::default().build(&dataset).unwrap()
    }

    fn visible_problems(overlay: &GraphOverlay) -> Vec<&str> {
        overlay.visible_ids(NodeKind::Problem)
    }

    #[test]
    fn test_no_filter_shows_everything() {
        let overlay = reduce(&graph(), &FilterState::default());
        assert!(overlay.nodes.iter().all(|n| !n.hidden));
        assert!(overlay.edges.iter().all(|e| !e.hidden && e.color.is_none()));
        assert_eq!(overlay.visible_problems, 3);
    }

    #[test]
    fn test_hide_patterns_toggle() {
        let overlay = reduce(&graph(), &FilterState::default().with_show_patterns(false));
        assert!(overlay.visible_ids(NodeKind::Pattern).is_empty());
        assert!(overlay.visible_ids(NodeKind::Subpattern).is_empty());
        assert_eq!(overlay.visible_problems, 3);
        // Every edge touches a category node
        assert!(overlay.edges.iter().all(|e| e.hidden));
    }

    #[test]
    fn test_search_matches_name_or_id() {
        let g = graph();
        let by_name = reduce(&g, &FilterState::default().with_search("MERGE"));
        assert_eq!(visible_problems(&by_name), vec!["problem-2"]);

        let by_id = reduce(&g, &FilterState::default().with_search("3"));
        assert_eq!(visible_problems(&by_id), vec!["problem-30"]);
    }

    #[test]
    fn test_company_filter() {
        let overlay = reduce(&graph(), &FilterState::default().with_company("Acme"));
        assert_eq!(visible_problems(&overlay), vec!["problem-1", "problem-30"]);
    }

    #[test]
    fn test_unknown_company_is_noop() {
        let overlay = reduce(&graph(), &FilterState::default().with_company("Initech"));
        assert_eq!(overlay.visible_problems, 3);
    }

    #[test]
    fn test_collection_filter_combines_with_company() {
        let g = graph();
        let only_collection = reduce(&g, &FilterState::default().with_collection("Starter"));
        assert_eq!(visible_problems(&only_collection), vec!["problem-2"]);

        let both = reduce(
            &g,
            &FilterState::default()
                .with_collection("Starter")
                .with_company("Acme"),
        );
        assert_eq!(both.visible_problems, 0);
    }

    #[test]
    fn test_parent_filter_hides_other_categories() {
        let overlay = reduce(&graph(), &FilterState::default().with_pattern("parent:Q"));
        assert_eq!(overlay.visible_ids(NodeKind::Pattern), vec!["Q"]);
        assert_eq!(overlay.visible_ids(NodeKind::Subpattern), vec!["Q/C"]);
        assert_eq!(visible_problems(&overlay), vec!["problem-30"]);
    }

    #[test]
    fn test_unknown_parent_filter_hides_all() {
        let overlay = reduce(&graph(), &FilterState::default().with_pattern("parent:Z"));
        assert!(overlay.nodes.iter().all(|n| n.hidden));
    }

    #[test]
    fn test_leaf_filter_keeps_sub_and_parent() {
        let overlay = reduce(&graph(), &FilterState::default().with_pattern("B"));
        assert_eq!(overlay.visible_ids(NodeKind::Pattern), vec!["P"]);
        assert_eq!(overlay.visible_ids(NodeKind::Subpattern), vec!["P/B"]);
        assert_eq!(visible_problems(&overlay), vec!["problem-2"]);
    }

    #[test]
    fn test_hover_subpattern_emphasizes_parent_and_problems() {
        let overlay = reduce(&graph(), &FilterState::default().with_hover("P/A"));
        let hovered = overlay.node("P/A").unwrap();
        assert!(hovered.highlighted);
        assert_eq!(hovered.z_index, 1);
        assert_eq!(hovered.size, Some(12.0 * EMPHASIS_FACTOR));

        assert!(overlay.node("P").unwrap().highlighted);
        assert!(overlay.node("problem-1").unwrap().highlighted);

        let sibling = overlay.node("P/B").unwrap();
        assert!(!sibling.highlighted);
        assert_eq!(sibling.color.as_deref(), Some(colors::DESATURATED));
        let other_problem = overlay.node("problem-2").unwrap();
        assert_eq!(other_problem.color.as_deref(), Some(colors::DESATURATED));
    }

    #[test]
    fn test_hover_problem_leaves_categories_alone() {
        let overlay = reduce(&graph(), &FilterState::default().with_hover("problem-1"));
        assert!(overlay.node("problem-1").unwrap().highlighted);
        assert!(overlay.node("P/A").unwrap().highlighted);

        // Unrelated category node untouched
        let q = overlay.node("Q").unwrap();
        assert_eq!(q.color, None);
        assert!(!q.highlighted);
        // Unrelated problem desaturated
        assert_eq!(
            overlay.node("problem-2").unwrap().color.as_deref(),
            Some(colors::DESATURATED)
        );
        // No edge is grayed when a problem is hovered
        assert!(overlay.edges.iter().all(|e| e.color.is_none()));
    }

    #[test]
    fn test_hover_edges() {
        let g = graph();
        let overlay = reduce(&g, &FilterState::default().with_hover("P/A"));
        for (edge, edge_overlay) in g.model.edges().iter().zip(&overlay.edges) {
            let (a, b) = g.model.edge_endpoints(edge);
            if a == "P/A" || b == "P/A" {
                assert_eq!(edge_overlay.z_index, 1);
                assert_eq!(edge_overlay.color, None);
            } else {
                assert_eq!(edge_overlay.z_index, 0);
                assert_eq!(edge_overlay.color.as_deref(), Some(colors::DESATURATED));
            }
        }
    }

    #[test]
    fn test_hover_skips_hidden_nodes() {
        let overlay = reduce(
            &graph(),
            &FilterState::default()
                .with_difficulties([Difficulty::Hard])
                .with_hover("P"),
        );
        let hidden = overlay.node("problem-1").unwrap();
        assert!(hidden.hidden);
        assert!(!hidden.highlighted);
        assert_eq!(hidden.color, None);
    }

    #[test]
    fn test_hover_unknown_node_is_no_hover() {
        let g = graph();
        let plain = reduce(&g, &FilterState::default());
        let ghost = reduce(&g, &FilterState::default().with_hover("ghost"));
        assert_eq!(plain, ghost);
    }

    #[test]
    fn test_visible_count_ignores_hover() {
        let g = graph();
        let filter = FilterState::default().with_difficulties([Difficulty::Easy]);
        let plain = reduce(&g, &filter);
        let hovered = reduce(&g, &filter.clone().with_hover("Q"));
        assert_eq!(plain.visible_problems, 1);
        assert_eq!(hovered.visible_problems, 1);
    }
}
