//! Graph construction - dataset → positioned `PatternGraph` snapshot
//!
//! ```text
//! Dataset (patterns, problems, companies, collections)
//!        │
//!        ▼
//! GraphBuilder ── pattern nodes ── subpattern nodes ── hierarchy edges
//!        │        problem nodes ── membership edges (resolvable slugs only)
//!        ▼
//! LayoutEngine (hierarchical or radial + force)
//!        │
//!        ▼
//! PatternGraph (read-only from here on)
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use pattern_types::{Dataset, Difficulty, GraphError, Problem};
use serde::Serialize;

use super::colors;
use super::ids;
use super::layout::{LayoutAssigner, LayoutEngine};
use super::store::{GraphModel, GraphStore, NodeAttributes, NodeShape};
use crate::solved::SolvedSet;

/// Base node sizes
pub const PATTERN_SIZE: f32 = 16.0;
pub const SUBPATTERN_SIZE: f32 = 12.0;
pub const PROBLEM_SIZE: f32 = 5.0;

// =============================================================================
// LOOKUP RECORDS
// =============================================================================

/// Immutable per-problem record, keyed by problem node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemSummary {
    pub id: u32,
    pub slug: String,
    pub name: String,
    pub difficulty: Difficulty,
    /// Subpattern slugs as listed in the dataset (including dangling ones)
    pub patterns: Vec<String>,
    pub solved: bool,
}

impl ProblemSummary {
    fn from_problem(problem: &Problem, solved: bool) -> Self {
        Self {
            id: problem.id,
            slug: problem.slug.clone(),
            name: problem.name.clone(),
            difficulty: problem.difficulty,
            patterns: problem.patterns.clone(),
            solved,
        }
    }

    /// Display label: "<id> - <name>"
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }
}

/// Problem node id → summary
pub type ProblemIndex = BTreeMap<String, ProblemSummary>;

/// Subpattern slug resolution
///
/// A subpattern slug shared by several patterns resolves to the first pattern
/// that declares it.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    /// sub slug → `parent/sub` node id
    sub_to_node: HashMap<String, String>,
    /// pattern slug → its subpattern slugs
    category_subs: HashMap<String, BTreeSet<String>>,
    /// Pattern slugs in dataset order
    order: Vec<String>,
}

impl PatternIndex {
    /// Composite node id for a subpattern slug
    pub fn resolve(&self, sub_slug: &str) -> Option<&str> {
        self.sub_to_node.get(sub_slug).map(String::as_str)
    }

    /// Subpattern slugs declared by a pattern
    pub fn subpatterns_of(&self, pattern_slug: &str) -> Option<&BTreeSet<String>> {
        self.category_subs.get(pattern_slug)
    }

    /// Pattern slugs in dataset order
    pub fn patterns(&self) -> &[String] {
        &self.order
    }
}

// =============================================================================
// PATTERN GRAPH SNAPSHOT
// =============================================================================

/// Everything the reducer needs for one dataset snapshot
#[derive(Debug, Clone, Default)]
pub struct PatternGraph {
    pub model: GraphModel,
    pub problems: ProblemIndex,
    pub patterns: PatternIndex,
    /// Company name → problem ids
    pub companies: BTreeMap<String, BTreeSet<u32>>,
    /// Collection name → problem ids
    pub collections: BTreeMap<String, BTreeSet<u32>>,
}

impl PatternGraph {
    /// Total number of problem nodes ("M" in "N of M shown")
    pub fn total_problems(&self) -> usize {
        self.problems.len()
    }

    pub fn problem(&self, node_id: &str) -> Option<&ProblemSummary> {
        self.problems.get(node_id)
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a `PatternGraph` from a dataset
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    layout: LayoutEngine,
    solved: SolvedSet,
}

impl GraphBuilder {
    pub fn new(layout: LayoutEngine) -> Self {
        Self {
            layout,
            solved: SolvedSet::default(),
        }
    }

    /// Builder: mark these problem ids as solved
    pub fn with_solved(mut self, solved: SolvedSet) -> Self {
        self.solved = solved;
        self
    }

    pub fn build(&self, dataset: &Dataset) -> Result<PatternGraph, GraphError> {
        let mut model = GraphModel::new();
        let mut patterns = PatternIndex::default();

        for pattern in &dataset.patterns {
            if !ids::is_valid_pattern_slug(&pattern.slug) {
                return Err(GraphError::InvalidSlug(pattern.slug.clone()));
            }
            model.add_node(
                &ids::pattern_id(&pattern.slug),
                NodeAttributes::new(&pattern.name, colors::PATTERN, PATTERN_SIZE),
            )?;
            patterns.order.push(pattern.slug.clone());
            let subs = patterns
                .category_subs
                .entry(pattern.slug.clone())
                .or_default();

            for sub in &pattern.subpatterns {
                if !ids::is_valid_subpattern_slug(&sub.slug) {
                    return Err(GraphError::InvalidSlug(sub.slug.clone()));
                }
                let sub_id = ids::subpattern_id(&pattern.slug, &sub.slug);
                model.add_node(
                    &sub_id,
                    NodeAttributes::new(&sub.name, colors::SUBPATTERN, SUBPATTERN_SIZE),
                )?;
                model.add_edge(&pattern.slug, &sub_id)?;
                subs.insert(sub.slug.clone());

                if let Some(existing) = patterns.sub_to_node.get(&sub.slug) {
                    tracing::warn!(
                        "subpattern slug '{}' declared again by '{}', keeping {}",
                        sub.slug,
                        pattern.slug,
                        existing
                    );
                } else {
                    patterns.sub_to_node.insert(sub.slug.clone(), sub_id);
                }
            }
        }

        let mut problems = ProblemIndex::new();
        let mut dangling = 0usize;
        for problem in &dataset.problems {
            let node_id = ids::problem_id(problem.id);
            let summary = ProblemSummary::from_problem(problem, self.solved.contains(problem.id));
            let shape = if summary.solved {
                NodeShape::Square
            } else {
                NodeShape::Circle
            };
            model.add_node(
                &node_id,
                NodeAttributes::new(
                    summary.label(),
                    colors::difficulty_color(problem.difficulty),
                    PROBLEM_SIZE,
                )
                .with_shape(shape),
            )?;

            for sub_slug in &problem.patterns {
                match patterns.resolve(sub_slug) {
                    Some(sub_id) if !model.has_edge(&node_id, sub_id) => {
                        model.add_edge(&node_id, sub_id)?;
                    }
                    Some(_) => {}
                    None => dangling += 1,
                }
            }
            problems.insert(node_id, summary);
        }

        if dangling > 0 {
            tracing::debug!("{} dangling subpattern references skipped", dangling);
        }

        self.layout.assign(&mut model, &problems);

        tracing::info!(
            nodes = model.node_count(),
            edges = model.edge_count(),
            problems = problems.len(),
            mode = ?self.layout.mode,
            "pattern graph built"
        );

        Ok(PatternGraph {
            model,
            problems,
            patterns,
            companies: dataset
                .companies
                .iter()
                .map(|c| (c.name.clone(), c.problems.clone()))
                .collect(),
            collections: dataset.collections.clone(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pattern_types::{Pattern, Subpattern};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![Pattern::new("P", "Pattern P")
                .with_subpattern(Subpattern::new("A", "Sub A"))
                .with_subpattern(Subpattern::new("B", "Sub B"))],
            vec![
                Problem::new(1, "one", "One", Difficulty::Easy).with_pattern("A"),
                Problem::new(2, "two", "Two", Difficulty::Hard)
                    .with_pattern("B")
                    .with_pattern("ghost"),
            ],
        )
    }

    #[test]
    fn test_builds_nodes_and_edges() {
        let graph = GraphBuilder::default().build(&dataset()).unwrap();

        assert_eq!(graph.model.node_count(), 5);
        // 2 hierarchy + 2 membership, dangling "ghost" skipped
        assert_eq!(graph.model.edge_count(), 4);
        assert!(graph.model.has_edge("P", "P/A"));
        assert!(graph.model.has_edge("problem-1", "P/A"));
        assert!(graph.model.has_edge("P/B", "problem-2"));
        assert!(!graph.model.has_edge("problem-1", "P/B"));
        assert_eq!(graph.total_problems(), 2);
    }

    #[test]
    fn test_problem_attributes() {
        let graph = GraphBuilder::default().build(&dataset()).unwrap();
        let node = graph.model.node("problem-2").unwrap();
        assert_eq!(node.attrs.label, "2 - Two");
        assert_eq!(node.attrs.color, colors::HARD);
        assert_eq!(node.attrs.size, PROBLEM_SIZE);
        assert_eq!(node.attrs.shape, NodeShape::Circle);
    }

    #[test]
    fn test_solved_problems_use_square_shape() {
        let graph = GraphBuilder::default()
            .with_solved(SolvedSet::from_ids([1]))
            .build(&dataset())
            .unwrap();
        assert_eq!(
            graph.model.node("problem-1").unwrap().attrs.shape,
            NodeShape::Square
        );
        assert!(graph.problem("problem-1").unwrap().solved);
        assert!(!graph.problem("problem-2").unwrap().solved);
    }

    #[test]
    fn test_repeated_subpattern_reference_yields_one_edge() {
        let mut data = dataset();
        data.problems[0].patterns.push("A".into());
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert_eq!(graph.model.edge_count(), 4);
    }

    #[test]
    fn test_shared_subpattern_slug_resolves_to_first_pattern() {
        let mut data = dataset();
        data.patterns
            .push(Pattern::new("Q", "Pattern Q").with_subpattern(Subpattern::new("A", "Other A")));
        let graph = GraphBuilder::default().build(&data).unwrap();

        assert_eq!(graph.patterns.resolve("A"), Some("P/A"));
        assert!(graph.model.has_edge("problem-1", "P/A"));
        assert!(!graph.model.has_edge("problem-1", "Q/A"));
    }

    #[test]
    fn test_duplicate_problem_id_fails() {
        let mut data = dataset();
        data.problems
            .push(Problem::new(1, "dup", "Dup", Difficulty::Medium));
        assert_eq!(
            GraphBuilder::default().build(&data).unwrap_err(),
            GraphError::DuplicateNode("problem-1".into())
        );
    }

    #[test]
    fn test_slug_colliding_with_id_scheme_fails() {
        for slug in ["problem-solving", "arrays/hashing"] {
            let mut data = dataset();
            data.patterns.push(Pattern::new(slug, "Bad"));
            assert_eq!(
                GraphBuilder::default().build(&data).unwrap_err(),
                GraphError::InvalidSlug(slug.into())
            );
        }

        let mut data = dataset();
        data.patterns[0]
            .subpatterns
            .push(Subpattern::new("x/y", "Bad"));
        assert_eq!(
            GraphBuilder::default().build(&data).unwrap_err(),
            GraphError::InvalidSlug("x/y".into())
        );
    }

    #[test]
    fn test_company_and_collection_lookup_copied() {
        let mut data = dataset();
        data.companies
            .push(pattern_types::Company::new("Acme", [2]));
        data.collections
            .insert("Starter".into(), [1].into_iter().collect());
        let graph = GraphBuilder::default().build(&data).unwrap();
        assert!(graph.companies["Acme"].contains(&2));
        assert!(graph.collections["Starter"].contains(&1));
    }
}
