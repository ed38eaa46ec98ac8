//! Node identifier scheme
//!
//! Three disjoint id shapes share one namespace:
//!
//! ```text
//! two-pointers                 pattern
//! two-pointers/opposite-ends   subpattern (parentSlug/subSlug)
//! problem-167                  problem
//! ```

use serde::{Deserialize, Serialize};

/// Prefix for problem node ids
pub const PROBLEM_PREFIX: &str = "problem-";

/// Separator between parent pattern slug and subpattern slug
pub const SEPARATOR: char = '/';

/// Node kind, derived from the id shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Pattern,
    Subpattern,
    Problem,
}

impl NodeKind {
    /// Classify a node id by its shape
    pub fn of(id: &str) -> Self {
        if id.starts_with(PROBLEM_PREFIX) {
            NodeKind::Problem
        } else if id.contains(SEPARATOR) {
            NodeKind::Subpattern
        } else {
            NodeKind::Pattern
        }
    }

    /// Pattern and subpattern nodes form the category tree
    pub fn is_category(&self) -> bool {
        matches!(self, NodeKind::Pattern | NodeKind::Subpattern)
    }
}

pub fn pattern_id(slug: &str) -> String {
    slug.to_string()
}

pub fn subpattern_id(parent_slug: &str, sub_slug: &str) -> String {
    format!("{}{}{}", parent_slug, SEPARATOR, sub_slug)
}

pub fn problem_id(id: u32) -> String {
    format!("{}{}", PROBLEM_PREFIX, id)
}

/// Numeric problem id carried by a problem node id
pub fn parse_problem_id(node_id: &str) -> Option<u32> {
    node_id.strip_prefix(PROBLEM_PREFIX)?.parse().ok()
}

/// A pattern slug must not look like a subpattern or problem id
pub fn is_valid_pattern_slug(slug: &str) -> bool {
    !slug.contains(SEPARATOR) && !slug.starts_with(PROBLEM_PREFIX)
}

/// A subpattern slug must not contain the separator
pub fn is_valid_subpattern_slug(slug: &str) -> bool {
    !slug.contains(SEPARATOR)
}

/// Parent pattern slug of a pattern or subpattern id
pub fn parent_slug(node_id: &str) -> &str {
    node_id.split(SEPARATOR).next().unwrap_or(node_id)
}

/// True if `node_id` is `slug` itself or one of its `slug/...` children
pub fn in_category(node_id: &str, slug: &str) -> bool {
    match node_id.strip_prefix(slug) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(NodeKind::of("sliding-window"), NodeKind::Pattern);
        assert_eq!(NodeKind::of("sliding-window/fixed"), NodeKind::Subpattern);
        assert_eq!(NodeKind::of("problem-42"), NodeKind::Problem);
        assert!(NodeKind::Subpattern.is_category());
        assert!(!NodeKind::Problem.is_category());
    }

    #[test]
    fn test_problem_id_round_trip() {
        assert_eq!(problem_id(167), "problem-167");
        assert_eq!(parse_problem_id("problem-167"), Some(167));
        assert_eq!(parse_problem_id("two-pointers"), None);
    }

    #[test]
    fn test_in_category_is_segment_aware() {
        assert!(in_category("graph", "graph"));
        assert!(in_category("graph/bfs", "graph"));
        assert!(!in_category("graph-theory", "graph"));
        assert!(!in_category("graph-theory/dsu", "graph"));
    }

    #[test]
    fn test_slug_validity() {
        assert!(is_valid_pattern_slug("two-pointers"));
        assert!(!is_valid_pattern_slug("a/b"));
        assert!(!is_valid_pattern_slug("problem-set"));
        assert!(is_valid_subpattern_slug("problem-style"));
        assert!(!is_valid_subpattern_slug("x/y"));
    }

    #[test]
    fn test_parent_slug() {
        assert_eq!(parent_slug("dp/knapsack"), "dp");
        assert_eq!(parent_slug("dp"), "dp");
    }
}
