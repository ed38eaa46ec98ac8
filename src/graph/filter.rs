//! Filter state - the immutable snapshot the reducer is parameterized by
//!
//! The view owns one `FilterState` and mutates it in response to user input.
//! The reducer only ever sees `&FilterState`, never the graph's mutable parts.

use std::collections::BTreeSet;

use pattern_types::{Collections, Company, Difficulty, Pattern};
use serde::{Deserialize, Serialize};

// =============================================================================
// PATTERN FILTER
// =============================================================================

/// Token prefix selecting a whole category
pub const PARENT_PREFIX: &str = "parent:";

/// Pattern/subpattern selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternFilter {
    /// Whole category: `parent:<patternSlug>`
    Parent(String),
    /// Single subpattern: `<subSlug>`
    Leaf(String),
}

impl PatternFilter {
    /// Parse a dropdown token. The empty token means "no pattern filter".
    pub fn parse(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        Some(match token.strip_prefix(PARENT_PREFIX) {
            Some(slug) => PatternFilter::Parent(slug.to_string()),
            None => PatternFilter::Leaf(token.to_string()),
        })
    }

    /// Dropdown token for this selection
    pub fn token(&self) -> String {
        match self {
            PatternFilter::Parent(slug) => format!("{}{}", PARENT_PREFIX, slug),
            PatternFilter::Leaf(slug) => slug.clone(),
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            PatternFilter::Parent(slug) | PatternFilter::Leaf(slug) => slug,
        }
    }
}

impl std::fmt::Display for PatternFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}

// =============================================================================
// FILTER STATE
// =============================================================================

/// Composite filter + hover state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Visible difficulties (default: all)
    pub difficulties: BTreeSet<Difficulty>,
    /// Free-text search over problem name and numeric id
    pub search: String,
    pub pattern: Option<PatternFilter>,
    pub company: Option<String>,
    pub collection: Option<String>,
    /// Show pattern/subpattern nodes
    pub show_patterns: bool,
    /// Node id under the pointer
    pub hovered: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            difficulties: Difficulty::ALL.into_iter().collect(),
            search: String::new(),
            pattern: None,
            company: None,
            collection: None,
            show_patterns: true,
            hovered: None,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: restrict difficulties
    pub fn with_difficulties(mut self, difficulties: impl IntoIterator<Item = Difficulty>) -> Self {
        self.difficulties = difficulties.into_iter().collect();
        self
    }

    /// Builder: search text
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    /// Builder: pattern filter from a dropdown token
    pub fn with_pattern(mut self, token: &str) -> Self {
        self.pattern = PatternFilter::parse(token);
        self
    }

    /// Builder: company filter
    pub fn with_company(mut self, name: impl Into<String>) -> Self {
        self.company = non_empty(name.into());
        self
    }

    /// Builder: collection filter
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection = non_empty(name.into());
        self
    }

    /// Builder: show/hide category nodes
    pub fn with_show_patterns(mut self, show: bool) -> Self {
        self.show_patterns = show;
        self
    }

    /// Builder: hovered node
    pub fn with_hover(mut self, node_id: impl Into<String>) -> Self {
        self.hovered = Some(node_id.into());
        self
    }

    /// Add the difficulty if absent, remove it if present
    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        if !self.difficulties.remove(&difficulty) {
            self.difficulties.insert(difficulty);
        }
    }

    /// Select the token, or clear the selection if it is already active
    pub fn toggle_pattern(&mut self, token: &str) {
        let next = PatternFilter::parse(token);
        if self.pattern == next {
            self.pattern = None;
        } else {
            self.pattern = next;
        }
    }

    /// True if any filter dimension (not hover) narrows the view
    pub fn is_filtering(&self) -> bool {
        self.difficulties.len() < Difficulty::ALL.len()
            || !self.search.is_empty()
            || self.pattern.is_some()
            || self.company.is_some()
            || self.collection.is_some()
            || !self.show_patterns
    }

}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// =============================================================================
// DROPDOWN HELPERS
// =============================================================================

/// One entry of the pattern dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternOption {
    pub token: String,
    pub label: String,
    /// 0 = "all" / category, 1 = subpattern
    pub depth: u8,
}

/// Pattern dropdown entries: "All patterns", then each category followed by
/// its subpatterns
pub fn pattern_options(patterns: &[Pattern]) -> Vec<PatternOption> {
    let mut options = vec![PatternOption {
        token: String::new(),
        label: "All patterns".to_string(),
        depth: 0,
    }];
    for pattern in patterns {
        options.push(PatternOption {
            token: PatternFilter::Parent(pattern.slug.clone()).token(),
            label: pattern.name.clone(),
            depth: 0,
        });
        options.extend(pattern.subpatterns.iter().map(|sub| PatternOption {
            token: sub.slug.clone(),
            label: sub.name.clone(),
            depth: 1,
        }));
    }
    options
}

/// Collection dropdown entries, in map order
pub fn collection_names(collections: &Collections) -> Vec<&str> {
    collections.keys().map(String::as_str).collect()
}

/// Companies whose name contains `query` (case-insensitive)
pub fn search_companies<'a>(companies: &'a [Company], query: &str) -> Vec<&'a Company> {
    if query.is_empty() {
        return companies.iter().collect();
    }
    let query = query.to_lowercase();
    companies
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&query))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
