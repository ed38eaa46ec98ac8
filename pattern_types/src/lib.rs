//! Pattern Graph Types - Foundation Data Shapes
//!
//! Pure data structures for the pattern graph: the records deserialized from the
//! static JSON datasets and the error enums shared by every layer above.
//!
//! ## Contents
//!
//! - `Pattern` / `Subpattern` - the technique hierarchy (`patterns.json`)
//! - `Problem` / `Difficulty` - individual exercises (`problems.json`)
//! - `Company` - company tags (`companies.json`)
//! - `Collections` - curated named problem sets (`collections.json`)
//! - `Dataset` - the four files joined together
//! - `GraphError` / `LoadError`
//!
//! ## Rules
//!
//! 1. **NO BUSINESS LOGIC** - only data structures, constructors and lookups
//! 2. **NO WORKSPACE DEPENDENCIES**
//! 3. **SERIALIZABLE** - every record round-trips through serde

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Problem difficulty as published by the problem source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties in display order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Get the wire name ("Easy", "Medium", "Hard")
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

// ============================================================================
// PATTERN HIERARCHY
// ============================================================================

/// A named specialization within a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subpattern {
    /// Unique within the parent pattern
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Subpattern {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Top-level algorithmic technique category (e.g. "Sliding Window")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Owned subpatterns, in display order
    #[serde(default)]
    pub subpatterns: Vec<Subpattern>,
}

impl Pattern {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            subpatterns: Vec::new(),
        }
    }

    /// Builder: append a subpattern
    pub fn with_subpattern(mut self, sub: Subpattern) -> Self {
        self.subpatterns.push(sub);
        self
    }

    /// Check whether this pattern declares a subpattern with the given slug
    pub fn has_subpattern(&self, sub_slug: &str) -> bool {
        self.subpatterns.iter().any(|s| s.slug == sub_slug)
    }
}

// ============================================================================
// PROBLEMS
// ============================================================================

/// A single coding exercise tagged with zero or more subpatterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: u32,
    pub slug: String,
    pub difficulty: Difficulty,
    pub name: String,
    /// Subpattern slugs (soft references, may dangle)
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Problem {
    pub fn new(
        id: u32,
        slug: impl Into<String>,
        name: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            slug: slug.into(),
            difficulty,
            name: name.into(),
            patterns: Vec::new(),
        }
    }

    /// Builder: tag with a subpattern slug
    pub fn with_pattern(mut self, sub_slug: impl Into<String>) -> Self {
        self.patterns.push(sub_slug.into());
        self
    }
}

// ============================================================================
// COMPANIES AND COLLECTIONS
// ============================================================================

/// Company tag - used only for filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub problems: BTreeSet<u32>,
}

impl Company {
    pub fn new(name: impl Into<String>, problems: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            problems: problems.into_iter().collect(),
        }
    }
}

/// Collection name → problem ids (`collections.json` is a JSON object)
pub type Collections = BTreeMap<String, BTreeSet<u32>>;

// ============================================================================
// DATASET
// ============================================================================

/// The four static datasets, loaded together or not at all
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub patterns: Vec<Pattern>,
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub collections: Collections,
}

impl Dataset {
    pub fn new(patterns: Vec<Pattern>, problems: Vec<Problem>) -> Self {
        Self {
            patterns,
            problems,
            companies: Vec::new(),
            collections: Collections::new(),
        }
    }

    /// Look up a company by exact name
    pub fn company(&self, name: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.name == name)
    }

    /// Look up a collection by exact name
    pub fn collection(&self, name: &str) -> Option<&BTreeSet<u32>> {
        self.collections.get(name)
    }

    /// Look up a pattern by slug
    pub fn pattern(&self, slug: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.slug == slug)
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Graph store failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Edge endpoint not found: {0}")]
    MissingEndpoint(String),

    #[error("Edge already exists: {0} -- {1}")]
    DuplicateEdge(String, String),

    #[error("Slug '{0}' collides with the node id scheme")]
    InvalidSlug(String),
}

/// Dataset loading failures. Any of these keeps the view out of the ready state.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("HTTP request for {file} failed: {message}")]
    Http { file: String, message: String },

    #[error("HTTP {status} fetching {file}")]
    Status { file: String, status: u16 },

    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid data source '{0}': {1}")]
    InvalidSource(String, String),
}

// ============================================================================
// TESTS
// ============================================================================
