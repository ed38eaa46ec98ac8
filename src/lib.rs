//! Leet Compass - pattern/problem graph engine
//!
//! Loads the static pattern, problem, company and collection datasets, builds
//! a positioned node graph, and derives per-node/per-edge display overlays from
//! the current filter and hover state.
//!
//! ## Modules
//!
//! - `graph` - graph model, layout, filter/highlight reducer, renderer seam, view
//! - `api` - parallel dataset loading from a directory or base URL
//! - `solved` - solved-problem markers
//! - `config` - environment-driven view configuration

pub mod api;
pub mod config;
pub mod graph;
pub mod solved;

pub use api::{DataClient, DataSource};
pub use config::ViewConfig;
pub use graph::{
    reduce, ClickAction, ClickBehavior, FilterState, GraphOverlay, LoadState, PatternGraph,
    PatternGraphView,
};
pub use pattern_types::{
    Collections, Company, Dataset, Difficulty, GraphError, LoadError, Pattern, Problem, Subpattern,
};
pub use solved::SolvedSet;
