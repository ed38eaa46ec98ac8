//! Layout engine - initial positions for every node
//!
//! Two modes behind one toggle:
//!
//! - **Hierarchical** (default): patterns stacked down a fixed column, each in a
//!   row block sized by its subpattern count; subpatterns in a second column
//!   inside the parent's block. The isolated category ("database") sits in its
//!   own block below a large gap. Problems are hash-placed inside one of two
//!   disjoint bands to the right. Category nodes are pinned.
//! - **ForceDirected**: radial seed placement followed by a fixed-budget force
//!   pass. Adequate for small graphs only.
//!
//! Problem placement in both modes uses `hash_to_position`, so a problem lands
//! in the same spot across reloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::build::ProblemIndex;
use super::force_sim::{self, ForceParams};
use super::ids::{self, NodeKind};
use super::store::GraphModel;

// =============================================================================
// HASH PLACEMENT
// =============================================================================

/// 32-bit polynomial rolling hash over UTF-16 code units
///
/// `hash = code + ((hash << 5) - hash)`, wrapped to i32 at every step.
pub fn hash_string(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, code| {
        (code as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// Deterministic grid position for a string key, both coordinates in `[0, scale)`
///
/// A scale of zero is treated as one. Collisions are accepted.
pub fn hash_to_position(s: &str, scale: u32) -> (u32, u32) {
    let scale = i64::from(scale.max(1));
    let hash = hash_string(s);
    let x = ((i64::from(hash) % scale) + scale) % scale;
    let y = ((i64::from(hash >> 8) % scale) + scale) % scale;
    // Both values are in [0, scale) and scale fits in u32
    (x as u32, y as u32)
}

// =============================================================================
// MODE / PARAMS
// =============================================================================

/// Which placement strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Hierarchical,
    ForceDirected,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Hierarchical => "hierarchical",
            LayoutMode::ForceDirected => "force",
        }
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hierarchical" | "manual" | "tree" => Ok(Self::Hierarchical),
            "force" | "force-directed" | "forcedirected" => Ok(Self::ForceDirected),
            other => Err(format!("unknown layout mode '{}'", other)),
        }
    }
}

/// Constants for hierarchical placement
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyParams {
    pub pattern_x: f32,
    pub subpattern_x: f32,
    /// Vertical distance between stacked subpatterns
    pub row_spacing: f32,
    /// Extra space between pattern blocks
    pub block_gap: f32,
    /// Pattern slug placed in its own region
    pub isolated_slug: String,
    /// Gap between the main hierarchy and the isolated region
    pub isolated_gap: f32,
    /// Left edge of both problem bands
    pub problem_x: f32,
    pub problem_band_width: f32,
    /// Grid resolution fed to `hash_to_position`
    pub problem_hash_scale: u32,
}

impl Default for HierarchyParams {
    fn default() -> Self {
        Self {
            pattern_x: 0.0,
            subpattern_x: 400.0,
            row_spacing: 40.0,
            block_gap: 40.0,
            isolated_slug: "database".to_string(),
            isolated_gap: 600.0,
            problem_x: 800.0,
            problem_band_width: 1200.0,
            problem_hash_scale: 1000,
        }
    }
}

/// Constants for radial seed placement
#[derive(Debug, Clone, PartialEq)]
pub struct RadialParams {
    pub radius: f32,
    /// Subpatterns sit this much further out than their pattern
    pub subpattern_offset: f32,
    /// Angular step between sibling subpatterns (radians)
    pub subpattern_angle_step: f32,
    pub problem_hash_scale: u32,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            radius: 100.0,
            subpattern_offset: 50.0,
            subpattern_angle_step: 0.2,
            problem_hash_scale: 300,
        }
    }
}

// =============================================================================
// ASSIGNER
// =============================================================================

/// Writes initial positions into a freshly built graph
pub trait LayoutAssigner {
    fn assign(&self, graph: &mut GraphModel, problems: &ProblemIndex);
}

/// Mode-switching layout engine
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub mode: LayoutMode,
    pub hierarchy: HierarchyParams,
    pub radial: RadialParams,
    pub force: ForceParams,
}

impl LayoutEngine {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl LayoutAssigner for LayoutEngine {
    fn assign(&self, graph: &mut GraphModel, problems: &ProblemIndex) {
        match self.mode {
            LayoutMode::Hierarchical => assign_hierarchical(graph, problems, &self.hierarchy),
            LayoutMode::ForceDirected => {
                assign_radial(graph, problems, &self.radial);
                force_sim::refine(graph, &self.force);
            }
        }
    }
}

// =============================================================================
// CATEGORY TREE
// =============================================================================

/// Pattern node index with its subpattern node indices, in insertion order
struct CategoryBlock {
    pattern: usize,
    subpatterns: Vec<usize>,
}

fn category_blocks(graph: &GraphModel) -> Vec<CategoryBlock> {
    let mut blocks: Vec<CategoryBlock> = Vec::new();
    let mut by_slug: HashMap<&str, usize> = HashMap::new();

    for (idx, node) in graph.nodes().iter().enumerate() {
        match node.kind {
            NodeKind::Pattern => {
                by_slug.insert(node.id.as_str(), blocks.len());
                blocks.push(CategoryBlock {
                    pattern: idx,
                    subpatterns: Vec::new(),
                });
            }
            NodeKind::Subpattern => {
                if let Some(&block) = by_slug.get(ids::parent_slug(&node.id)) {
                    blocks[block].subpatterns.push(idx);
                }
            }
            NodeKind::Problem => {}
        }
    }
    blocks
}

// =============================================================================
// HIERARCHICAL PLACEMENT
// =============================================================================

/// Vertical band a group of problems is scattered into
#[derive(Debug, Clone, Copy)]
struct Band {
    y: f32,
    height: f32,
}

/// Stack blocks starting at `top`; returns the y just past the last block
fn stack_blocks<'a>(
    graph: &mut GraphModel,
    blocks: impl Iterator<Item = &'a CategoryBlock>,
    top: f32,
    params: &HierarchyParams,
) -> f32 {
    let mut cursor = top;
    for block in blocks {
        let rows = block.subpatterns.len().max(1) as f32;
        let block_height = rows * params.row_spacing;
        let centre = cursor + (block_height - params.row_spacing) / 2.0;

        graph.set_position(block.pattern, params.pattern_x, centre);
        graph.set_fixed(block.pattern, true);
        for (row, &sub) in block.subpatterns.iter().enumerate() {
            graph.set_position(
                sub,
                params.subpattern_x,
                cursor + row as f32 * params.row_spacing,
            );
            graph.set_fixed(sub, true);
        }
        cursor += block_height + params.block_gap;
    }
    cursor
}

fn assign_hierarchical(graph: &mut GraphModel, problems: &ProblemIndex, params: &HierarchyParams) {
    let blocks = category_blocks(graph);
    let is_isolated =
        |block: &CategoryBlock| graph.nodes()[block.pattern].id == params.isolated_slug;
    let (isolated, main): (Vec<&CategoryBlock>, Vec<&CategoryBlock>) =
        blocks.iter().partition(|b| is_isolated(b));

    let main_end = stack_blocks(graph, main.iter().copied(), 0.0, params);
    let main_band = Band {
        y: 0.0,
        height: (main_end - params.block_gap).max(params.row_spacing),
    };

    let isolated_top = main_band.y + main_band.height + params.isolated_gap;
    let isolated_end = stack_blocks(graph, isolated.iter().copied(), isolated_top, params);
    let isolated_band = Band {
        y: isolated_top,
        height: (isolated_end - params.block_gap - isolated_top).max(params.row_spacing),
    };

    let scale = params.problem_hash_scale.max(1);
    for idx in 0..graph.node_count() {
        let node = &graph.nodes()[idx];
        let Some(summary) = problems.get(&node.id) else {
            continue;
        };
        let band = if belongs_to_isolated(graph, idx, &params.isolated_slug) {
            isolated_band
        } else {
            main_band
        };
        let (hx, hy) = hash_to_position(&summary.slug, scale);
        let x = params.problem_x + hx as f32 / scale as f32 * params.problem_band_width;
        let y = band.y + hy as f32 / scale as f32 * band.height;
        graph.set_position(idx, x, y);
    }
}

/// A problem belongs to the isolated band when every subpattern it links to
/// sits under the isolated category (and it links to at least one).
fn belongs_to_isolated(graph: &GraphModel, idx: usize, isolated_slug: &str) -> bool {
    let mut linked = graph
        .neighbor_indices(idx)
        .map(|n| graph.nodes()[n].id.as_str())
        .peekable();
    linked.peek().is_some() && linked.all(|id| ids::in_category(id, isolated_slug))
}

// =============================================================================
// RADIAL PLACEMENT
// =============================================================================

fn assign_radial(graph: &mut GraphModel, problems: &ProblemIndex, params: &RadialParams) {
    let blocks = category_blocks(graph);
    let count = blocks.len().max(1) as f32;

    for (i, block) in blocks.iter().enumerate() {
        let angle = 2.0 * std::f32::consts::PI * i as f32 / count;
        graph.set_position(
            block.pattern,
            params.radius * angle.cos(),
            params.radius * angle.sin(),
        );

        let sub_radius = params.radius + params.subpattern_offset;
        for (j, &sub) in block.subpatterns.iter().enumerate() {
            let sub_angle = angle + j as f32 * params.subpattern_angle_step;
            graph.set_position(sub, sub_radius * sub_angle.cos(), sub_radius * sub_angle.sin());
        }
    }

    for idx in 0..graph.node_count() {
        let Some(summary) = problems.get(&graph.nodes()[idx].id) else {
            continue;
        };
        let (x, y) = hash_to_position(&summary.slug, params.problem_hash_scale);
        graph.set_position(idx, x as f32, y as f32);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::GraphBuilder;
    use pattern_types::{Dataset, Difficulty, Pattern, Problem, Subpattern};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Pattern::new("arrays", "Arrays")
                    .with_subpattern(Subpattern::new("prefix-sum", "Prefix Sum"))
                    .with_subpattern(Subpattern::new("kadane", "Kadane")),
                Pattern::new("database", "Database")
                    .with_subpattern(Subpattern::new("joins", "Joins")),
                Pattern::new("greedy", "Greedy"),
            ],
            vec![
                Problem::new(1, "two-sum", "Two Sum", Difficulty::Easy).with_pattern("prefix-sum"),
                Problem::new(175, "combine-two-tables", "Combine Two Tables", Difficulty::Easy)
                    .with_pattern("joins"),
                Problem::new(53, "maximum-subarray", "Maximum Subarray", Difficulty::Medium)
                    .with_pattern("kadane")
                    .with_pattern("joins"),
                Problem::new(9, "loner", "Loner", Difficulty::Hard),
            ],
        )
    }

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash_string(""), 0);
        assert_eq!(hash_string("a"), 97);
        // 'a' * 31 + 'b'
        assert_eq!(hash_string("ab"), 97 * 31 + 98);
        assert_eq!(hash_to_position("a", 300), (97, 0));
    }

    #[test]
    fn test_hash_wraps_to_i32() {
        // Long keys overflow many times over; the result must still be in range
        let key = "z".repeat(500);
        let (x, y) = hash_to_position(&key, 200);
        assert!(x < 200 && y < 200);
        assert_eq!(hash_to_position(&key, 200), (x, y));
    }

    #[test]
    fn test_hash_negative_values_map_into_range() {
        let negative = (0..200)
            .map(|i| format!("problem-slug-{}", i))
            .find(|s| hash_string(s) < 0)
            .expect("some key hashes negative");
        let (x, y) = hash_to_position(&negative, 300);
        assert!(x < 300 && y < 300);
    }

    #[test]
    fn test_hash_zero_scale() {
        assert_eq!(hash_to_position("anything", 0), (0, 0));
    }

    #[test]
    fn test_layout_mode_from_str() {
        assert_eq!("force".parse::<LayoutMode>(), Ok(LayoutMode::ForceDirected));
        assert_eq!("Hierarchical".parse::<LayoutMode>(), Ok(LayoutMode::Hierarchical));
        assert!("spiral".parse::<LayoutMode>().is_err());
    }

    #[test]
    fn test_hierarchical_columns_and_pins() {
        let graph = GraphBuilder::new(LayoutEngine::new(LayoutMode::Hierarchical))
            .build(&dataset())
            .unwrap();
        let params = HierarchyParams::default();

        for node in graph.model.nodes() {
            match node.kind {
                NodeKind::Pattern => {
                    assert_eq!(node.attrs.x, params.pattern_x);
                    assert!(node.attrs.fixed);
                }
                NodeKind::Subpattern => {
                    assert_eq!(node.attrs.x, params.subpattern_x);
                    assert!(node.attrs.fixed);
                }
                NodeKind::Problem => {
                    assert!(node.attrs.x >= params.problem_x);
                    assert!(!node.attrs.fixed);
                }
            }
        }
    }

    #[test]
    fn test_hierarchical_subpatterns_stack_inside_block() {
        let graph = GraphBuilder::default().build(&dataset()).unwrap();
        let y = |id: &str| graph.model.node(id).unwrap().attrs.y;

        assert_eq!(y("arrays/prefix-sum"), 0.0);
        assert_eq!(y("arrays/kadane"), 40.0);
        assert_eq!(y("arrays"), 20.0);
        // arrays block: 2 rows * 40 + 40 gap
        assert_eq!(y("greedy"), 120.0);
    }

    #[test]
    fn test_isolated_category_below_gap() {
        let graph = GraphBuilder::default().build(&dataset()).unwrap();
        let params = HierarchyParams::default();
        let y = |id: &str| graph.model.node(id).unwrap().attrs.y;

        let main_bottom = y("greedy");
        assert!(y("database") >= main_bottom + params.isolated_gap);
        assert!(y("database/joins") >= main_bottom + params.isolated_gap);

        // Pure database problem lands in the isolated band, mixed one in the main band
        assert!(y("problem-175") >= y("database"));
        assert!(y("problem-53") <= main_bottom + params.row_spacing);
        assert!(y("problem-9") <= main_bottom + params.row_spacing);
    }

    #[test]
    fn test_radial_then_force_is_deterministic() {
        let engine = LayoutEngine::new(LayoutMode::ForceDirected);
        let a = GraphBuilder::new(engine.clone()).build(&dataset()).unwrap();
        let b = GraphBuilder::new(engine).build(&dataset()).unwrap();
        let positions = |g: &crate::graph::build::PatternGraph| {
            g.model
                .nodes()
                .iter()
                .map(|n| (n.attrs.x, n.attrs.y))
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&a), positions(&b));
        assert!(a.model.nodes().iter().all(|n| !n.attrs.fixed));
    }

    #[test]
    fn test_radial_seed_positions() {
        let graph = GraphBuilder::new(LayoutEngine {
            mode: LayoutMode::ForceDirected,
            force: ForceParams {
                iterations: 0,
                ..ForceParams::default()
            },
            ..LayoutEngine::default()
        })
        .build(&dataset())
        .unwrap();
        let first = &graph.model.node("arrays").unwrap().attrs;
        assert!((first.x - 100.0).abs() < 1e-3);
        assert!(first.y.abs() < 1e-3);

        let problem = &graph.model.node("problem-1").unwrap().attrs;
        let (hx, hy) = hash_to_position("two-sum", 300);
        assert_eq!((problem.x, problem.y), (hx as f32, hy as f32));
    }
}
