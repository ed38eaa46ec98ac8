//! Force-directed refinement pass
//!
//! ForceAtlas2-style forces over the constructed graph:
//! - Repulsion between all pairs, weighted by (degree + 1) of both ends
//! - Linear attraction along edges
//! - Gravity towards the origin, weighted by (degree + 1)
//!
//! Displacement per step is capped by a temperature that cools every
//! iteration. The pass always runs exactly `iterations` steps; there is no
//! convergence loop, so it terminates on any input. Fixed nodes never move.
//!
//! O(n²) per iteration - intended for the small graphs where force layout
//! is still legible. Production-scale data uses hierarchical placement.

use super::store::GraphModel;

// =============================================================================
// VEC2
// =============================================================================

/// 2D vector for positions and forces
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Tunables for the force pass
#[derive(Debug, Clone, PartialEq)]
pub struct ForceParams {
    /// Fixed iteration budget
    pub iterations: usize,
    /// Repulsion multiplier
    pub scaling_ratio: f32,
    /// Pull towards the origin
    pub gravity: f32,
    /// Maximum displacement on the first step
    pub initial_temperature: f32,
    /// Temperature multiplier per step
    pub cooling: f32,
    /// Minimum distance used in force calculation (prevents explosion)
    pub min_distance: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            scaling_ratio: 1.0,
            gravity: 1.0,
            initial_temperature: 10.0,
            cooling: 0.95,
            min_distance: 0.01,
        }
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

/// Run the full fixed-budget pass over `graph`, writing positions back.
///
/// Returns the number of iterations executed.
pub fn refine(graph: &mut GraphModel, params: &ForceParams) -> usize {
    let n = graph.node_count();
    if n == 0 {
        return 0;
    }

    let mut positions: Vec<Vec2> = graph
        .nodes()
        .iter()
        .map(|node| Vec2::new(node.attrs.x, node.attrs.y))
        .collect();
    let pinned: Vec<bool> = graph.nodes().iter().map(|node| node.attrs.fixed).collect();
    let mass: Vec<f32> = (0..n).map(|i| graph.degree(i) as f32 + 1.0).collect();
    let edges: Vec<(usize, usize)> = graph
        .edges()
        .iter()
        .map(|edge| (edge.source, edge.target))
        .collect();

    let mut temperature = params.initial_temperature;
    for _ in 0..params.iterations {
        let forces = calculate_forces(&positions, &mass, &edges, params);
        for (i, force) in forces.iter().enumerate() {
            if pinned[i] {
                continue;
            }
            let magnitude = force.length().max(params.min_distance);
            let capped = magnitude.min(temperature);
            positions[i] += *force * (capped / magnitude);
        }
        temperature *= params.cooling;
    }

    for (i, pos) in positions.iter().enumerate() {
        if !pinned[i] {
            graph.set_position(i, pos.x, pos.y);
        }
    }

    tracing::debug!(
        nodes = n,
        iterations = params.iterations,
        "force-directed refinement complete"
    );
    params.iterations
}

/// Calculate net force on every node
fn calculate_forces(
    positions: &[Vec2],
    mass: &[f32],
    edges: &[(usize, usize)],
    params: &ForceParams,
) -> Vec<Vec2> {
    let n = positions.len();
    let mut forces = vec![Vec2::ZERO; n];

    // Repulsion between all pairs
    for i in 0..n {
        for j in (i + 1)..n {
            let delta = positions[i] - positions[j];
            let dist = delta.length().max(params.min_distance);
            let force_mag = params.scaling_ratio * mass[i] * mass[j] / dist;
            let force = delta * (force_mag / dist);
            forces[i] += force;
            forces[j] -= force;
        }
    }

    // Linear attraction along edges
    for &(source, target) in edges {
        let delta = positions[source] - positions[target];
        forces[source] -= delta;
        forces[target] += delta;
    }

    // Gravity towards the origin
    for (i, pos) in positions.iter().enumerate() {
        let dist = pos.length();
        if dist > params.min_distance {
            forces[i] -= *pos * (params.gravity * mass[i] / dist);
        }
    }

    forces
}

// =============================================================================
// TESTS
// =============================================================================
