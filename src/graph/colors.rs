//! Color palette for the pattern graph
//!
//! Colors are CSS hex strings, handed straight to whatever renderer draws them.

use pattern_types::Difficulty;

// =============================================================================
// CATEGORY COLORS
// =============================================================================

/// Pattern (category root) fill
pub const PATTERN: &str = "#6366f1"; // Indigo-500

/// Subpattern fill
pub const SUBPATTERN: &str = "#a5b4fc"; // Indigo-300

// =============================================================================
// DIFFICULTY COLORS
// =============================================================================

pub const EASY: &str = "#00b8a3"; // Teal
pub const MEDIUM: &str = "#ffc01e"; // Amber
pub const HARD: &str = "#ff375f"; // Red-pink

/// Get fill color for a problem difficulty
pub fn difficulty_color(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
    }
}

// =============================================================================
// HIGHLIGHT COLORS
// =============================================================================

/// Neutral gray for nodes/edges pushed into the background by a hover
pub const DESATURATED: &str = "#e5e7eb"; // Gray-200
