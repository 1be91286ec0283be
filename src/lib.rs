//! Water sort puzzle solver.
//!
//! Colored liquid tokens stack in tubes; one move pours the top token of a
//! tube onto an empty tube, or onto a matching color with room to spare.
//! The crate models puzzle states as immutable values whose equality ignores
//! tube order, and solves them with generic breadth-first or depth-first
//! search plus parent-link path reconstruction.

pub mod puzzle;
pub mod search;

// Re-export main types
pub use puzzle::{Color, Pour, PuzzleError, PuzzleParams, PuzzleState, Tube, MAX_COLORS};
pub use search::{
    backtrack, breadth_first, breadth_first_with_stats, depth_first, depth_first_with_stats,
    SearchNode, SearchOutcome, SearchStats,
};
