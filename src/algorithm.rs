mod astar;
mod simplify;

pub use astar::{a_star_search, find_path};
pub use simplify::simplify_path;

use crate::common::Cell;

/// Squared Euclidean distance. Overestimates on unit-step grids, so the
/// search leans greedy rather than being optimal.
pub fn heuristic(position: Cell, goal: Cell) -> usize {
    let dx = position.0.abs_diff(goal.0);
    let dy = position.1.abs_diff(goal.1);
    dx * dx + dy * dy
}
