mod direction;
mod node;

pub use direction::{Direction, Language};
pub(crate) use node::{NodeArena, OpenEntry, SearchNode};

use serde::Serialize;

/// Grid position as `(row, column)`.
pub type Cell = (usize, usize);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Start, turning points and goal.
    pub path: Vec<Cell>,
    /// Every cell walked, before simplification.
    pub raw_path: Vec<Cell>,
    /// One entry per step; `None` marks a step that is not a cardinal move.
    #[serde(skip)]
    pub directions: Vec<Option<Direction>>,
}

impl PathResult {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn labels(&self, language: Language) -> Vec<&'static str> {
        self.directions
            .iter()
            .map(|direction| language.label(*direction))
            .collect()
    }
}
