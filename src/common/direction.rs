use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Expansion order for a node reached without a previous move.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Moves permitted right after a move in `self`: keep going, or turn clockwise.
    pub const fn allowed_next(self) -> &'static [Direction] {
        match self {
            Direction::Up => &[Direction::Up, Direction::Right],
            Direction::Right => &[Direction::Right, Direction::Down],
            Direction::Down => &[Direction::Down, Direction::Left],
            Direction::Left => &[Direction::Left, Direction::Up],
        }
    }

    pub fn from_delta(delta: (isize, isize)) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.delta() == delta)
    }

    /// Direction of the single step `from -> to`, if it is a cardinal unit move.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        Direction::from_delta(delta(from, to))
    }
}

pub(crate) fn delta(from: Cell, to: Cell) -> (isize, isize) {
    (
        to.0 as isize - from.0 as isize,
        to.1 as isize - from.1 as isize,
    )
}

/// Human readable direction names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Finnish,
}

impl Language {
    pub fn label(self, direction: Option<Direction>) -> &'static str {
        match (self, direction) {
            (Language::English, Some(Direction::Up)) => "UP",
            (Language::English, Some(Direction::Right)) => "RIGHT",
            (Language::English, Some(Direction::Down)) => "DOWN",
            (Language::English, Some(Direction::Left)) => "LEFT",
            (Language::English, None) => "UNRECOGNIZED",
            (Language::Finnish, Some(Direction::Up)) => "YLÖS",
            (Language::Finnish, Some(Direction::Right)) => "OIKEA",
            (Language::Finnish, Some(Direction::Down)) => "ALAS",
            (Language::Finnish, Some(Direction::Left)) => "VASEN",
            (Language::Finnish, None) => "TUNNISTAMATON",
        }
    }
}
