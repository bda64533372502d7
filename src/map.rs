use anyhow::{anyhow, ensure, Context};
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::common::{Cell, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    grid: Vec<Vec<u8>>, // 0 is walkable, anything else is blocked
}

impl Map {
    pub fn new(grid: Vec<Vec<u8>>) -> anyhow::Result<Self> {
        let height = grid.len();
        let width = grid.first().map_or(0, |row| row.len());
        for (x, row) in grid.iter().enumerate() {
            ensure!(
                row.len() == width,
                "grid is not rectangular: row {x} has {} cells, expected {width}",
                row.len()
            );
        }

        Ok(Map {
            height,
            width,
            grid,
        })
    }

    /// Reads a MovingAI `.map` file. `.`, `G` and `S` are walkable.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open map file {path}"))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut next_line = |what: &str| -> anyhow::Result<String> {
            lines
                .next()
                .ok_or_else(|| anyhow!("map file {path} ended before {what}"))?
                .with_context(|| format!("failed to read {what} from {path}"))
        };

        let _type = next_line("type line")?;
        let height = parse_header(&next_line("height line")?, "height")?;
        let width = parse_header(&next_line("width line")?, "width")?;
        let _map = next_line("map line")?;

        let mut grid = Vec::with_capacity(height);
        for x in 0..height {
            let line = next_line(&format!("row {x}"))?;
            let row: Vec<u8> = line
                .trim_end()
                .chars()
                .map(|ch| match ch {
                    '.' | 'G' | 'S' => 0,
                    _ => 1,
                })
                .collect();
            ensure!(
                row.len() == width,
                "row {x} of {path} has {} cells, header says {width}",
                row.len()
            );
            grid.push(row);
        }

        Map::new(grid)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.height && cell.1 < self.width
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.grid[cell.0][cell.1] == 0
    }

    /// Neighbor of `cell` in `direction`, or `None` when it falls off the grid.
    pub fn step(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.delta();
        let x = cell.0.checked_add_signed(dx)?;
        let y = cell.1.checked_add_signed(dy)?;
        self.contains((x, y)).then_some((x, y))
    }
}

fn parse_header(line: &str, key: &str) -> anyhow::Result<usize> {
    let mut parts = line.split_whitespace();
    ensure!(
        parts.next() == Some(key),
        "expected `{key} <n>` header, got {line:?}"
    );
    parts
        .next()
        .ok_or_else(|| anyhow!("missing value in {key} header"))?
        .parse::<usize>()
        .with_context(|| format!("invalid {key} in header {line:?}"))
}
