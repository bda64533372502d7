use anyhow::{ensure, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::info;

use crate::common::Cell;
use crate::map::Map;

/// A grid together with the endpoints to search between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub grid: Vec<Vec<u8>>,
    pub start: [usize; 2],
    pub goal: [usize; 2],
}

impl Scenario {
    pub fn load_from_yaml(path: &str) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open scenario file {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario file {path}"))?;
        Ok(scenario)
    }

    pub fn write_to_yaml(&self, path: &str) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(self)?;
        writer.write_all(yaml_data.as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    /// Random grid where each cell is blocked with probability `obstacle_ratio`.
    /// The top-left start and bottom-right goal are always left walkable.
    pub fn generate_randomly<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        obstacle_ratio: f64,
        rng: &mut R,
    ) -> Result<Self> {
        ensure!(height > 0 && width > 0, "grid must not be empty");
        ensure!(
            (0.0..1.0).contains(&obstacle_ratio),
            "obstacle ratio must be in [0, 1), got {obstacle_ratio}"
        );

        let mut grid: Vec<Vec<u8>> = (0..height)
            .map(|_| {
                (0..width)
                    .map(|_| u8::from(rng.gen_bool(obstacle_ratio)))
                    .collect()
            })
            .collect();
        grid[0][0] = 0;
        grid[height - 1][width - 1] = 0;

        let scenario = Scenario {
            grid,
            start: [0, 0],
            goal: [height - 1, width - 1],
        };
        info!("Generate scen: {height}x{width}, obstacle ratio {obstacle_ratio}");
        Ok(scenario)
    }

    pub fn start(&self) -> Cell {
        (self.start[0], self.start[1])
    }

    pub fn goal(&self) -> Cell {
        (self.goal[0], self.goal[1])
    }

    pub fn to_map(&self) -> Result<Map> {
        Map::new(self.grid.clone())
    }
}
