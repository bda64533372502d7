use anyhow::{anyhow, bail, Context};
use clap::Parser;
use serde::Deserialize;

use crate::common::{Cell, Language};

#[derive(Parser, Debug)]
#[command(
    name = "Turn A*",
    about = "Grid path search where every move keeps its heading or turns clockwise.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to a YAML scenario file (grid, start, goal)")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Path to a MovingAI .map file, used with --start and --goal")]
    pub map_path: Option<String>,

    #[arg(long, help = "Start cell as row,col", value_parser = parse_cell)]
    pub start: Option<Cell>,

    #[arg(long, help = "Goal cell as row,col", value_parser = parse_cell)]
    pub goal: Option<Cell>,

    #[arg(long, help = "Height of a randomly generated grid")]
    pub height: Option<usize>,

    #[arg(long, help = "Width of a randomly generated grid")]
    pub width: Option<usize>,

    #[arg(long, help = "Share of blocked cells in a randomly generated grid")]
    pub obstacle_ratio: Option<f64>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, help = "Language of the direction labels")]
    pub language: Option<Language>,

    #[arg(long, help = "Write the result as JSON to this path")]
    pub output_path: Option<String>,

    #[arg(long, help = "Write generated scenarios to debug.yaml")]
    pub debug_yaml: bool,

    #[arg(long, help = "Log filter, e.g. info or turn_astar=trace")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scenario_path: Option<String>,
    pub map_path: Option<String>,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
    pub height: usize,
    pub width: usize,
    pub obstacle_ratio: f64,
    pub seed: u64,
    pub language: Language,
    pub output_path: Option<String>,
    pub debug_yaml: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scenario_path: None,
            map_path: None,
            start: None,
            goal: None,
            height: 16,
            width: 16,
            obstacle_ratio: 0.2,
            seed: 0,
            language: Language::English,
            output_path: None,
            debug_yaml: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid config")
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(scenario_path) = &cli.scenario_path {
            self.scenario_path = Some(scenario_path.clone());
        }
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }
        if cli.start.is_some() {
            self.start = cli.start;
        }
        if cli.goal.is_some() {
            self.goal = cli.goal;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(obstacle_ratio) = cli.obstacle_ratio {
            self.obstacle_ratio = obstacle_ratio;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(language) = cli.language {
            self.language = language;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if cli.debug_yaml {
            self.debug_yaml = true;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scenario_path.is_some() && self.map_path.is_some() {
            bail!("scenario_path and map_path are mutually exclusive");
        }

        if self.map_path.is_some() && (self.start.is_none() || self.goal.is_none()) {
            bail!("map_path needs both start and goal");
        }

        if self.scenario_path.is_none() && self.map_path.is_none() {
            if self.height == 0 || self.width == 0 {
                return Err(anyhow!(
                    "Random grid must not be empty, got {}x{}",
                    self.height,
                    self.width
                ));
            }
            if !(0.0..1.0).contains(&self.obstacle_ratio) {
                return Err(anyhow!(
                    "Obstacle ratio must be in [0, 1), got {}",
                    self.obstacle_ratio
                ));
            }
        }
        Ok(())
    }
}

fn parse_cell(s: &str) -> anyhow::Result<Cell> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected row,col, got {s:?}"))?;
    let row = row.trim().parse().with_context(|| format!("invalid row in {s:?}"))?;
    let col = col.trim().parse().with_context(|| format!("invalid column in {s:?}"))?;
    Ok((row, col))
}
