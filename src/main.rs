use turn_astar::algorithm::a_star_search;
use turn_astar::config::{Cli, Config};
use turn_astar::map::Map;
use turn_astar::scenario::Scenario;
use turn_astar::stat::Stats;

use anyhow::{anyhow, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log level: {}", config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let (map, start, goal) = if let Some(scenario_path) = &config.scenario_path {
        let scenario = Scenario::load_from_yaml(scenario_path)?;
        (scenario.to_map()?, scenario.start(), scenario.goal())
    } else if let Some(map_path) = &config.map_path {
        let map = Map::from_file(map_path)?;
        let start = config.start.ok_or_else(|| anyhow!("missing start"))?;
        let goal = config.goal.ok_or_else(|| anyhow!("missing goal"))?;
        (map, start, goal)
    } else {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let scenario = Scenario::generate_randomly(
            config.height,
            config.width,
            config.obstacle_ratio,
            &mut rng,
        )?;
        if config.debug_yaml {
            scenario.write_to_yaml("debug.yaml")?;
        }
        let start = config.start.unwrap_or(scenario.start());
        let goal = config.goal.unwrap_or(scenario.goal());
        (scenario.to_map()?, start, goal)
    };

    let mut stats = Stats::default();
    let result = a_star_search(&map, start, goal, &mut stats)?;
    let labels = result.labels(config.language);
    stats.print();

    if result.is_empty() {
        info!("No path found from {start:?} to {goal:?}");
    } else {
        info!("Path found: {:?}", result.path);
        info!("Directions: {labels:?}");
    }

    if let Some(output_path) = &config.output_path {
        let file = File::create(output_path)
            .with_context(|| format!("failed to create output file: {output_path}"))?;
        let report = json!({
            "start": start,
            "goal": goal,
            "path": result.path,
            "raw_path": result.raw_path,
            "directions": labels,
            "stats": stats,
        });
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        info!("Result written to {output_path}");
    }

    Ok(())
}
