use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use smart_eaters::simulation::params::Params;
use smart_eaters::simulation::runner;

#[derive(Parser, Debug)]
#[command(
    name = "smart-eaters",
    version,
    about = "Evolve food-seeking eaters without a display"
)]
struct Cli {
    /// JSON file with simulation parameters; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Generations to run per arena.
    #[arg(long, default_value_t = 10)]
    generations: u32,
    /// Independent arenas to run in parallel.
    #[arg(long, default_value_t = 1)]
    arenas: u64,
    /// Base seed; arena `i` uses `seed + i`.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the population size.
    #[arg(long)]
    population: Option<usize>,
    /// Override the ticks per generation.
    #[arg(long)]
    ticks_per_gen: Option<u32>,
    /// Clamp eaters to the arena instead of wrapping them.
    #[arg(long)]
    no_wrap: bool,
    /// Print per-generation statistics as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => Params::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Params::default(),
    };
    if let Some(population) = cli.population {
        params.population_size = population;
    }
    if let Some(ticks) = cli.ticks_per_gen {
        params.ticks_per_gen = ticks;
    }
    if cli.no_wrap {
        params.wrap_borders = false;
    }
    params.validate().context("invalid simulation parameters")?;

    let base_seed = cli.seed.or(params.seed).unwrap_or_else(rand::random);
    let seeds: Vec<u64> = (0..cli.arenas.max(1))
        .map(|i| base_seed.wrapping_add(i))
        .collect();

    info!(
        population = params.population_size,
        food = params.food_count,
        ticks_per_gen = params.ticks_per_gen,
        "starting smart eaters"
    );

    let reports = runner::run_arenas(&params, &seeds, cli.generations)
        .context("simulation failed to start")?;

    for report in &reports {
        if cli.json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            let last_avg = report.history.last().map_or(0.0, |s| s.average_fitness);
            println!(
                "seed {:>20}: best fitness {:>6.1}, final average {:>8.4}",
                report.seed.unwrap_or_default(),
                report.best_fitness(),
                last_avg
            );
        }
    }

    Ok(())
}
