//! Headless drivers that tick ecosystems as fast as possible.
//!
//! An ecosystem is never ticked from two threads. Parallel runs give every arena
//! its own ecosystem on its own rayon worker.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ecosystem::{Ecosystem, GenerationStats};
use super::error::Result;
use super::params::Params;

/// Outcome of one arena run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaReport {
    /// Seed the arena ran with.
    pub seed: Option<u64>,
    /// One entry per completed generation, oldest first.
    pub history: Vec<GenerationStats>,
}

impl ArenaReport {
    /// Highest best-fitness seen over the run.
    pub fn best_fitness(&self) -> f32 {
        self.history
            .iter()
            .map(|s| s.best_fitness)
            .fold(0.0, f32::max)
    }
}

/// Runs a single arena for `generations` full epochs.
pub fn run_generations(params: &Params, generations: u32) -> Result<ArenaReport> {
    let mut ecosystem = Ecosystem::new(params)?;
    let mut history = Vec::with_capacity(generations as usize);

    for _ in 0..generations {
        for _ in 0..=params.ticks_per_gen {
            ecosystem.tick();
        }
        if let Some(stats) = ecosystem.last_generation_stats() {
            history.push(*stats);
        }
    }

    Ok(ArenaReport {
        seed: params.seed,
        history,
    })
}

/// Runs one independent arena per seed in parallel.
///
/// Reports come back in the order of `seeds`.
pub fn run_arenas(params: &Params, seeds: &[u64], generations: u32) -> Result<Vec<ArenaReport>> {
    info!(arenas = seeds.len(), generations, "starting parallel run");
    seeds
        .par_iter()
        .map(|&seed| {
            let params = Params {
                seed: Some(seed),
                ..params.clone()
            };
            run_generations(&params, generations)
        })
        .collect()
}
