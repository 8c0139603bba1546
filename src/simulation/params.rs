use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::{self, Activation};
use super::darwin::{CrossoverMethod, GeneticParams};
use super::error::{Error, Result};

/// Number of network inputs: heading cosine/sine and food direction x/y.
pub const SENSOR_COUNT: usize = 4;
/// Number of network outputs: left and right turn signals.
pub const ACTUATOR_COUNT: usize = 2;

/// Simulation parameters that control arena, agents and evolution.
///
/// Every field is optional when deserialized; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of eaters, one per genome.
    pub population_size: usize,
    /// Hidden layer widths between the sensor and actuator layers.
    pub hidden_layers_sizes: Vec<usize>,
    /// Food items kept in the arena.
    pub food_count: usize,
    /// Distance moved per tick.
    pub max_speed: f32,
    /// Largest heading change per tick, in radians.
    pub max_turn_rate: f32,
    /// Ticks in one generation.
    pub ticks_per_gen: u32,
    /// Eater collision diameter.
    pub eater_size: f32,
    /// Food collision diameter.
    pub food_size: f32,
    /// Wrap eaters to the opposite edge instead of clamping them.
    pub wrap_borders: bool,
    /// Arena width.
    pub box_width: f32,
    /// Arena height.
    pub box_height: f32,
    /// Probability that parents are recombined.
    pub crossover_rate: f32,
    /// Per-gene mutation probability.
    pub mutation_rate: f32,
    /// Fittest genomes copied unchanged into the next generation.
    pub elite_count: usize,
    /// Copies made of each elite genome.
    pub elite_copies: usize,
    /// Recombination operator.
    pub crossover_method: CrossoverMethod,
    /// Network activation.
    pub activation: Activation,
    /// Seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 30,
            hidden_layers_sizes: vec![6],
            food_count: 40,
            max_speed: 2.0,
            max_turn_rate: 0.3,
            ticks_per_gen: 1000,
            eater_size: 12.0,
            food_size: 5.0,
            wrap_borders: true,
            box_width: 800.0,
            box_height: 600.0,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            elite_count: 4,
            elite_copies: 1,
            crossover_method: CrossoverMethod::SinglePoint,
            activation: Activation::Identity,
            seed: None,
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Full network topology: sensors, hidden layers, actuators.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers_sizes.len() + 2);
        sizes.push(SENSOR_COUNT);
        sizes.extend_from_slice(&self.hidden_layers_sizes);
        sizes.push(ACTUATOR_COUNT);
        sizes
    }

    /// Genome length implied by the topology.
    pub fn genome_length(&self) -> usize {
        brain::weights_count(&self.layer_sizes())
    }

    /// Distance below which an eater consumes food.
    pub fn consumption_radius(&self) -> f32 {
        (self.eater_size + self.food_size) / 2.0
    }

    /// Settings handed to the genetic algorithm.
    pub fn genetic_params(&self) -> GeneticParams {
        GeneticParams {
            population_size: self.population_size,
            chromosome_length: self.genome_length(),
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            elite_count: self.elite_count,
            elite_copies: self.elite_copies,
            crossover_method: self.crossover_method,
        }
    }

    /// Rejects configurations that would produce degenerate ticks.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::EmptyPopulation);
        }
        if self.hidden_layers_sizes.is_empty() {
            return Err(Error::NoHiddenLayers);
        }
        brain::validate_topology(&self.layer_sizes())?;
        if self.food_count == 0 {
            return Err(Error::NoFood);
        }
        if self.ticks_per_gen == 0 {
            return Err(Error::ZeroTicksPerGen);
        }
        if !(self.box_width.is_finite()
            && self.box_height.is_finite()
            && self.box_width > 0.0
            && self.box_height > 0.0)
        {
            return Err(Error::InvalidArena {
                width: self.box_width,
                height: self.box_height,
            });
        }

        for (name, value) in [
            ("max_speed", self.max_speed),
            ("max_turn_rate", self.max_turn_rate),
            ("eater_size", self.eater_size),
            ("food_size", self.food_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
