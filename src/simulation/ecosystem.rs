//! Main ecosystem simulation: sensing, inference, steering and epochs.
//!
//! The ecosystem owns the eaters and the food. Genomes live in a [`Population`];
//! each eater holds the index of its genome slot and fitness is written back
//! through that index, one point per food item eaten.
//!
//! A tick processes eaters one after another in a fixed order. Food eaten by one
//! eater is relocated before the next eater senses, so two eaters never claim the
//! same item within a tick.

use std::f32::consts::TAU;

use geo::Point;
use ndarray::ArrayView1;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

use super::brain::{Activation, Brain};
use super::darwin::{Darwin, Genome, Population};
use super::eater::Eater;
use super::error::{Error, Result};
use super::food::Food;
use super::geometric_utils::{
    clamp_mut, distance, heading_vector, normalize_or_zero, random_point, wrap_around_mut,
};
use super::locatable::nearest;
use super::params::Params;

/// Fitness summary of a generation, taken right before it is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number the summary belongs to.
    pub generation: u32,
    /// Mean fitness across the population.
    pub average_fitness: f32,
    /// Fitness of the best genome.
    pub best_fitness: f32,
}

/// The arena with its eaters, food and genome population.
#[derive(Debug, Clone)]
pub struct Ecosystem<P: Population = Darwin> {
    params: Params,
    layer_sizes: Vec<usize>,
    population: P,
    /// Networks built from the current genomes, indexed like the population.
    brains: Vec<Brain>,
    eaters: Vec<Eater>,
    food: Vec<Food>,
    ticks: u32,
    generation: u32,
    selected: Option<usize>,
    mating_frozen: bool,
    paused: bool,
    last_stats: Option<GenerationStats>,
    rng: SmallRng,
}

impl Ecosystem<Darwin> {
    /// Creates an ecosystem backed by the default genetic algorithm.
    pub fn new(params: &Params) -> Result<Self> {
        params.validate()?;
        let population = Darwin::new(
            params.genetic_params(),
            params.seed.map(|seed| seed.wrapping_add(1)),
        )?;
        Self::with_population(params, population)
    }
}

impl<P: Population> Ecosystem<P> {
    /// Creates an ecosystem around an existing population.
    ///
    /// The population must hold `params.population_size` genomes, each exactly as
    /// long as the configured topology requires.
    pub fn with_population(params: &Params, population: P) -> Result<Self> {
        params.validate()?;

        let actual = population.genomes().len();
        if actual != params.population_size {
            return Err(Error::PopulationMismatch {
                expected: params.population_size,
                actual,
            });
        }

        let layer_sizes = params.layer_sizes();
        let brains = build_brains(&layer_sizes, population.genomes(), params.activation)?;

        let mut rng = match params.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let eaters = (0..params.population_size)
            .map(|i| {
                let pos = random_point(&mut rng, params.box_width, params.box_height);
                Eater::new(pos, rng.random::<f32>() * TAU, i)
            })
            .collect();

        let food = spawn_food(&mut rng, params);

        Ok(Self {
            params: params.clone(),
            layer_sizes,
            population,
            brains,
            eaters,
            food,
            ticks: 0,
            generation: 0,
            selected: None,
            mating_frozen: false,
            paused: false,
            last_stats: None,
            rng,
        })
    }

    /// Advances the simulation by one tick.
    ///
    /// Starts a new generation first when the epoch is over, then senses, thinks,
    /// steers, moves and feeds every eater once.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }

        // same as incrementing first and testing `> ticks_per_gen`, without overflow
        if self.ticks >= self.params.ticks_per_gen {
            self.next_generation();
            self.ticks = 0;
        } else {
            self.ticks += 1;
        }

        let params = &self.params;
        let radius = params.consumption_radius();

        for (eater_idx, eater) in self.eaters.iter_mut().enumerate() {
            let brain = &self.brains[eater.genome_index()];

            let Some((food_idx, _)) = nearest(&self.food, eater.pos) else {
                continue;
            };
            let food_pos = self.food[food_idx].pos;
            let dist = distance(eater.pos, food_pos);
            let food_dir = normalize_or_zero(food_pos - eater.pos);

            // movement uses the heading sensed this tick, the turn applies to the next
            let lookat = heading_vector(eater.heading());
            let inputs = [lookat.x(), lookat.y(), food_dir.x(), food_dir.y()];
            let outputs = brain.think(ArrayView1::from(&inputs[..]));

            let (turn_left, turn_right) = (outputs[0], outputs[1]);
            let mut rot_force =
                (turn_left - turn_right).clamp(-params.max_turn_rate, params.max_turn_rate);
            if rot_force.is_nan() {
                rot_force = 0.0;
            }
            eater.set_heading(eater.heading() + rot_force);

            eater.lookat = lookat;
            eater.food_dir = food_dir;
            eater.closest_food = food_pos;

            eater.pos += lookat * params.max_speed;
            if params.wrap_borders {
                wrap_around_mut(&mut eater.pos, params.box_width, params.box_height);
            } else {
                clamp_mut(&mut eater.pos, params.box_width, params.box_height);
            }

            if dist < radius {
                self.population.add_fitness(eater.genome_index(), 1.0);
                self.food[food_idx].relocate(&mut self.rng, params.box_width, params.box_height);
                trace!(eater = eater_idx, food = food_idx, "food consumed");
            }
        }
    }

    /// Closes the current epoch: evolve, re-seed food, relocate eaters.
    fn next_generation(&mut self) {
        if self.mating_frozen {
            debug!(generation = self.generation, "mating frozen, keeping population");
            return;
        }

        let stats = GenerationStats {
            generation: self.generation,
            average_fitness: self.average_fitness(),
            best_fitness: self.fittest_fitness(),
        };
        info!(
            generation = stats.generation,
            average_fitness = stats.average_fitness,
            best_fitness = stats.best_fitness,
            "generation complete"
        );
        self.last_stats = Some(stats);

        self.population.mate();
        match build_brains(
            &self.layer_sizes,
            self.population.genomes(),
            self.params.activation,
        ) {
            Ok(brains) if brains.len() == self.eaters.len() => self.brains = brains,
            Ok(brains) => error!(
                expected = self.eaters.len(),
                actual = brains.len(),
                "population changed size while mating, keeping previous brains"
            ),
            Err(e) => error!(error = %e, "mated genomes do not fit topology, keeping previous brains"),
        }

        self.food = spawn_food(&mut self.rng, &self.params);
        for eater in &mut self.eaters {
            eater.pos = random_point(&mut self.rng, self.params.box_width, self.params.box_height);
        }

        self.generation += 1;
        self.selected = None;
    }

    /// Simulation parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Genome population.
    pub fn population(&self) -> &P {
        &self.population
    }

    /// All eaters, in genome order.
    pub fn eaters(&self) -> &[Eater] {
        &self.eaters
    }

    /// Mutable access to eater state; the eater count cannot change.
    pub fn eaters_mut(&mut self) -> &mut [Eater] {
        &mut self.eaters
    }

    /// Eater `idx`, if it exists.
    pub fn eater(&self, idx: usize) -> Option<&Eater> {
        self.eaters.get(idx)
    }

    /// All food items.
    pub fn food(&self) -> &[Food] {
        &self.food
    }

    /// Mutable access to food positions; the food count cannot change.
    pub fn food_mut(&mut self) -> &mut [Food] {
        &mut self.food
    }

    /// Ticks elapsed in the current generation.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Summary of the most recently completed generation.
    pub fn last_generation_stats(&self) -> Option<&GenerationStats> {
        self.last_stats.as_ref()
    }

    /// Fitness of the genome bound to eater `idx`.
    pub fn fitness_of(&self, idx: usize) -> Option<f32> {
        let eater = self.eaters.get(idx)?;
        self.population
            .genomes()
            .get(eater.genome_index())
            .map(Genome::fitness)
    }

    /// Mean fitness of the current generation.
    pub fn average_fitness(&self) -> f32 {
        self.population.average_fitness()
    }

    /// Best fitness of the current generation.
    pub fn fittest_fitness(&self) -> f32 {
        self.population.fittest().map_or(0.0, Genome::fitness)
    }

    /// Index of the eater bound to the fittest genome.
    pub fn fittest_index(&self) -> Option<usize> {
        let genome = self.population.fittest_index()?;
        self.eaters.iter().position(|e| e.genome_index() == genome)
    }

    /// Currently selected eater.
    pub fn selected(&self) -> Option<&Eater> {
        self.selected.and_then(|i| self.eaters.get(i))
    }

    /// Index of the currently selected eater.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Selects eater `idx`. Out-of-range indices are ignored and return `false`.
    pub fn set_selected(&mut self, idx: usize) -> bool {
        if idx < self.eaters.len() {
            self.selected = Some(idx);
            true
        } else {
            false
        }
    }

    /// Clears the selection.
    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    /// Selects the eater nearest to `point` if it lies within twice the eater
    /// size, otherwise clears the selection.
    pub fn select_at(&mut self, point: Point<f32>) -> Option<usize> {
        let reach = self.params.eater_size * 2.0;
        self.selected = nearest(&self.eaters, point)
            .filter(|&(_, dist_sq)| dist_sq.sqrt() < reach)
            .map(|(idx, _)| idx);
        self.selected
    }

    /// Toggles whether epochs evolve the population. Returns the new state.
    pub fn toggle_mating_freeze(&mut self) -> bool {
        self.mating_frozen = !self.mating_frozen;
        self.mating_frozen
    }

    /// Whether epochs currently skip evolution.
    pub fn is_mating_frozen(&self) -> bool {
        self.mating_frozen
    }

    /// Toggles pause. A paused ecosystem ignores [`Ecosystem::tick`].
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Whether ticking is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Network of eater `idx` as a standalone callable.
    pub fn eater_brain(&self, idx: usize) -> Option<impl Fn(&[f32]) -> Result<Vec<f32>> + use<P>> {
        let eater = self.eaters.get(idx)?;
        self.brains
            .get(eater.genome_index())
            .cloned()
            .map(Brain::into_fn)
    }

    /// Network of the fittest genome as a standalone callable.
    pub fn fittest_brain(&self) -> Option<impl Fn(&[f32]) -> Result<Vec<f32>> + use<P>> {
        let genome = self.population.fittest_index()?;
        self.brains.get(genome).cloned().map(Brain::into_fn)
    }
}

fn build_brains(
    layer_sizes: &[usize],
    genomes: &[Genome],
    activation: Activation,
) -> Result<Vec<Brain>> {
    genomes
        .iter()
        .map(|genome| Brain::from_weights(layer_sizes, genome.genes(), activation))
        .collect()
}

fn spawn_food<R: Rng + ?Sized>(rng: &mut R, params: &Params) -> Vec<Food> {
    (0..params.food_count)
        .map(|_| Food::new_random(rng, params.box_width, params.box_height))
        .collect()
}
