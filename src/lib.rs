//! # Smart Eaters - Neuroevolution Arena
//!
//! A population of eaters roams a bounded 2D arena looking for food. Each eater is
//! steered by a small feed-forward network whose weights come from a genome; every
//! food item eaten adds one point of fitness to that genome. After a fixed number
//! of ticks the population is evolved and a new generation starts.
//!
//! ## Features
//!
//! - Feed-forward networks loaded from flat genomes
//! - Pluggable population service ([`simulation::darwin::Population`]) with a
//!   default genetic algorithm
//! - Wrap-around or clamped arena borders
//! - Deterministic runs from a seed
//! - Parallel headless runs over independent arenas
//!
//! ## Core Modules
//!
//! - [`simulation::ecosystem`] - Main simulation loop
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::darwin`] - Genomes and their evolution
//! - [`simulation::eater`] - Agent state
//! - [`simulation::runner`] - Headless drivers

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for eater brains.
    pub mod brain;
    /// Genome population and genetic algorithm.
    pub mod darwin;
    /// Eater agents bound to genome slots.
    pub mod eater;
    /// Main ecosystem simulation loop.
    pub mod ecosystem;
    /// Error types.
    pub mod error;
    /// Food items that eaters can consume.
    pub mod food;
    /// Geometric utility functions for distance calculations.
    pub mod geometric_utils;
    /// Trait for entities with a position in the arena.
    ///
    /// Implemented by [`food::Food`] and [`eater::Eater`]; backs nearest-item
    /// queries.
    pub mod locatable;
    /// Simulation parameters.
    pub mod params;
    /// Headless single and parallel runs.
    pub mod runner;
}
