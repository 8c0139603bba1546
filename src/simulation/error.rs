//! Error types for simulation construction and network loading.
//!
//! Every variant is raised before the first tick. Once an [`Ecosystem`] has been
//! built, ticking never fails.
//!
//! [`Ecosystem`]: super::ecosystem::Ecosystem

use thiserror::Error;

/// Errors surfaced by configuration, network loading and population setup.
#[derive(Debug, Error)]
pub enum Error {
    /// The population must contain at least one genome.
    #[error("population size must be at least 1")]
    EmptyPopulation,
    /// The network needs at least one hidden layer.
    #[error("at least one hidden layer is required")]
    NoHiddenLayers,
    /// A layer in the topology has zero neurons.
    #[error("layer {index} has zero neurons")]
    ZeroLayerSize {
        /// Position of the offending layer in the full topology.
        index: usize,
    },
    /// The arena must contain at least one food item.
    #[error("food count must be at least 1")]
    NoFood,
    /// An epoch must span at least one tick.
    #[error("ticks per generation must be at least 1")]
    ZeroTicksPerGen,
    /// Arena dimensions must be finite and positive.
    #[error("arena size {width}x{height} is not finite and positive")]
    InvalidArena {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// A numeric option is out of its allowed range.
    #[error("parameter `{name}` has invalid value {value}")]
    InvalidParameter {
        /// Option name as it appears in the configuration.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A flat weight vector does not fit the topology.
    #[error("expected {expected} weights for this topology, got {actual}")]
    DimensionMismatch {
        /// Length required by the topology.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// A network was evaluated with the wrong number of inputs.
    #[error("network takes {expected} inputs, got {actual}")]
    InputMismatch {
        /// Input layer size.
        expected: usize,
        /// Number of inputs supplied.
        actual: usize,
    },
    /// An injected population does not match the configured size.
    #[error("population holds {actual} genomes but {expected} were configured")]
    PopulationMismatch {
        /// Configured population size.
        expected: usize,
        /// Genomes actually present.
        actual: usize,
    },
    /// Matrix construction failed.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    /// Reading a configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Parsing a configuration file failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the simulation.
pub type Result<T> = std::result::Result<T, Error>;
