//! Eater agents: kinematic state bound to one genome slot.

use geo::Point;

use super::geometric_utils::normalize_angle;

/// A simulated eater steered by the network built from its genome.
///
/// The eater does not own its genome. It holds the index of its slot in the
/// population, which stays valid across generations because the population size
/// never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Eater {
    /// Position in the arena.
    pub pos: Point<f32>,
    heading: f32,
    genome_index: usize,
    /// Unit vector the eater moved along on its last tick.
    pub lookat: Point<f32>,
    /// Unit vector towards the nearest food seen on its last tick.
    pub food_dir: Point<f32>,
    /// Position of the nearest food seen on its last tick.
    pub closest_food: Point<f32>,
}

impl Eater {
    /// Creates an eater bound to genome slot `genome_index`.
    pub fn new(pos: Point<f32>, heading: f32, genome_index: usize) -> Self {
        let heading = normalize_angle(heading);
        Self {
            pos,
            heading,
            genome_index,
            lookat: Point::new(heading.cos(), heading.sin()),
            food_dir: Point::new(0.0, 0.0),
            closest_food: pos,
        }
    }

    /// Heading in radians, always in `[0, 2π)`.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Sets the heading, normalized into `[0, 2π)`.
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_angle(heading);
    }

    /// Population slot this eater reads and rewards.
    pub fn genome_index(&self) -> usize {
        self.genome_index
    }
}
