//! Food items that eaters consume for fitness.
//!
//! Consumption never removes food: the item is moved to a fresh random spot, so
//! the arena always holds the configured number of items.

use geo::Point;
use rand::Rng;

use super::geometric_utils::random_point;

/// A food item in the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    /// Position in 2D space.
    pub pos: Point<f32>,
}

impl Food {
    /// Creates a food item at a random position inside the arena.
    ///
    /// # Arguments
    ///
    /// * `rng` - Random source
    /// * `box_width` - Arena width
    /// * `box_height` - Arena height
    ///
    /// # Returns
    ///
    /// A new `Food` inside `[0, box_width) x [0, box_height)`.
    pub fn new_random<R: Rng + ?Sized>(rng: &mut R, box_width: f32, box_height: f32) -> Self {
        Self {
            pos: random_point(rng, box_width, box_height),
        }
    }

    /// Moves this item to a new random position inside the arena.
    ///
    /// # Arguments
    ///
    /// * `rng` - Random source
    /// * `box_width` - Arena width
    /// * `box_height` - Arena height
    pub fn relocate<R: Rng + ?Sized>(&mut self, rng: &mut R, box_width: f32, box_height: f32) {
        self.pos = random_point(rng, box_width, box_height);
    }
}
