//! Trait for entities that have a position in the arena.

use geo::Point;

use super::eater::Eater;
use super::food::Food;
use super::geometric_utils::distance_sq;

/// Trait for entities with a position in 2D space.
pub trait Locatable {
    /// Returns the entity's position.
    fn pos(&self) -> Point<f32>;
}

impl Locatable for Food {
    fn pos(&self) -> Point<f32> {
        self.pos
    }
}

impl Locatable for Eater {
    fn pos(&self) -> Point<f32> {
        self.pos
    }
}

/// Finds the item closest to `target` by squared distance.
///
/// # Arguments
///
/// * `items` - Candidates to search
/// * `target` - Point to measure from
///
/// # Returns
///
/// The index and squared distance of the closest item. Ties go to the first
/// item in iteration order; `None` for an empty slice.
pub fn nearest<T: Locatable>(items: &[T], target: Point<f32>) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, item) in items.iter().enumerate() {
        let d = distance_sq(item.pos(), target);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_resolve_to_first_item() {
        let food = [
            Food { pos: Point::new(2.0, 0.0) },
            Food { pos: Point::new(-2.0, 0.0) },
            Food { pos: Point::new(0.0, 5.0) },
        ];
        assert_eq!(nearest(&food, Point::new(0.0, 0.0)), Some((0, 4.0)));
    }

    #[test]
    fn empty_slice_has_no_nearest() {
        let food: [Food; 0] = [];
        assert_eq!(nearest(&food, Point::new(0.0, 0.0)), None);
    }
}
