//! Geometric utility functions for distance calculations and spatial operations.

use std::f32::consts::TAU;

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use rand::Rng;

/// Squared Euclidean distance between two points.
///
/// Used for nearest-neighbour comparisons where the square root is not needed.
#[inline]
pub fn distance_sq(a: Point<f32>, b: Point<f32>) -> f32 {
    let d = a - b;
    d.dot(d)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point<f32>, b: Point<f32>) -> f32 {
    Euclidean.distance(a, b)
}

/// Returns the unit vector pointing along `v`.
///
/// A zero-length (or non-finite) vector has no direction, so the zero vector is
/// returned instead of letting NaN reach the network inputs.
pub fn normalize_or_zero(v: Point<f32>) -> Point<f32> {
    let len = v.dot(v).sqrt();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Point::new(0.0, 0.0)
    }
}

/// Unit vector for a heading in radians.
#[inline]
pub fn heading_vector(heading: f32) -> Point<f32> {
    Point::new(heading.cos(), heading.sin())
}

/// Normalizes an angle into `[0, 2π)`.
///
/// Non-finite input collapses to `0.0`.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Snaps a position that left the arena to the opposite edge.
///
/// This is a teleport, not a modulo: anything past the far edge lands on `0`
/// and anything below `0` lands on the far edge.
///
/// # Arguments
///
/// * `pos` - Position to wrap in place
/// * `box_width` - Arena width
/// * `box_height` - Arena height
pub fn wrap_around_mut(pos: &mut Point<f32>, box_width: f32, box_height: f32) {
    pos.set_x(wrap_coord(pos.x(), box_width));
    pos.set_y(wrap_coord(pos.y(), box_height));
}

/// Clamps a position onto the arena rectangle `[0, width] x [0, height]`.
///
/// # Arguments
///
/// * `pos` - Position to clamp in place
/// * `box_width` - Arena width
/// * `box_height` - Arena height
pub fn clamp_mut(pos: &mut Point<f32>, box_width: f32, box_height: f32) {
    pos.set_x(pos.x().clamp(0.0, box_width));
    pos.set_y(pos.y().clamp(0.0, box_height));
}

fn wrap_coord(value: f32, bound: f32) -> f32 {
    if value > bound {
        0.0
    } else if value < 0.0 {
        bound
    } else {
        value
    }
}

/// Draws a point uniformly from `[0, width) x [0, height)`.
///
/// # Arguments
///
/// * `rng` - Random source
/// * `box_width` - Arena width
/// * `box_height` - Arena height
///
/// # Returns
///
/// A point inside the arena.
pub fn random_point<R: Rng + ?Sized>(rng: &mut R, box_width: f32, box_height: f32) -> Point<f32> {
    Point::new(
        rng.random::<f32>() * box_width,
        rng.random::<f32>() * box_height,
    )
}
