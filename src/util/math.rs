//! Geometric helpers shared by the quality gate.

use std::f64::consts::PI;

/// Area of a disc with the given diameter: `d^2 * pi / 4`.
pub(crate) fn circle_area(diameter: f64) -> f64 {
    diameter * diameter * PI / 4.0
}

/// Ratio of `part` to `whole`, with `whole` assumed floored above zero.
pub(crate) fn fraction(part: usize, whole: f64) -> f64 {
    part as f64 / whole
}
