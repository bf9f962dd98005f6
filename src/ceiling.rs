//! Ceiling construction.

use crate::project::translate;
use crate::shape::{Ceiling, Floor};

/// Raise `floor` by `height`. The ceiling keeps the floor's fill.
pub fn build_ceiling(floor: &Floor, height: f64) -> Ceiling {
    Ceiling {
        path: translate(&floor.path, 0.0, 0.0, height),
        fill: floor.fill.clone(),
        elevation: floor.elevation + height,
    }
}
