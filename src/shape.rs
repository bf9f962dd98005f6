//! The shape model threaded through the pipeline.
//!
//! A [`Shape`] starts as a scanned primitive and gains derived geometry
//! stage by stage: a canonical path, a projected floor, walls and a ceiling.

use glam::DVec2;

use crate::canonical::{Primitive, ShapeKind, ToPath};
use crate::path::Path;
use crate::types::Color;

/// Stroke paint carried over to a rendered face.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// One input primitive and everything derived from it.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Position in document order
    pub index: usize,
    pub primitive: Primitive,
    pub fill: Color,
    /// The markup gave a fill other than `none`
    pub has_fill: bool,
    pub stroke: Option<Stroke>,
    pub elevation: f64,
    pub height: f64,
    /// Plan-view outline, set by canonicalization
    pub path: Option<Path>,
    /// The stroke has been turned into fill geometry
    pub outlined: bool,
    pub floor: Option<Floor>,
    /// One wall per sub-outline of the floor
    pub walls: Vec<Wall>,
    pub ceiling: Option<Ceiling>,
}

impl Shape {
    pub fn new(index: usize, primitive: Primitive, fill: Color) -> Self {
        Self {
            index,
            primitive,
            has_fill: !fill.is_none(),
            fill,
            stroke: None,
            elevation: 0.0,
            height: 20.0,
            path: None,
            outlined: false,
            floor: None,
            walls: Vec::new(),
            ceiling: None,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.primitive.kind()
    }

    /// Whether the shape encloses area and so gets walls and a ceiling.
    /// A bare line has no interior unless its stroke was outlined.
    pub fn is_solid(&self) -> bool {
        self.kind() != ShapeKind::Line || self.outlined
    }

    pub fn sides(&self) -> impl Iterator<Item = &Side> {
        self.walls.iter().flat_map(|w| w.sides.iter())
    }
}

/// The projected base outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub path: Path,
    pub fill: Color,
    pub stroke: Option<Stroke>,
    pub elevation: f64,
    pub depth: f64,
}

/// The floor raised by the shape's height.
#[derive(Debug, Clone, PartialEq)]
pub struct Ceiling {
    pub path: Path,
    pub fill: Color,
    pub elevation: f64,
}

/// The walls raised along one floor outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wall {
    /// Boundary points in outline order
    pub boundaries: Vec<DVec2>,
    pub sides: Vec<Side>,
}

/// One extruded face between two consecutive boundary points.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    /// Closed face: bottom run, then the raised run backwards
    pub path: Path,
    /// The floor run this side stands on
    pub bottom: Path,
    pub fill: Color,
    pub depth: f64,
}
