//! Depth scoring and paint order.
//!
//! Every face gets a depth score: how far the bottom edge of its bounding
//! box sits above the bottom of the viewport, as a fraction of the
//! viewport's height. Faces low on screen are near the viewer and score
//! close to 0.
//!
//! Paint order is floors first (ascending score), then the wall sides of
//! all shapes together (descending score, so far sides come first), then
//! ceilings in input order.

use crate::path::Path;
use crate::render::wall_stroke;
use crate::shape::{Shape, Stroke};
use crate::types::{BBox, Color, ViewBox};

/// Which part of a shape a face is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    Floor,
    Wall,
    Ceiling,
}

impl FaceKind {
    /// The `class` attribute of rendered faces.
    pub fn class(self) -> &'static str {
        match self {
            FaceKind::Floor => "floor",
            FaceKind::Wall => "wall",
            FaceKind::Ceiling => "ceiling",
        }
    }
}

/// One paintable face in final paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    /// Index of the shape the face belongs to
    pub shape: usize,
    pub path: Path,
    pub fill: Color,
    pub stroke: Option<Stroke>,
    pub depth: f64,
}

/// Depth of a face with bounding box `bbox` inside `view_box`, clamped to
/// `[0, 1]`.
pub fn depth_score(bbox: &BBox, view_box: &ViewBox) -> f64 {
    if bbox.is_empty() || view_box.size.y <= 0.0 {
        return 0.0;
    }
    ((view_box.bottom() - bbox.max.y) / view_box.size.y).clamp(0.0, 1.0)
}

/// Fill in the depth of every floor and wall side.
pub fn score_depths(mut shapes: Vec<Shape>, view_box: &ViewBox) -> Vec<Shape> {
    for shape in &mut shapes {
        if let Some(floor) = &mut shape.floor {
            floor.depth = depth_score(&floor.path.bounding_box(), view_box);
        }
        for wall in &mut shape.walls {
            for side in &mut wall.sides {
                side.depth = depth_score(&side.path.bounding_box(), view_box);
            }
        }
    }
    shapes
}

/// Flatten scored shapes into faces in paint order.
///
/// Sorting is stable, so faces with equal scores keep document order.
pub fn order_layers(shapes: &[Shape], view_box: &ViewBox) -> Vec<Face> {
    let mut floors: Vec<Face> = shapes
        .iter()
        .filter_map(|shape| {
            let floor = shape.floor.as_ref()?;
            Some(Face {
                kind: FaceKind::Floor,
                shape: shape.index,
                path: floor.path.clone(),
                fill: floor.fill.clone(),
                stroke: floor.stroke.clone(),
                depth: floor.depth,
            })
        })
        .collect();
    floors.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let mut walls: Vec<Face> = shapes
        .iter()
        .flat_map(|shape| {
            shape.sides().map(|side| Face {
                kind: FaceKind::Wall,
                shape: shape.index,
                path: side.path.clone(),
                fill: side.fill.clone(),
                stroke: Some(wall_stroke()),
                depth: side.depth,
            })
        })
        .collect();
    walls.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let ceilings = shapes.iter().filter_map(|shape| {
        let ceiling = shape.ceiling.as_ref()?;
        Some(Face {
            kind: FaceKind::Ceiling,
            shape: shape.index,
            path: ceiling.path.clone(),
            fill: ceiling.fill.clone(),
            stroke: None,
            depth: depth_score(&ceiling.path.bounding_box(), view_box),
        })
    });

    floors.into_iter().chain(walls).chain(ceilings).collect()
}
