//! The geometry stages between scanning and recentering.

use crate::boundary::find_boundaries;
use crate::canonical::ToPath;
use crate::ceiling::build_ceiling;
use crate::geometry::{ArcLengthEngine, GeometryEngine};
use crate::log::{debug, warn};
use crate::options::Options;
use crate::order;
use crate::path::Path;
use crate::project::project;
use crate::shape::{Floor, Wall};
use crate::types::Color;
use crate::walls::build_walls;

use super::State;

/// Give every shape its plan-view outline; shapes without usable geometry
/// are dropped.
pub(super) fn canonicalize(mut state: State, _options: &Options) -> State {
    state.shapes = state
        .shapes
        .into_iter()
        .filter_map(|mut shape| match shape.primitive.to_path() {
            Ok(path) if !path.segments().is_empty() => {
                shape.path = Some(path);
                Some(shape)
            }
            Ok(_) => {
                warn!(
                    shape = shape.index,
                    kind = shape.kind().as_str(),
                    "empty outline; skipping shape"
                );
                None
            }
            Err(err) => {
                warn!(shape = shape.index, error = %err, "skipping shape");
                None
            }
        })
        .collect();
    state
}

/// Replace stroked, unfilled shapes by the outline of their stroke.
pub(super) fn outline_strokes(mut state: State, _options: &Options) -> State {
    for shape in &mut state.shapes {
        if shape.has_fill {
            continue;
        }
        let (Some(path), Some(stroke)) = (&shape.path, &shape.stroke) else {
            continue;
        };
        if !(stroke.width > 0.0) {
            continue;
        }

        let rings: Option<Vec<Path>> = path
            .subpaths()
            .iter()
            .map(|sub| ArcLengthEngine::new(sub).offset_stroke(stroke.width))
            .collect();
        match rings {
            Some(rings) if !rings.is_empty() => {
                debug!(shape = shape.index, rings = rings.len(), "outlined stroke");
                shape.path = Some(Path::join(rings));
                shape.fill = stroke.color.clone();
                shape.has_fill = true;
                shape.outlined = true;
                shape.stroke = None;
            }
            _ => {
                warn!(shape = shape.index, "could not outline stroke; keeping shape as is");
            }
        }
    }
    state
}

/// Project every outline at its shape's elevation.
pub(super) fn floors(mut state: State, _options: &Options) -> State {
    for shape in &mut state.shapes {
        let Some(path) = &shape.path else { continue };
        let solid = shape.is_solid();
        shape.floor = Some(Floor {
            path: project(path, shape.elevation),
            fill: if solid {
                shape.fill.clone()
            } else {
                Color::new("none")
            },
            stroke: if solid { None } else { shape.stroke.clone() },
            elevation: shape.elevation,
            depth: 0.0,
        });
    }
    state
}

/// Find the wall boundaries of each sub-outline of every solid floor.
pub(super) fn boundaries(mut state: State, options: &Options) -> State {
    for shape in &mut state.shapes {
        if !shape.is_solid() {
            continue;
        }
        let Some(floor) = &shape.floor else { continue };
        shape.walls = floor
            .path
            .subpaths()
            .iter()
            .map(|outline| Wall {
                boundaries: find_boundaries(outline, options),
                sides: Vec::new(),
            })
            .collect();
    }
    state
}

/// Raise wall sides between the boundaries of each sub-outline.
pub(super) fn walls(mut state: State, options: &Options) -> State {
    for shape in &mut state.shapes {
        let Some(floor) = &shape.floor else { continue };
        let outlines = floor.path.subpaths();
        let walls = std::mem::take(&mut shape.walls);
        shape.walls = walls
            .into_iter()
            .zip(outlines)
            .map(|(wall, outline)| {
                let sub_floor = Floor {
                    path: outline,
                    ..floor.clone()
                };
                build_walls(&sub_floor, &wall.boundaries, shape.height, options)
            })
            .collect();
        debug!(shape = shape.index, sides = shape.sides().count(), "walls built");
    }
    state
}

/// Cap every solid shape with its raised floor.
pub(super) fn ceilings(mut state: State, _options: &Options) -> State {
    for shape in &mut state.shapes {
        if !shape.is_solid() {
            continue;
        }
        if let Some(floor) = &shape.floor {
            shape.ceiling = Some(build_ceiling(floor, shape.height));
        }
    }
    state
}

/// Score depths against the current viewport and fix the paint order.
pub(super) fn order_layers(mut state: State, _options: &Options) -> State {
    state.shapes = order::score_depths(state.shapes, &state.view_box);
    state.faces = Some(order::order_layers(&state.shapes, &state.view_box));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::scan;
    use crate::shape::Shape;

    // shapes keep their document index after others are dropped
    fn indices(shapes: &[Shape]) -> Vec<usize> {
        shapes.iter().map(|s| s.index).collect()
    }

    fn state(body: &str) -> State {
        let svg = format!(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">{body}</svg>"#);
        State::from(scan(&svg, &Options::default()).unwrap())
    }

    fn run_through(mut state: State, count: usize) -> State {
        let options = Options::default();
        for (_, stage) in super::super::STAGES.iter().take(count) {
            state = stage(state, &options);
        }
        state
    }

    #[test]
    fn bad_geometry_is_dropped_at_canonicalization() {
        let s = run_through(
            state(r#"<rect width="0" height="5"/><path d="L5,5"/><circle r="4"/>"#),
            1,
        );
        assert_eq!(indices(&s.shapes), vec![2]);
    }

    #[test]
    fn unfilled_stroked_line_becomes_a_solid_outline() {
        let s = run_through(
            state(r#"<line x1="0" y1="0" x2="20" y2="0" stroke="navy" stroke-width="4"/>"#),
            2,
        );
        let shape = &s.shapes[0];
        assert!(shape.outlined);
        assert!(shape.is_solid());
        assert_eq!(shape.fill.as_str(), "navy");
        let bbox = shape.path.as_ref().unwrap().bounding_box();
        assert!((bbox.min.y + 2.0).abs() < 1e-9 && (bbox.max.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn bare_line_gets_a_stroked_floor_only() {
        let s = run_through(
            state(r#"<line x1="0" y1="0" x2="20" y2="0" fill="red" stroke="navy"/>"#),
            6,
        );
        let shape = &s.shapes[0];
        assert!(!shape.is_solid());
        let floor = shape.floor.as_ref().unwrap();
        assert_eq!(floor.stroke.as_ref().map(|s| s.color.as_str()), Some("navy"));
        assert!(shape.walls.is_empty());
        assert!(shape.ceiling.is_none());
    }

    #[test]
    fn compound_outline_gets_one_wall_per_ring() {
        let s = run_through(
            state(r#"<path d="M0,0 L30,0 L30,30 L0,30 Z M10,10 L10,20 L20,20 L20,10 Z"/>"#),
            5,
        );
        let shape = &s.shapes[0];
        assert_eq!(shape.walls.len(), 2);
        assert!(shape.walls.iter().all(|w| w.sides.len() == 4));
    }

    #[test]
    fn elevation_lifts_the_floor() {
        let s = run_through(
            state(r#"<rect width="10" height="10" data-elevation="5"/>"#),
            3,
        );
        let floor = s.shapes[0].floor.as_ref().unwrap();
        assert_eq!(floor.path.start(), Some(glam::dvec2(0.0, -5.0)));
    }
}
