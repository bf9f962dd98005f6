//! Recentering: move the drawing so it sits `padding` inside a viewport
//! starting at the origin.

use glam::DVec2;

use crate::log::{debug, warn};
use crate::options::Options;
use crate::project::translate;
use crate::shape::Shape;
use crate::types::{BBox, ViewBox};

use super::State;

pub(super) fn stage(state: State, options: &Options) -> State {
    recenter(state, options.padding)
}

/// Translate every face so the union of their bounding boxes starts at
/// `(padding, padding)`, and size the viewport to fit.
///
/// A state without any face geometry is returned unchanged.
pub fn recenter(mut state: State, padding: f64) -> State {
    let bbox = state
        .shapes
        .iter()
        .fold(BBox::new(), |acc, shape| acc.union(&extent(shape)));
    if bbox.is_empty() {
        warn!("nothing to recenter");
        return state;
    }

    let shift = DVec2::splat(padding) - bbox.min;
    for shape in &mut state.shapes {
        move_shape(shape, shift);
    }
    let view_box = ViewBox::around(&bbox, padding);
    debug!(view_box = %view_box, "recentered");
    state.width = view_box.size.x;
    state.height = view_box.size.y;
    state.view_box = view_box;
    state
}

fn extent(shape: &Shape) -> BBox {
    let mut bbox = BBox::new();
    if let Some(floor) = &shape.floor {
        bbox = bbox.union(&floor.path.bounding_box());
    }
    for side in shape.sides() {
        bbox = bbox.union(&side.path.bounding_box());
    }
    if let Some(ceiling) = &shape.ceiling {
        bbox = bbox.union(&ceiling.path.bounding_box());
    }
    bbox
}

fn move_shape(shape: &mut Shape, shift: DVec2) {
    let (dx, dy) = (shift.x, shift.y);
    if let Some(floor) = &mut shape.floor {
        floor.path = translate(&floor.path, dx, dy, 0.0);
    }
    for wall in &mut shape.walls {
        for p in &mut wall.boundaries {
            *p += shift;
        }
        for side in &mut wall.sides {
            side.path = translate(&side.path, dx, dy, 0.0);
            side.bottom = translate(&side.bottom, dx, dy, 0.0);
        }
    }
    if let Some(ceiling) = &mut shape.ceiling {
        ceiling.path = translate(&ceiling.path, dx, dy, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Primitive, Rect};
    use crate::path::Path;
    use crate::shape::Floor;
    use crate::types::Color;
    use glam::dvec2;

    fn state_with_floor(d: &str) -> State {
        let mut shape = Shape::new(
            0,
            Primitive::Rect(Rect::default()),
            Color::new("gray"),
        );
        shape.floor = Some(Floor {
            path: Path::parse(d).unwrap(),
            fill: Color::new("gray"),
            stroke: None,
            elevation: 0.0,
            depth: 0.0,
        });
        State {
            view_box: ViewBox::default(),
            width: 100.0,
            height: 100.0,
            shapes: vec![shape],
            faces: None,
        }
    }

    #[test]
    fn drawing_moves_inside_padding() {
        let state = recenter(state_with_floor("M0,0 L10,5 L0,10 L-10,5 Z"), 20.0);
        assert_eq!(state.view_box.to_string(), "0 0 60 50");
        assert_eq!(state.width, 60.0);
        assert_eq!(state.height, 50.0);
        let floor = state.shapes[0].floor.as_ref().unwrap();
        insta::assert_snapshot!(floor.path.to_string(), @"M30,20 L40,25 L30,30 L20,25 Z");
        let bbox = floor.path.bounding_box();
        assert_eq!(bbox.min, dvec2(20.0, 20.0));
    }

    #[test]
    fn empty_state_is_untouched() {
        let mut state = state_with_floor("M0,0 L1,1");
        state.shapes.clear();
        let state = recenter(state, 20.0);
        assert_eq!(state.view_box, ViewBox::default());
    }
}
