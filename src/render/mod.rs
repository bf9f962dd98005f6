//! SVG output for pipeline states
//!
//! Every stage renders the state it produced, so the progression of a run
//! can be inspected:
//! - before paint order exists, shapes are drawn one after another in
//!   document order with whatever geometry they have so far
//! - once faces are ordered, the faces are drawn in paint order
//!
//! The debug rendering draws the same faces semi-transparent and adds
//! boundary markers and depth labels (see [`debug`]).

pub mod debug;

use facet_svg::{Svg, SvgNode};

use crate::canonical::ToPath;
use crate::order::{Face, FaceKind};
use crate::path::{Path, fmt_num};
use crate::pipeline::State;
use crate::shape::{Shape, Stroke};
use crate::types::Color;

/// Opacity of faces in the debug rendering
pub const DEBUG_OPACITY: &str = "0.5";

/// Stroke drawn around every wall side
pub fn wall_stroke() -> Stroke {
    Stroke {
        color: Color::new("black"),
        width: 0.5,
    }
}

/// Which rendering of a state to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Clean,
    Debug,
}

/// Render a pipeline state as an SVG tree.
pub fn render(state: &State, mode: Mode) -> Svg {
    let mut svg = Svg::with_viewport(
        state.view_box.to_string(),
        fmt_num(state.width),
        fmt_num(state.height),
    );

    match &state.faces {
        Some(faces) => {
            for face in faces {
                svg.children.push(face_node(face, mode));
                if mode == Mode::Debug && face.kind != FaceKind::Ceiling {
                    svg.children.extend(debug::depth_label(face));
                }
            }
        }
        None => {
            for shape in &state.shapes {
                shape_nodes(shape, mode, &mut svg.children);
            }
        }
    }

    if mode == Mode::Debug {
        for shape in &state.shapes {
            svg.children.extend(debug::boundary_markers(shape));
        }
    }
    svg
}

/// One `<path>` element.
pub fn path_node(
    path: &Path,
    fill: &Color,
    stroke: Option<&Stroke>,
    class: Option<&str>,
    mode: Mode,
) -> SvgNode {
    SvgNode::Path(facet_svg::Path {
        d: Some(path.to_string()),
        class: class.map(str::to_string),
        fill: Some(fill.to_string()),
        stroke: stroke.map(|s| s.color.to_string()),
        stroke_width: stroke.map(|s| fmt_num(s.width)),
        opacity: (mode == Mode::Debug).then(|| DEBUG_OPACITY.to_string()),
        ..Default::default()
    })
}

fn face_node(face: &Face, mode: Mode) -> SvgNode {
    let mut node = path_node(
        &face.path,
        &face.fill,
        face.stroke.as_ref(),
        Some(face.kind.class()),
        mode,
    );
    if let (Mode::Debug, SvgNode::Path(path)) = (mode, &mut node) {
        path.data_depth = Some(format!("{:.2}", face.depth));
    }
    node
}

/// A shape with the geometry it has so far: its floor (or its plan outline
/// before projection), its wall sides, then its ceiling.
fn shape_nodes(shape: &Shape, mode: Mode, out: &mut Vec<SvgNode>) {
    if let Some(floor) = &shape.floor {
        out.push(path_node(
            &floor.path,
            &floor.fill,
            floor.stroke.as_ref(),
            Some(FaceKind::Floor.class()),
            mode,
        ));
    } else {
        let plan = shape
            .path
            .clone()
            .or_else(|| shape.primitive.to_path().ok());
        if let Some(plan) = plan {
            let fill = if shape.has_fill || shape.outlined {
                shape.fill.clone()
            } else {
                Color::new("none")
            };
            let stroke = if shape.outlined {
                None
            } else {
                shape.stroke.as_ref()
            };
            out.push(path_node(&plan, &fill, stroke, None, mode));
        }
    }

    let stroke = wall_stroke();
    for side in shape.sides() {
        out.push(path_node(
            &side.path,
            &side.fill,
            Some(&stroke),
            Some(FaceKind::Wall.class()),
            mode,
        ));
    }

    if let Some(ceiling) = &shape.ceiling {
        out.push(path_node(
            &ceiling.path,
            &ceiling.fill,
            None,
            Some(FaceKind::Ceiling.class()),
            mode,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Primitive, Rect};
    use crate::document::serialize;
    use crate::types::ViewBox;

    fn state_with_square() -> State {
        let shape = Shape::new(
            0,
            Primitive::Rect(Rect {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
                rx: None,
                ry: None,
            }),
            Color::new("teal"),
        );
        State {
            view_box: ViewBox::default(),
            width: 100.0,
            height: 100.0,
            shapes: vec![shape],
            faces: None,
        }
    }

    #[test]
    fn plan_view_before_canonicalization() {
        let svg = render(&state_with_square(), Mode::Clean);
        assert_eq!(svg.view_box.as_deref(), Some("0 0 100 100"));
        let [SvgNode::Path(path)] = svg.children.as_slice() else {
            panic!("expected one path, got {:?}", svg.children);
        };
        assert_eq!(path.d.as_deref(), Some("M0,0 L10,0 L10,10 L0,10 Z"));
        assert_eq!(path.fill.as_deref(), Some("teal"));
        assert_eq!(path.opacity, None);
    }

    #[test]
    fn debug_faces_are_translucent_and_labelled() {
        let mut state = state_with_square();
        let square = Path::parse("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        state.faces = Some(vec![Face {
            kind: FaceKind::Floor,
            shape: 0,
            path: square,
            fill: Color::new("teal"),
            stroke: None,
            depth: 0.9,
        }]);
        let svg = render(&state, Mode::Debug);
        let SvgNode::Path(path) = &svg.children[0] else {
            panic!("expected the floor first");
        };
        assert_eq!(path.opacity.as_deref(), Some("0.5"));
        assert_eq!(path.class.as_deref(), Some("floor"));
        assert_eq!(path.data_depth.as_deref(), Some("0.90"));
        // the bounding box and its label follow the face
        assert!(matches!(svg.children[1], SvgNode::Rect(_)));
        assert!(matches!(svg.children[2], SvgNode::Text(_)));

        let text = serialize(&svg).unwrap();
        assert!(text.contains("0.90"));
    }
}
