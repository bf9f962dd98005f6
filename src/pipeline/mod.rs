//! The transformation pipeline.
//!
//! A run scans the drawing into a [`State`] and then passes that state by
//! value through a fixed list of stages, each returning the next state.
//! After every stage the state is rendered, which gives the per-step
//! documents of [`Transformed::steps`].

mod recenter;
mod stages;

pub use recenter::recenter;

use crate::document::{self, Scanned};
use crate::log::{debug, info};
use crate::options::Options;
use crate::order::Face;
use crate::render::{Mode, render};
use crate::shape::Shape;
use crate::types::ViewBox;

/// Everything one run knows about the drawing at a given point.
#[derive(Debug, Clone)]
pub struct State {
    pub view_box: ViewBox,
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
    /// Faces in paint order, once layers have been ordered
    pub faces: Option<Vec<Face>>,
}

impl From<Scanned> for State {
    fn from(scanned: Scanned) -> Self {
        State {
            view_box: scanned.view_box,
            width: scanned.width,
            height: scanned.height,
            shapes: scanned.shapes,
            faces: None,
        }
    }
}

/// One stage: takes the state and returns its successor.
pub type Stage = fn(State, &Options) -> State;

/// The stages after scanning, in execution order.
pub const STAGES: &[(&str, Stage)] = &[
    ("canonicalize", stages::canonicalize),
    ("outline-strokes", stages::outline_strokes),
    ("floors", stages::floors),
    ("boundaries", stages::boundaries),
    ("walls", stages::walls),
    ("ceilings", stages::ceilings),
    ("recenter", recenter::stage),
    ("order-layers", stages::order_layers),
];

/// The documents rendered after one stage.
#[derive(Debug, Clone)]
pub struct Step {
    pub name: &'static str,
    pub svg: String,
    /// Present when [`Options::debug`] is set
    pub svg_debug: Option<String>,
}

impl Step {
    fn capture(name: &'static str, state: &State, options: &Options) -> miette::Result<Step> {
        let svg = document::serialize(&render(state, Mode::Clean))?;
        let svg_debug = if options.debug {
            Some(document::serialize(&render(state, Mode::Debug))?)
        } else {
            None
        };
        Ok(Step {
            name,
            svg,
            svg_debug,
        })
    }
}

/// The result of a run.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Final faces only, in paint order
    pub svg: String,
    /// Final faces with boundary markers and depth labels
    pub svg_debug: Option<String>,
    /// Every stage from `scan` on, with its rendering
    pub steps: Vec<Step>,
    pub shapes: Vec<Shape>,
    pub faces: Vec<Face>,
}

/// Run the whole pipeline over SVG text.
///
/// Only an unreadable input document or a serialization failure is an
/// error; shapes and wall sides that cannot be built are skipped.
pub fn transform(svg: &str, options: &Options) -> miette::Result<Transformed> {
    let mut state = State::from(document::scan(svg, options)?);
    let mut steps = vec![Step::capture("scan", &state, options)?];

    for &(name, stage) in STAGES {
        state = stage(state, options);
        debug!(stage = name, shapes = state.shapes.len(), "stage done");
        steps.push(Step::capture(name, &state, options)?);
    }

    let faces = state.faces.take().unwrap_or_default();
    info!(
        shapes = state.shapes.len(),
        faces = faces.len(),
        "transformation complete"
    );

    let (svg, svg_debug) = match steps.last() {
        Some(last) => (last.svg.clone(), last.svg_debug.clone()),
        None => (String::new(), None),
    };
    Ok(Transformed {
        svg,
        svg_debug,
        steps,
        shapes: state.shapes,
        faces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="100" height="100">
        <rect x="0" y="0" width="10" height="10" fill="teal"/>
    </svg>"#;

    #[test]
    fn records_every_stage() {
        let result = transform(SQUARE, &Options::default().with_debug(true)).unwrap();
        let names: Vec<&str> = result.steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "scan",
                "canonicalize",
                "outline-strokes",
                "floors",
                "boundaries",
                "walls",
                "ceilings",
                "recenter",
                "order-layers"
            ]
        );
        assert!(result.steps.iter().all(|s| s.svg_debug.is_some()));
        assert_eq!(result.steps.last().map(|s| &s.svg), Some(&result.svg));
    }

    #[test]
    fn debug_documents_are_off_by_default() {
        assert!(!Options::default().debug);
        let result = transform(SQUARE, &Options::default()).unwrap();
        assert!(result.svg_debug.is_none());
        assert!(result.steps.iter().all(|s| s.svg_debug.is_none()));
    }

    #[test]
    fn empty_drawing_still_produces_a_document() {
        let result = transform(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 50 50"></svg>"#,
            &Options::default(),
        )
        .unwrap();
        assert!(result.faces.is_empty());
        assert!(result.svg.contains("0 0 50 50"));
    }
}
