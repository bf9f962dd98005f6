//! Extrude flat, top-down SVG drawings into isometric SVG drawings.
//!
//! Every shape of the input becomes a floor, a ring of walls and a ceiling,
//! projected isometrically and painted back to front.
//!
//! ```rust
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
//!     <rect x="10" y="10" width="30" height="30" fill="teal" data-height="15"/>
//! </svg>"#;
//! let out = isoextrude::transform_svg(svg).unwrap();
//! assert!(out.contains(r#"class="wall""#));
//! ```

use pest_derive::Parser;

pub mod boundary;
pub mod canonical;
pub mod ceiling;
pub mod document;
pub mod errors;
pub mod geometry;
pub mod log;
pub mod options;
pub mod order;
pub mod path;
pub mod pipeline;
pub mod project;
pub mod render;
pub mod shape;
pub mod types;
pub mod walls;

pub use errors::{DocumentError, PathError, ShapeError};
pub use options::Options;
pub use pipeline::{Step, Transformed, transform};

#[derive(Parser)]
#[grammar = "path.pest"]
pub struct PathDataParser;

/// Transform SVG text with default options and return the clean document.
///
/// Returns the SVG string on success, or an error with diagnostics.
pub fn transform_svg(svg: &str) -> Result<String, miette::Report> {
    Ok(transform(svg, &Options::default())?.svg)
}
