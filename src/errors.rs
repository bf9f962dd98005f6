//! Error types with rich diagnostics using miette
//!
//! Path data errors carry source spans pointing at the offending token.
//! Shape and wall level failures are not errors at all: the pipeline logs
//! them and skips the unit, so only whole-document problems reach callers.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Path Data Errors
// ============================================================================

/// Errors that occur while parsing the `d` attribute of a path
#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("path data is empty")]
    #[diagnostic(code(isoextrude::path::empty))]
    Empty,

    #[error("path data must start with a move command")]
    #[diagnostic(
        code(isoextrude::path::missing_move),
        help("begin the data with `M x,y` or `m x,y`")
    )]
    MissingMove {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a move here")]
        span: SourceSpan,
    },

    #[error("`{command}` takes arguments in groups of {arity}, found {found}")]
    #[diagnostic(code(isoextrude::path::argument_count))]
    ArgumentCount {
        command: char,
        arity: usize,
        found: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this command")]
        span: SourceSpan,
    },

    #[error("invalid number: {message}")]
    #[diagnostic(code(isoextrude::path::invalid_number))]
    InvalidNumber {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("invalid path data: {message}")]
    #[diagnostic(code(isoextrude::path::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}

impl PathError {
    pub(crate) fn named_source(data: &str) -> NamedSource<String> {
        NamedSource::new("<path data>", data.to_string())
    }
}

// ============================================================================
// Shape Errors
// ============================================================================

/// A primitive whose attributes cannot be turned into geometry
#[derive(Error, Diagnostic, Debug)]
pub enum ShapeError {
    #[error("`points` holds an odd number of coordinates ({count})")]
    #[diagnostic(code(isoextrude::shape::odd_points))]
    OddPoints { count: usize },

    #[error("`<{kind}>` has no usable geometry")]
    #[diagnostic(code(isoextrude::shape::empty))]
    Empty { kind: &'static str },

    #[error("`<path>` has invalid path data")]
    #[diagnostic(code(isoextrude::shape::path))]
    Path(
        #[from]
        #[diagnostic_source]
        PathError,
    ),
}

// ============================================================================
// Document Errors
// ============================================================================

/// Errors reading or writing whole documents
#[derive(Error, Diagnostic, Debug)]
pub enum DocumentError {
    #[error("could not parse the input document: {message}")]
    #[diagnostic(
        code(isoextrude::document::parse),
        help("the input must be an `<svg>` document in the SVG namespace")
    )]
    Parse { message: String },

    #[error("could not serialize the output document: {message}")]
    #[diagnostic(code(isoextrude::document::serialize))]
    Serialize { message: String },
}
