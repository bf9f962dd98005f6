//! Shape canonicalization: every primitive becomes a [`Path`].
//!
//! Rounded corners, circles and ellipses are drawn with cubic quarter arcs
//! using the usual circle-approximation control-point ratio.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::errors::ShapeError;
use crate::log::warn;
use crate::path::{Command, EPSILON, Path};

/// Control-point ratio for approximating a quarter circle with a cubic (≈0.5523)
pub const KAPPA: f64 = 4.0 * (std::f64::consts::SQRT_2 - 1.0) / 3.0;

/// The primitive kinds of the input dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Polygon,
    Polyline,
    Path,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Path => "path",
        }
    }
}

/// Conversion of a primitive into its equivalent path.
#[enum_dispatch]
pub trait ToPath {
    fn kind(&self) -> ShapeKind;

    fn to_path(&self) -> Result<Path, ShapeError>;
}

/// Any input primitive, with its geometry already read from the markup.
#[enum_dispatch(ToPath)]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(Rect),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Polygon(Polygon),
    Polyline(Polyline),
    PathData(PathData),
}

// ============================================================================
// Primitives
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner radii as written; a missing one takes the other's value
    pub rx: Option<f64>,
    pub ry: Option<f64>,
}

impl ToPath for Rect {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rect
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        if !(w > 0.0 && h > 0.0) {
            return Err(ShapeError::Empty { kind: "rect" });
        }

        let rx = self.rx.or(self.ry).unwrap_or(0.0).max(0.0).min(w / 2.0);
        let ry = self.ry.or(self.rx).unwrap_or(0.0).max(0.0).min(h / 2.0);
        if rx <= EPSILON || ry <= EPSILON {
            return Ok(Path::polyline(
                &[dvec2(x, y), dvec2(x + w, y), dvec2(x + w, y + h), dvec2(x, y + h)],
                true,
            ));
        }

        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let (right, bottom) = (x + w, y + h);
        let mut builder = Builder::new(dvec2(x + rx, y));
        builder.line(dvec2(right - rx, y));
        builder.cubic(
            dvec2(right - rx + kx, y),
            dvec2(right, y + ry - ky),
            dvec2(right, y + ry),
        );
        builder.line(dvec2(right, bottom - ry));
        builder.cubic(
            dvec2(right, bottom - ry + ky),
            dvec2(right - rx + kx, bottom),
            dvec2(right - rx, bottom),
        );
        builder.line(dvec2(x + rx, bottom));
        builder.cubic(
            dvec2(x + rx - kx, bottom),
            dvec2(x, bottom - ry + ky),
            dvec2(x, bottom - ry),
        );
        builder.line(dvec2(x, y + ry));
        builder.cubic(dvec2(x, y + ry - ky), dvec2(x + rx - kx, y), dvec2(x + rx, y));
        Ok(builder.close())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl ToPath for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        if !(self.r > 0.0) {
            return Err(ShapeError::Empty { kind: "circle" });
        }
        Ok(ellipse_path(dvec2(self.cx, self.cy), dvec2(self.r, self.r)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl ToPath for Ellipse {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipse
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        if !(self.rx > 0.0 && self.ry > 0.0) {
            return Err(ShapeError::Empty { kind: "ellipse" });
        }
        Ok(ellipse_path(dvec2(self.cx, self.cy), dvec2(self.rx, self.ry)))
    }
}

/// Four cubic quarter arcs, starting at the rightmost point.
fn ellipse_path(c: DVec2, r: DVec2) -> Path {
    let k = r * KAPPA;
    let mut builder = Builder::new(dvec2(c.x + r.x, c.y));
    builder.cubic(
        dvec2(c.x + r.x, c.y + k.y),
        dvec2(c.x + k.x, c.y + r.y),
        dvec2(c.x, c.y + r.y),
    );
    builder.cubic(
        dvec2(c.x - k.x, c.y + r.y),
        dvec2(c.x - r.x, c.y + k.y),
        dvec2(c.x - r.x, c.y),
    );
    builder.cubic(
        dvec2(c.x - r.x, c.y - k.y),
        dvec2(c.x - k.x, c.y - r.y),
        dvec2(c.x, c.y - r.y),
    );
    builder.cubic(
        dvec2(c.x + k.x, c.y - r.y),
        dvec2(c.x + r.x, c.y - k.y),
        dvec2(c.x + r.x, c.y),
    );
    builder.close()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ToPath for Line {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        let (a, b) = (dvec2(self.x1, self.y1), dvec2(self.x2, self.y2));
        if a.distance(b) <= EPSILON {
            return Err(ShapeError::Empty { kind: "line" });
        }
        Ok(Path::polyline(&[a, b], false))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<DVec2>,
}

impl ToPath for Polygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        if self.points.len() < 2 {
            return Err(ShapeError::Empty { kind: "polygon" });
        }
        Ok(Path::polyline(&self.points, true))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<DVec2>,
}

impl ToPath for Polyline {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polyline
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        if self.points.len() < 2 {
            return Err(ShapeError::Empty { kind: "polyline" });
        }
        Ok(Path::polyline(&self.points, false))
    }
}

/// A `<path>` element's data, parsed on canonicalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub d: String,
}

impl ToPath for PathData {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Path
    }

    fn to_path(&self) -> Result<Path, ShapeError> {
        Ok(Path::parse(&self.d)?)
    }
}

/// Parse a `points` attribute (`"0,0 10,0 10,10"`).
pub fn parse_points(text: &str) -> Result<Vec<DVec2>, ShapeError> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    // points up to the first unreadable number are kept
    let numbers: Vec<f64> = tokens
        .iter()
        .map_while(|s| s.parse::<f64>().ok())
        .collect();
    if let Some(bad) = tokens.get(numbers.len()) {
        warn!(
            token = *bad,
            kept = numbers.len(),
            dropped = tokens.len() - numbers.len(),
            "unreadable number in points; truncating"
        );
    }
    if numbers.len() % 2 != 0 {
        return Err(ShapeError::OddPoints {
            count: numbers.len(),
        });
    }
    Ok(numbers.chunks(2).map(|c| dvec2(c[0], c[1])).collect())
}

/// Accumulates commands, dropping zero-length lines.
struct Builder {
    origin: DVec2,
    current: DVec2,
    commands: Vec<Command>,
}

impl Builder {
    fn new(origin: DVec2) -> Self {
        Self {
            origin,
            current: origin,
            commands: vec![Command::move_to(origin)],
        }
    }

    fn line(&mut self, to: DVec2) {
        if to.distance(self.current) > EPSILON {
            self.commands.push(Command::line_to(to));
            self.current = to;
        }
    }

    fn cubic(&mut self, c1: DVec2, c2: DVec2, to: DVec2) {
        self.commands.push(Command::cubic_to(c1, c2, to));
        self.current = to;
    }

    fn close(mut self) -> Path {
        self.commands.push(Command::close(self.origin));
        Path::from_commands(self.commands)
    }
}
