//! Path model: absolute drawing commands parsed from and serialized to SVG path data.
//!
//! Relative commands never survive parsing: every command is stored with
//! absolute coordinates, `S`/`T` shorthands are expanded to full cubic and
//! quadratic commands, and a close command records the point it returns to.

mod parse;
mod serialize;

use glam::DVec2;

use crate::errors::PathError;
use crate::geometry::Segment;
use crate::types::BBox;

pub(crate) use serialize::fmt_num;

/// Points closer than this are considered coincident.
pub const EPSILON: f64 = 1e-6;

/// The geometry carried by one command, besides its endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    Move,
    Line,
    Horizontal,
    Vertical,
    Cubic {
        c1: DVec2,
        c2: DVec2,
    },
    Quad {
        c: DVec2,
    },
    Arc {
        radii: DVec2,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
    },
    Close,
    /// A command letter we do not interpret, kept verbatim with its arguments.
    Unknown {
        letter: char,
        args: Vec<f64>,
    },
}

/// One drawing command with its absolute endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub to: DVec2,
}

impl Command {
    pub fn move_to(to: DVec2) -> Self {
        Self { kind: CommandKind::Move, to }
    }

    pub fn line_to(to: DVec2) -> Self {
        Self { kind: CommandKind::Line, to }
    }

    pub fn cubic_to(c1: DVec2, c2: DVec2, to: DVec2) -> Self {
        Self {
            kind: CommandKind::Cubic { c1, c2 },
            to,
        }
    }

    pub fn quad_to(c: DVec2, to: DVec2) -> Self {
        Self {
            kind: CommandKind::Quad { c },
            to,
        }
    }

    pub fn arc_to(radii: DVec2, rotation: f64, large_arc: bool, sweep: bool, to: DVec2) -> Self {
        Self {
            kind: CommandKind::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
            },
            to,
        }
    }

    /// Close the current subpath, which started at `origin`.
    pub fn close(origin: DVec2) -> Self {
        Self {
            kind: CommandKind::Close,
            to: origin,
        }
    }

    /// Whether the segment ending at this command is curved.
    pub fn is_curve(&self) -> bool {
        matches!(
            self.kind,
            CommandKind::Cubic { .. } | CommandKind::Quad { .. } | CommandKind::Arc { .. }
        )
    }

    pub fn is_move(&self) -> bool {
        matches!(self.kind, CommandKind::Move)
    }

    /// The SVG letter this command serializes as.
    pub fn letter(&self) -> char {
        match &self.kind {
            CommandKind::Move => 'M',
            CommandKind::Line => 'L',
            CommandKind::Horizontal => 'H',
            CommandKind::Vertical => 'V',
            CommandKind::Cubic { .. } => 'C',
            CommandKind::Quad { .. } => 'Q',
            CommandKind::Arc { .. } => 'A',
            CommandKind::Close => 'Z',
            CommandKind::Unknown { letter, .. } => *letter,
        }
    }
}

/// An ordered sequence of absolute drawing commands.
///
/// A non-empty path always begins with a move.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<Command>,
}

impl Path {
    /// Parse SVG path data.
    pub fn parse(data: &str) -> Result<Path, PathError> {
        parse::parse(data)
    }

    /// Build a path from commands. A leading non-move command gets a move
    /// to its own endpoint inserted in front of it.
    pub fn from_commands(commands: Vec<Command>) -> Path {
        match commands.first() {
            Some(first) if !first.is_move() => {
                let mut fixed = Vec::with_capacity(commands.len() + 1);
                fixed.push(Command::move_to(first.to));
                fixed.extend(commands);
                Path { commands: fixed }
            }
            _ => Path { commands },
        }
    }

    /// A polyline through `points`, closed when `close` is set.
    pub fn polyline(points: &[DVec2], close: bool) -> Path {
        let mut commands = Vec::with_capacity(points.len() + 1);
        for (i, p) in points.iter().enumerate() {
            commands.push(if i == 0 {
                Command::move_to(*p)
            } else {
                Command::line_to(*p)
            });
        }
        if let (true, Some(first)) = (close, points.first()) {
            commands.push(Command::close(*first));
        }
        Path { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn start(&self) -> Option<DVec2> {
        self.commands.first().map(|c| c.to)
    }

    pub fn end(&self) -> Option<DVec2> {
        self.commands.last().map(|c| c.to)
    }

    /// A path is closed when its terminal point equals its origin.
    pub fn is_closed(&self) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => self.commands.len() > 1 && start.distance(end) < EPSILON,
            _ => false,
        }
    }

    /// Whether the path contains any curved segment.
    pub fn has_curves(&self) -> bool {
        self.commands.iter().any(Command::is_curve)
    }

    /// The endpoint of every command, in order.
    pub fn points(&self) -> Vec<DVec2> {
        self.commands.iter().map(|c| c.to).collect()
    }

    /// Split into one path per move command.
    pub fn subpaths(&self) -> Vec<Path> {
        let mut out: Vec<Path> = Vec::new();
        for cmd in &self.commands {
            if cmd.is_move() || out.is_empty() {
                out.push(Path::default());
            }
            if let Some(current) = out.last_mut() {
                current.commands.push(cmd.clone());
            }
        }
        out.retain(|p| p.commands.len() > 1);
        out
    }

    /// Concatenate paths into one compound path.
    pub fn join(paths: impl IntoIterator<Item = Path>) -> Path {
        Path {
            commands: paths.into_iter().flat_map(|p| p.commands).collect(),
        }
    }

    /// The drawable segments of the path. Arcs come back as cubic
    /// approximations and quadratics are degree-elevated; moves and
    /// unknown commands contribute nothing.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut current = DVec2::ZERO;
        for cmd in &self.commands {
            match &cmd.kind {
                CommandKind::Move | CommandKind::Unknown { .. } => {}
                CommandKind::Line
                | CommandKind::Horizontal
                | CommandKind::Vertical
                | CommandKind::Close => {
                    if current.distance(cmd.to) > EPSILON || !matches!(cmd.kind, CommandKind::Close) {
                        out.push(Segment::Line(current, cmd.to));
                    }
                }
                CommandKind::Cubic { c1, c2 } => {
                    out.push(Segment::Cubic([current, *c1, *c2, cmd.to]));
                }
                CommandKind::Quad { c } => {
                    out.push(Segment::from_quad(current, *c, cmd.to));
                }
                CommandKind::Arc {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                } => {
                    out.extend(crate::geometry::arc_to_cubics(
                        current, *radii, *rotation, *large_arc, *sweep, cmd.to,
                    ));
                }
            }
            if !matches!(cmd.kind, CommandKind::Unknown { .. }) {
                current = cmd.to;
            }
        }
        out
    }

    /// Tight bounding box, including curve extrema.
    pub fn bounding_box(&self) -> BBox {
        let mut bbox = BBox::new();
        for cmd in &self.commands {
            if cmd.is_move() {
                bbox.include(cmd.to);
            }
        }
        for seg in self.segments() {
            bbox = bbox.union(&seg.bounding_box());
        }
        bbox
    }

    /// The same geometry traversed in the opposite direction, subpath by
    /// subpath. A closing command stays at the end of its subpath.
    pub fn reversed(&self) -> Path {
        let mut commands = Vec::with_capacity(self.commands.len());
        for sub in self.subpaths() {
            commands.extend(reverse_subpath(&sub.commands));
        }
        Path { commands }
    }
}

fn reverse_subpath(commands: &[Command]) -> Vec<Command> {
    let Some(first) = commands.first() else {
        return Vec::new();
    };

    // (start point, command) pairs for every drawing command
    let mut spans = Vec::with_capacity(commands.len());
    let mut current = first.to;
    for cmd in &commands[1..] {
        if matches!(cmd.kind, CommandKind::Unknown { .. }) {
            continue;
        }
        spans.push((current, cmd));
        current = cmd.to;
    }
    let closes = matches!(commands.last().map(|c| &c.kind), Some(CommandKind::Close));

    let mut out = vec![Command::move_to(current)];
    for (from, cmd) in spans.iter().rev() {
        let kind = match &cmd.kind {
            CommandKind::Cubic { c1, c2 } => CommandKind::Cubic { c1: *c2, c2: *c1 },
            CommandKind::Quad { c } => CommandKind::Quad { c: *c },
            CommandKind::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
            } => CommandKind::Arc {
                radii: *radii,
                rotation: *rotation,
                large_arc: *large_arc,
                sweep: !*sweep,
            },
            _ => CommandKind::Line,
        };
        out.push(Command { kind, to: *from });
    }

    if closes {
        let origin = first.to;
        match out.last() {
            Some(last) if matches!(last.kind, CommandKind::Line) && out.len() > 2 => {
                let n = out.len();
                out[n - 1] = Command::close(origin);
            }
            _ => out.push(Command::close(origin)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn closed_polyline_reports_closed() {
        let path = Path::polyline(
            &[dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 10.0)],
            true,
        );
        assert!(path.is_closed());
        let open = Path::polyline(&[dvec2(0.0, 0.0), dvec2(10.0, 0.0)], false);
        assert!(!open.is_closed());
    }

    #[test]
    fn from_commands_inserts_leading_move() {
        let path = Path::from_commands(vec![Command::line_to(dvec2(3.0, 4.0))]);
        assert!(path.commands()[0].is_move());
        assert_eq!(path.commands()[0].to, dvec2(3.0, 4.0));
    }

    #[test]
    fn subpaths_split_on_moves() {
        let path = Path::parse("M0,0 L10,0 L10,10 Z M20,20 L30,20 L30,30 Z").unwrap();
        let subs = path.subpaths();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].start(), Some(dvec2(20.0, 20.0)));
        assert!(subs.iter().all(Path::is_closed));
    }

    #[test]
    fn reversed_square_keeps_close() {
        let path = Path::parse("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        let rev = path.reversed();
        assert_eq!(rev.to_string(), "M0,0 L0,10 L10,10 L10,0 Z");
        assert!(rev.is_closed());
    }

    #[test]
    fn reversed_cubic_swaps_controls() {
        let path = Path::parse("M0,0 C1,2 3,4 5,6").unwrap();
        assert_eq!(path.reversed().to_string(), "M5,6 C3,4 1,2 0,0");
    }

    #[test]
    fn bounding_box_includes_curve_extrema() {
        // quarter circles bulge past their endpoints
        let path = Path::parse("M-5,0 A5,5 0 0 1 5,0").unwrap();
        let bbox = path.bounding_box();
        assert!((bbox.min.x + 5.0).abs() < 1e-9);
        assert!((bbox.max.x - 5.0).abs() < 1e-9);
        assert!((bbox.min.y + 5.0).abs() < 0.01, "min y = {}", bbox.min.y);
        assert!(bbox.max.y.abs() < 1e-9);
    }
}
