//! Wall construction from a floor outline and its boundary points.
//!
//! Each pair of consecutive boundary points cuts a run out of the floor
//! outline. That run, raised by the shape's height and walked backwards,
//! closes into one side of the wall.

use glam::DVec2;

use crate::geometry::{ArcLengthEngine, GeometryEngine};
use crate::log::{debug, warn};
use crate::options::Options;
use crate::path::{Command, EPSILON, Path};
use crate::project::translate;
use crate::shape::{Floor, Side, Wall};

/// Sides whose floor run is shorter than this are dropped
const MIN_SIDE_LENGTH: f64 = 1e-6;

/// Which of the two runs between two points of a closed outline to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcChoice {
    /// The run between the two offsets that does not cross the outline's origin
    Short,
    /// Its complement, wrapping past the origin
    Long,
}

/// Pick the run for the side from `from` to `to`, the `index`-th pair of a
/// boundary ring of `ring_len` points (the closing repeat included).
///
/// The short run is the default. A run that would go against ring order is
/// replaced by its complement, which is what keeps the closing side of a
/// ring from doubling back over the others. On a two-point ring both sides
/// would otherwise cover the same short run, so its final side always
/// takes the long one.
pub fn select_arc(from: f64, to: f64, closed: bool, ring_len: usize, index: usize) -> ArcChoice {
    if !closed {
        return ArcChoice::Short;
    }
    if ring_len == 3 && index == 1 {
        return ArcChoice::Long;
    }
    if from > to {
        ArcChoice::Long
    } else {
        ArcChoice::Short
    }
}

/// Build the sides standing on `floor` (one outline) between its boundary
/// points. Sides that cannot be extracted are skipped with a warning.
pub fn build_walls(floor: &Floor, boundaries: &[DVec2], height: f64, options: &Options) -> Wall {
    let engine = ArcLengthEngine::new(&floor.path);
    let closed = engine.is_closed();

    let mut ring = boundaries.to_vec();
    if let (true, Some(first)) = (closed, boundaries.first()) {
        ring.push(*first);
    }

    let mut sides = Vec::new();
    if ring.len() < 2 {
        warn!(count = boundaries.len(), "too few boundary points for walls");
        return Wall {
            boundaries: boundaries.to_vec(),
            sides,
        };
    }

    for i in 0..ring.len() - 1 {
        let (start, end) = (ring[i], ring[i + 1]);
        let (Some(from), Some(to)) = (locate(&engine, start), locate(&engine, end)) else {
            warn!(side = i, "boundary point is not on the outline; skipping side");
            continue;
        };

        let choice = select_arc(from, to, closed, ring.len(), i);
        let Some(bottom) = extract(&engine, from, to, choice) else {
            warn!(side = i, from, to, "degenerate wall side skipped");
            continue;
        };

        let fill = options.wall_fill(&floor.fill, sides.len());
        sides.push(Side {
            path: side_path(&bottom, height),
            bottom,
            fill,
            depth: 0.0,
        });
    }

    debug!(boundaries = boundaries.len(), sides = sides.len(), "built walls");
    Wall {
        boundaries: boundaries.to_vec(),
        sides,
    }
}

/// Offset of `point`, snapping to the nearest outline point when it is
/// slightly off. The end of a closed outline is reported as its origin.
fn locate(engine: &ArcLengthEngine, point: DVec2) -> Option<f64> {
    let offset = engine.offset_of(point).or_else(|| {
        let (snapped, _) = engine.nearest_point(point)?;
        engine.offset_of(snapped)
    })?;
    if engine.is_closed() && offset >= engine.length() - EPSILON {
        Some(0.0)
    } else {
        Some(offset)
    }
}

/// The floor run from `from` to `to`, always oriented from start to end.
fn extract(engine: &ArcLengthEngine, from: f64, to: f64, choice: ArcChoice) -> Option<Path> {
    let run = match (choice, from <= to) {
        (ArcChoice::Short, true) | (ArcChoice::Long, false) => engine.sub_path(from, to),
        (ArcChoice::Short, false) | (ArcChoice::Long, true) => {
            engine.sub_path(to, from).map(|p| p.reversed())
        }
    }?;
    (ArcLengthEngine::new(&run).length() > MIN_SIDE_LENGTH).then_some(run)
}

/// Close a floor run and its raised copy into one face.
fn side_path(bottom: &Path, height: f64) -> Path {
    let top = translate(bottom, 0.0, 0.0, height).reversed();
    let mut commands: Vec<Command> = bottom.commands().to_vec();
    let mut top = top.into_commands().into_iter();
    if let Some(first) = top.next() {
        commands.push(Command::line_to(first.to));
    }
    commands.extend(top);
    if let Some(origin) = bottom.start() {
        let end = commands.last().map(|c| c.to);
        if end.is_some_and(|e| e.distance(origin) > EPSILON) {
            commands.push(Command::close(origin));
        }
    }
    Path::from_commands(commands)
}
