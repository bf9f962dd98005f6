//! Boundary detection: where along a floor outline walls must split.
//!
//! Two kinds of points qualify:
//! - corners, found at segment junctions from the incoming and outgoing
//!   tangents (sharp interior angle, concave turn, or a near-right angle)
//! - the leftmost and rightmost points of the outline, found by sampling,
//!   since under projection the silhouette extrema often sit mid-curve
//!
//! Points are returned in outline order so the wall builder can walk them
//! as a ring.

use glam::DVec2;

use crate::geometry::{ArcLengthEngine, GeometryEngine};
use crate::log::debug;
use crate::options::Options;
use crate::path::Path;

/// Turns sharper than this (as the sine of the turn) count toward concavity
const CONCAVE_EPS: f64 = 0.05;

/// Find the boundary points of one outline (a single subpath).
///
/// Closed outlines with any width yield at least two points: the extrema.
/// Open outlines always include their first and last points.
pub fn find_boundaries(path: &Path, options: &Options) -> Vec<DVec2> {
    let engine = ArcLengthEngine::new(path);
    let segments: Vec<_> = engine.segments().copied().collect();
    if segments.is_empty() {
        return Vec::new();
    }
    let offsets: Vec<f64> = engine.segment_offsets().collect();
    let closed = engine.is_closed();
    let samples = engine.samples(options.samples);
    let area = signed_area(samples.iter().map(|(p, _)| *p));
    let orientation = if area.abs() > 1e-12 { area.signum() } else { 0.0 };

    let mut found: Vec<(f64, DVec2)> = Vec::new();
    let n = segments.len();
    for i in 0..n {
        let incoming = if i > 0 {
            segments[i - 1].end_tangent()
        } else if closed {
            segments[n - 1].end_tangent()
        } else {
            found.push((0.0, segments[0].start()));
            continue;
        };
        let outgoing = segments[i].start_tangent();
        if is_corner(incoming, outgoing, orientation, options.corner_angle) {
            found.push((offsets[i], segments[i].start()));
        }
    }
    if !closed {
        found.push((engine.length(), segments[n - 1].end()));
    }

    // silhouette extrema; first sample wins ties
    let leftmost = samples
        .iter()
        .copied()
        .reduce(|best, s| if s.0.x < best.0.x { s } else { best });
    let rightmost = samples
        .iter()
        .copied()
        .reduce(|best, s| if s.0.x > best.0.x { s } else { best });
    for (point, offset) in [leftmost, rightmost].into_iter().flatten() {
        let near = found
            .iter()
            .any(|(_, p)| (p.x - point.x).abs() < options.dedup_tolerance);
        if !near {
            found.push((offset, point));
        }
    }

    found.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut points: Vec<DVec2> = Vec::with_capacity(found.len());
    for (_, p) in found {
        if points
            .last()
            .is_none_or(|last| last.distance(p) >= options.dedup_tolerance)
        {
            points.push(p);
        }
    }
    if closed && points.len() > 1 {
        let (first, last) = (points[0], points[points.len() - 1]);
        if first.distance(last) < options.dedup_tolerance {
            points.pop();
        }
    }

    debug!(count = points.len(), closed, "found wall boundaries");
    points
}

/// Whether the junction between two unit tangents is a wall corner.
///
/// `orientation` is the sign of the outline's signed area, so that a turn
/// against it is concave.
pub fn is_corner(incoming: DVec2, outgoing: DVec2, orientation: f64, threshold_deg: f64) -> bool {
    if incoming == DVec2::ZERO || outgoing == DVec2::ZERO {
        return false;
    }
    let interior = (-incoming).dot(outgoing).clamp(-1.0, 1.0).acos().to_degrees();
    let turn = incoming.perp_dot(outgoing);
    let concave = orientation != 0.0 && turn * orientation < -CONCAVE_EPS;
    // near-right angles sit close to the threshold on noisy input
    let likely_corner = incoming.dot(outgoing).abs() < 0.1 && turn.abs() > 0.5;
    interior < threshold_deg || concave || likely_corner
}

/// Shoelace area; positive for clockwise travel in y-down coordinates.
fn signed_area(points: impl Iterator<Item = DVec2>) -> f64 {
    let points: Vec<DVec2> = points.collect();
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Circle, ToPath};
    use crate::project::project;
    use glam::dvec2;

    fn boundaries(d: &str) -> Vec<DVec2> {
        find_boundaries(&Path::parse(d).unwrap(), &Options::default())
    }

    fn assert_points(actual: &[DVec2], expected: &[DVec2]) {
        assert_eq!(actual.len(), expected.len(), "got {actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.distance(*e) < 1e-6, "expected {e}, got {a}");
        }
    }

    #[test]
    fn square_has_four_corners() {
        let points = boundaries("M0,0 L10,0 L10,10 L0,10 Z");
        assert_points(
            &points,
            &[
                dvec2(0.0, 0.0),
                dvec2(10.0, 0.0),
                dvec2(10.0, 10.0),
                dvec2(0.0, 10.0),
            ],
        );
    }

    #[test]
    fn projected_square_keeps_four_corners() {
        let square = Path::parse("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        let points = find_boundaries(&project(&square, 0.0), &Options::default());
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn circle_has_two_extrema() {
        let circle = Circle {
            cx: 0.0,
            cy: 0.0,
            r: 5.0,
        }
        .to_path()
        .unwrap();
        let points = find_boundaries(&circle, &Options::default());
        assert_points(&points, &[dvec2(5.0, 0.0), dvec2(-5.0, 0.0)]);
    }

    #[test]
    fn projected_circle_extrema_lie_mid_curve() {
        let circle = Circle {
            cx: 0.0,
            cy: 0.0,
            r: 5.0,
        }
        .to_path()
        .unwrap();
        let points = find_boundaries(&project(&circle, 0.0), &Options::default());
        assert_eq!(points.len(), 2);
        let reach = 5.0 * std::f64::consts::SQRT_2;
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert!(xs.iter().any(|x| (x - reach).abs() < 0.05), "{xs:?}");
        assert!(xs.iter().any(|x| (x + reach).abs() < 0.05), "{xs:?}");
    }

    #[test]
    fn concave_corner_is_found() {
        // an L shape: the inner corner at (5,5) turns against the outline
        let points = boundaries("M0,0 L10,0 L10,5 L5,5 L5,10 L0,10 Z");
        assert_eq!(points.len(), 6);
        assert!(points.iter().any(|p| p.distance(dvec2(5.0, 5.0)) < 1e-9));
    }

    #[test]
    fn gentle_bends_are_not_corners() {
        // the middle vertex bends by about 11 degrees
        let points = boundaries("M0,0 L10,0 L20,2 L20,10 L0,10 Z");
        assert!(!points.iter().any(|p| p.distance(dvec2(10.0, 0.0)) < 1e-9));
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn open_outline_includes_endpoints() {
        let points = boundaries("M0,0 L10,0 L20,0");
        assert_points(&points, &[dvec2(0.0, 0.0), dvec2(20.0, 0.0)]);
    }

    #[test]
    fn corner_classification() {
        let east = dvec2(1.0, 0.0);
        let south = dvec2(0.0, 1.0);
        assert!(is_corner(east, south, 1.0, 130.0));
        assert!(!is_corner(east, east, 1.0, 130.0));
        // a slight turn against the outline is concave
        let slight = dvec2(1.0, -0.2).normalize();
        assert!(is_corner(east, slight, 1.0, 130.0));
        assert!(!is_corner(east, slight, -1.0, 130.0));
        assert!(!is_corner(DVec2::ZERO, east, 1.0, 130.0));
    }
}
