//! Isometric projection and pure translation of paths.
//!
//! `isoX = x - y`, `isoY = (x + y) / 2 - z`. Control points project like
//! endpoints; arc radii are rescaled instead since an arc's radii are not
//! points.

use glam::{DVec2, dvec2};

use crate::path::{Command, CommandKind, Path};

/// Map a plan-view point at height `z` into isometric space.
pub fn iso(p: DVec2, z: f64) -> DVec2 {
    dvec2(p.x - p.y, (p.x + p.y) * 0.5 - z)
}

/// Project a plan-view path at elevation `z`.
///
/// Horizontal and vertical lines are no longer axis-aligned afterwards, so
/// they come out as plain lines.
pub fn project(path: &Path, z: f64) -> Path {
    let commands = path
        .commands()
        .iter()
        .map(|cmd| {
            let kind = match &cmd.kind {
                CommandKind::Horizontal | CommandKind::Vertical => CommandKind::Line,
                CommandKind::Cubic { c1, c2 } => CommandKind::Cubic {
                    c1: iso(*c1, z),
                    c2: iso(*c2, z),
                },
                CommandKind::Quad { c } => CommandKind::Quad { c: iso(*c, z) },
                CommandKind::Arc {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                } => CommandKind::Arc {
                    radii: dvec2(radii.x * std::f64::consts::FRAC_1_SQRT_2, radii.y * 0.5),
                    rotation: *rotation,
                    large_arc: *large_arc,
                    sweep: *sweep,
                },
                other => other.clone(),
            };
            Command {
                kind,
                to: iso(cmd.to, z),
            }
        })
        .collect();
    Path::from_commands(commands)
}

/// Shift an already projected path by `(dx, dy)` and raise it by `dz`.
///
/// No re-projection happens, so translations compose and commute.
pub fn translate(path: &Path, dx: f64, dy: f64, dz: f64) -> Path {
    let shift = dvec2(dx, dy - dz);
    let commands = path
        .commands()
        .iter()
        .map(|cmd| {
            let kind = match &cmd.kind {
                CommandKind::Cubic { c1, c2 } => CommandKind::Cubic {
                    c1: *c1 + shift,
                    c2: *c2 + shift,
                },
                CommandKind::Quad { c } => CommandKind::Quad { c: *c + shift },
                other => other.clone(),
            };
            Command {
                kind,
                to: cmd.to + shift,
            }
        })
        .collect();
    Path::from_commands(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_square_to_rhombus() {
        let square = Path::parse("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        insta::assert_snapshot!(
            project(&square, 0.0).to_string(),
            @"M0,0 L10,5 L0,10 L-10,5 Z"
        );
    }

    #[test]
    fn elevation_raises_every_point() {
        let path = Path::parse("M2,4 C1,1 3,3 6,0").unwrap();
        let low = project(&path, 0.0);
        let high = project(&path, 7.0);
        for (a, b) in low.commands().iter().zip(high.commands()) {
            assert_eq!(a.to - b.to, dvec2(0.0, 7.0));
        }
    }

    #[test]
    fn horizontal_and_vertical_become_lines() {
        let path = Path::parse("M0,0 H10 V10").unwrap();
        let projected = project(&path, 0.0);
        assert!(
            projected.commands()[1..]
                .iter()
                .all(|c| matches!(c.kind, CommandKind::Line))
        );
        assert_eq!(projected.end(), Some(dvec2(0.0, 10.0)));
    }

    #[test]
    fn arc_radii_are_rescaled() {
        let path = Path::parse("M0,0 A10,10 0 0 1 10,10").unwrap();
        let projected = project(&path, 0.0);
        let CommandKind::Arc { radii, .. } = projected.commands()[1].kind else {
            panic!("expected an arc");
        };
        assert!((radii.x - 10.0 * std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(radii.y, 5.0);
        assert_eq!(projected.commands()[1].to, dvec2(0.0, 10.0));
    }

    #[test]
    fn projection_is_linear_in_plan_translation() {
        let path = Path::parse("M1,2 L5,3 C6,6 2,8 1,9 Q0,4 1,2 Z").unwrap();
        let (dx, dy) = (3.5, -1.25);
        let moved_then_projected = project(&translate(&path, dx, dy, 0.0), 0.0);
        let projected_then_moved = translate(&project(&path, 0.0), dx - dy, (dx + dy) * 0.5, 0.0);
        for (a, b) in moved_then_projected
            .commands()
            .iter()
            .zip(projected_then_moved.commands())
        {
            assert!(a.to.distance(b.to) < 1e-12);
        }
    }

    #[test]
    fn translations_commute() {
        let path = Path::parse("M0,0 L4,2 Q5,5 0,6 Z").unwrap();
        let ab = translate(&translate(&path, 1.0, 2.0, 3.0), -4.0, 0.5, 1.0);
        let ba = translate(&translate(&path, -4.0, 0.5, 1.0), 1.0, 2.0, 3.0);
        assert_eq!(ab, ba);
    }
}
