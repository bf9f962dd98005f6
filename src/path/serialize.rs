//! Serialize paths back to SVG path data.
//!
//! Output is always absolute. Numbers use the shortest representation that
//! parses back to the same `f64`, so parse/serialize round-trips exactly.

use std::fmt;

use super::{CommandKind, Path};

/// Format a coordinate: integers without a fractional part, no `-0`.
pub(crate) fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn fmt_point(p: glam::DVec2) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match &cmd.kind {
                CommandKind::Move => write!(f, "M{}", fmt_point(cmd.to))?,
                CommandKind::Line => write!(f, "L{}", fmt_point(cmd.to))?,
                CommandKind::Horizontal => write!(f, "H{}", fmt_num(cmd.to.x))?,
                CommandKind::Vertical => write!(f, "V{}", fmt_num(cmd.to.y))?,
                CommandKind::Cubic { c1, c2 } => write!(
                    f,
                    "C{} {} {}",
                    fmt_point(*c1),
                    fmt_point(*c2),
                    fmt_point(cmd.to)
                )?,
                CommandKind::Quad { c } => {
                    write!(f, "Q{} {}", fmt_point(*c), fmt_point(cmd.to))?
                }
                CommandKind::Arc {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                } => write!(
                    f,
                    "A{} {} {} {} {}",
                    fmt_point(*radii),
                    fmt_num(*rotation),
                    u8::from(*large_arc),
                    u8::from(*sweep),
                    fmt_point(cmd.to)
                )?,
                CommandKind::Close => f.write_str("Z")?,
                CommandKind::Unknown { letter, args } => {
                    write!(f, "{letter}")?;
                    let args: Vec<String> = args.iter().map(|a| fmt_num(*a)).collect();
                    f.write_str(&args.join(" "))?;
                }
            }
        }
        Ok(())
    }
}
