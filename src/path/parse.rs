//! Parse pest pairs into absolute path commands

use glam::{DVec2, dvec2};
use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use super::{Command, CommandKind, Path};
use crate::errors::PathError;
use crate::log::warn;
use crate::{PathDataParser, Rule};

pub(super) fn parse(data: &str) -> Result<Path, PathError> {
    if data.trim().is_empty() {
        return Err(PathError::Empty);
    }

    let pairs = PathDataParser::parse(Rule::path_data, data).map_err(|e| syntax_error(data, e))?;

    let mut builder = Builder::new(data);
    for pair in pairs.flat_map(|p| p.into_inner()) {
        match pair.as_rule() {
            Rule::command => builder.command(pair)?,
            Rule::arc => builder.arc(pair)?,
            _ => {}
        }
    }

    if builder.commands.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(Path {
        commands: builder.commands,
    })
}

fn syntax_error(data: &str, err: pest::error::Error<Rule>) -> PathError {
    let span: SourceSpan = match err.location {
        InputLocation::Pos(pos) => (pos, 0).into(),
        InputLocation::Span((start, end)) => (start, end.saturating_sub(start)).into(),
    };
    PathError::Syntax {
        message: err.variant.message().into_owned(),
        src: PathError::named_source(data),
        span,
    }
}

fn pair_span(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

/// Tracks the current point while commands are made absolute.
struct Builder<'a> {
    data: &'a str,
    commands: Vec<Command>,
    current: DVec2,
    subpath_start: DVec2,
    /// Second control point of the previous cubic, for `S`
    last_cubic: Option<DVec2>,
    /// Control point of the previous quadratic, for `T`
    last_quad: Option<DVec2>,
}

impl<'a> Builder<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            data,
            commands: Vec::new(),
            current: DVec2::ZERO,
            subpath_start: DVec2::ZERO,
            last_cubic: None,
            last_quad: None,
        }
    }

    fn numbers(&self, pair: Pair<Rule>) -> Result<Vec<f64>, PathError> {
        pair.into_inner()
            .filter(|p| matches!(p.as_rule(), Rule::number | Rule::flag))
            .map(|p| {
                p.as_str().parse::<f64>().map_err(|e| PathError::InvalidNumber {
                    message: e.to_string(),
                    src: PathError::named_source(self.data),
                    span: pair_span(&p),
                })
            })
            .collect()
    }

    fn require_move(&self, letter: char, span: SourceSpan) -> Result<(), PathError> {
        if self.commands.is_empty() && !matches!(letter, 'M' | 'm') {
            return Err(PathError::MissingMove {
                src: PathError::named_source(self.data),
                span,
            });
        }
        Ok(())
    }

    fn command(&mut self, pair: Pair<Rule>) -> Result<(), PathError> {
        let span = pair_span(&pair);
        let letter = pair
            .as_str()
            .chars()
            .next()
            .ok_or(PathError::Empty)?;
        self.require_move(letter, span)?;
        let args = self.numbers(pair)?;

        let arity = match letter.to_ascii_uppercase() {
            'M' | 'L' | 'T' => 2,
            'H' | 'V' => 1,
            'C' => 6,
            'S' | 'Q' => 4,
            'Z' => 0,
            _ => {
                warn!(command = %letter, "unsupported path command kept verbatim");
                self.push(Command {
                    kind: CommandKind::Unknown { letter, args },
                    to: self.current,
                });
                return Ok(());
            }
        };

        let well_formed = if arity == 0 {
            args.is_empty()
        } else {
            !args.is_empty() && args.len() % arity == 0
        };
        if !well_formed {
            return Err(PathError::ArgumentCount {
                command: letter,
                arity,
                found: args.len(),
                src: PathError::named_source(self.data),
                span,
            });
        }

        if arity == 0 {
            self.close();
            return Ok(());
        }

        let relative = letter.is_ascii_lowercase();
        for (i, group) in args.chunks(arity).enumerate() {
            self.segment(letter.to_ascii_uppercase(), relative, i, group);
        }
        Ok(())
    }

    fn arc(&mut self, pair: Pair<Rule>) -> Result<(), PathError> {
        let span = pair_span(&pair);
        let letter = pair.as_str().chars().next().ok_or(PathError::Empty)?;
        self.require_move(letter, span)?;
        let relative = letter == 'a';

        let groups: Vec<Pair<Rule>> = pair
            .into_inner()
            .filter(|p| p.as_rule() == Rule::arc_args)
            .collect();
        if groups.is_empty() {
            return Err(PathError::ArgumentCount {
                command: letter,
                arity: 7,
                found: 0,
                src: PathError::named_source(self.data),
                span,
            });
        }

        for group in groups {
            let args = self.numbers(group)?;
            let [rx, ry, rotation, large_arc, sweep, x, y] = args[..] else {
                continue;
            };
            let to = self.absolute(relative, dvec2(x, y));
            self.push(Command::arc_to(
                dvec2(rx.abs(), ry.abs()),
                rotation,
                large_arc != 0.0,
                sweep != 0.0,
                to,
            ));
        }
        Ok(())
    }

    fn absolute(&self, relative: bool, p: DVec2) -> DVec2 {
        if relative { self.current + p } else { p }
    }

    fn segment(&mut self, letter: char, relative: bool, index: usize, a: &[f64]) {
        match letter {
            'M' if index == 0 => {
                let to = self.absolute(relative, dvec2(a[0], a[1]));
                self.subpath_start = to;
                self.push(Command::move_to(to));
            }
            // extra coordinate pairs after a move are implicit lines
            'M' | 'L' => {
                let to = self.absolute(relative, dvec2(a[0], a[1]));
                self.push(Command::line_to(to));
            }
            'H' => {
                let x = if relative { self.current.x + a[0] } else { a[0] };
                self.push(Command {
                    kind: CommandKind::Horizontal,
                    to: dvec2(x, self.current.y),
                });
            }
            'V' => {
                let y = if relative { self.current.y + a[0] } else { a[0] };
                self.push(Command {
                    kind: CommandKind::Vertical,
                    to: dvec2(self.current.x, y),
                });
            }
            'C' => {
                let c1 = self.absolute(relative, dvec2(a[0], a[1]));
                let c2 = self.absolute(relative, dvec2(a[2], a[3]));
                let to = self.absolute(relative, dvec2(a[4], a[5]));
                self.push(Command::cubic_to(c1, c2, to));
            }
            'S' => {
                let c1 = match self.last_cubic {
                    Some(prev) => self.current * 2.0 - prev,
                    None => self.current,
                };
                let c2 = self.absolute(relative, dvec2(a[0], a[1]));
                let to = self.absolute(relative, dvec2(a[2], a[3]));
                self.push(Command::cubic_to(c1, c2, to));
            }
            'Q' => {
                let c = self.absolute(relative, dvec2(a[0], a[1]));
                let to = self.absolute(relative, dvec2(a[2], a[3]));
                self.push(Command::quad_to(c, to));
            }
            'T' => {
                let c = match self.last_quad {
                    Some(prev) => self.current * 2.0 - prev,
                    None => self.current,
                };
                let to = self.absolute(relative, dvec2(a[0], a[1]));
                self.push(Command::quad_to(c, to));
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        self.push(Command::close(self.subpath_start));
    }

    fn push(&mut self, cmd: Command) {
        self.last_cubic = match &cmd.kind {
            CommandKind::Cubic { c2, .. } => Some(*c2),
            _ => None,
        };
        self.last_quad = match &cmd.kind {
            CommandKind::Quad { c } => Some(*c),
            _ => None,
        };
        if !matches!(cmd.kind, CommandKind::Unknown { .. }) {
            self.current = cmd.to;
        }
        self.commands.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_commands_become_absolute() {
        let path = Path::parse("m10,10 l5,0 v5 h-5 z").unwrap();
        let points = path.points();
        assert_eq!(
            points,
            vec![
                dvec2(10.0, 10.0),
                dvec2(15.0, 10.0),
                dvec2(15.0, 15.0),
                dvec2(10.0, 15.0),
                dvec2(10.0, 10.0),
            ]
        );
        assert!(path.is_closed());
    }

    #[test]
    fn implicit_repeats_after_move_are_lines() {
        let path = Path::parse("M0 0 10 0 10 10").unwrap();
        assert!(path.commands()[0].is_move());
        assert!(matches!(path.commands()[1].kind, CommandKind::Line));
        assert!(matches!(path.commands()[2].kind, CommandKind::Line));
    }

    #[test]
    fn compact_number_syntax() {
        let path = Path::parse("M.5.5L-1-2e1").unwrap();
        assert_eq!(path.points(), vec![dvec2(0.5, 0.5), dvec2(-1.0, -20.0)]);
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let path = Path::parse("M0,0 C0,10 10,10 10,0 S20,-10 20,0").unwrap();
        let CommandKind::Cubic { c1, .. } = path.commands()[2].kind else {
            panic!("expected a cubic");
        };
        assert_eq!(c1, dvec2(10.0, -10.0));
    }

    #[test]
    fn smooth_quadratic_without_predecessor_uses_current_point() {
        let path = Path::parse("M5,5 T10,10").unwrap();
        let CommandKind::Quad { c } = path.commands()[1].kind else {
            panic!("expected a quadratic");
        };
        assert_eq!(c, dvec2(5.0, 5.0));
    }

    #[test]
    fn arc_flags_without_separators() {
        let path = Path::parse("M0,0 a5 5 0 0110 0").unwrap();
        let CommandKind::Arc {
            large_arc, sweep, ..
        } = path.commands()[1].kind
        else {
            panic!("expected an arc");
        };
        assert!(!large_arc);
        assert!(sweep);
        assert_eq!(path.commands()[1].to, dvec2(10.0, 0.0));
    }

    #[test]
    fn close_returns_to_subpath_origin() {
        let path = Path::parse("M1,1 L5,1 L5,5 Z L9,9").unwrap();
        assert_eq!(path.commands()[3].to, dvec2(1.0, 1.0));
        assert_eq!(path.commands()[4].to, dvec2(9.0, 9.0));
    }

    #[test]
    fn unknown_command_is_kept() {
        let path = Path::parse("M0,0 L10,0 X3 4 L10,10").unwrap();
        let cmd = &path.commands()[2];
        assert_eq!(
            cmd.kind,
            CommandKind::Unknown {
                letter: 'X',
                args: vec![3.0, 4.0]
            }
        );
        // the current point is untouched
        assert_eq!(cmd.to, dvec2(10.0, 0.0));
        assert_eq!(path.commands()[3].to, dvec2(10.0, 10.0));
    }

    #[test]
    fn rejects_missing_move() {
        let err = Path::parse("L10,10").unwrap_err();
        assert!(matches!(err, PathError::MissingMove { .. }));
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let err = Path::parse("M0,0 C1,2 3,4 5").unwrap_err();
        assert!(matches!(
            err,
            PathError::ArgumentCount {
                command: 'C',
                arity: 6,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(Path::parse("   "), Err(PathError::Empty)));
        assert!(matches!(
            Path::parse("M0,0 L1,1 ,,"),
            Err(PathError::Syntax { .. })
        ));
    }
}
