//! Parsing and emission of SVG path data.
//!
//! Connectors and sketch strokes are stored as SVG path-data strings. The
//! sketch engine needs the underlying coordinates to jitter them, and bound
//! computation needs them to size the surface, so this module provides a
//! small structured representation of the absolute-command subset the
//! layout engines and sketch synthesizer emit.

use thiserror::Error;

use crate::geometry::Point;

/// A single absolute SVG path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// `M x y`
    MoveTo(Point),
    /// `L x y`
    LineTo(Point),
    /// `Q cx cy x y`
    QuadTo(Point, Point),
    /// `C c1x c1y c2x c2y x y`
    CubicTo(Point, Point, Point),
    /// `Z`
    Close,
}

impl PathCommand {
    /// Returns the on-curve points of this command (control points included).
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => vec![p],
            Self::QuadTo(c, p) => vec![c, p],
            Self::CubicTo(c1, c2, p) => vec![c1, c2, p],
            Self::Close => Vec::new(),
        }
    }
}

/// Errors encountered while parsing path data.
#[derive(Debug, Error)]
pub enum PathDataError {
    #[error("unsupported path command `{0}`")]
    UnsupportedCommand(char),

    #[error("malformed coordinate `{0}`")]
    MalformedCoordinate(String),

    #[error("truncated coordinate list for command `{0}`")]
    TruncatedCoordinates(char),
}

/// Parses absolute path data (`M`, `L`, `Q`, `C`, `Z`) into commands.
///
/// Relative commands and arcs are not produced by the layout engines; a
/// path containing them is reported as unsupported so callers can fall
/// back to the raw data string.
///
/// # Examples
///
/// ```
/// # use scrawl_core::path::{parse_path_data, PathCommand};
/// # use scrawl_core::geometry::Point;
/// let commands = parse_path_data("M 0 0 L 10 5").unwrap();
/// assert_eq!(commands[1], PathCommand::LineTo(Point::new(10.0, 5.0)));
/// ```
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>, PathDataError> {
    let mut commands = Vec::new();
    let mut tokens = tokenize(data);
    let mut index = 0;

    while index < tokens.len() {
        let token = std::mem::take(&mut tokens[index]);
        index += 1;

        let command = token
            .chars()
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| PathDataError::MalformedCoordinate(token.clone()))?;

        let arity = match command {
            'M' | 'L' => 2,
            'Q' => 4,
            'C' => 6,
            'Z' | 'z' => 0,
            other => return Err(PathDataError::UnsupportedCommand(other)),
        };

        if index + arity > tokens.len() {
            return Err(PathDataError::TruncatedCoordinates(command));
        }

        let mut coords = [0.0f32; 6];
        for coord in coords.iter_mut().take(arity) {
            let raw = &tokens[index];
            *coord = raw
                .parse()
                .map_err(|_| PathDataError::MalformedCoordinate(raw.clone()))?;
            index += 1;
        }

        commands.push(match command {
            'M' => PathCommand::MoveTo(Point::new(coords[0], coords[1])),
            'L' => PathCommand::LineTo(Point::new(coords[0], coords[1])),
            'Q' => PathCommand::QuadTo(
                Point::new(coords[0], coords[1]),
                Point::new(coords[2], coords[3]),
            ),
            'C' => PathCommand::CubicTo(
                Point::new(coords[0], coords[1]),
                Point::new(coords[2], coords[3]),
                Point::new(coords[4], coords[5]),
            ),
            _ => PathCommand::Close,
        });
    }

    Ok(commands)
}

/// Emits commands back to a path-data string.
pub fn emit_path_data(commands: &[PathCommand]) -> String {
    let mut data = String::new();
    for command in commands {
        if !data.is_empty() {
            data.push(' ');
        }
        match *command {
            PathCommand::MoveTo(p) => data.push_str(&format!("M {} {}", p.x(), p.y())),
            PathCommand::LineTo(p) => data.push_str(&format!("L {} {}", p.x(), p.y())),
            PathCommand::QuadTo(c, p) => {
                data.push_str(&format!("Q {} {} {} {}", c.x(), c.y(), p.x(), p.y()));
            }
            PathCommand::CubicTo(c1, c2, p) => data.push_str(&format!(
                "C {} {} {} {} {} {}",
                c1.x(),
                c1.y(),
                c2.x(),
                c2.y(),
                p.x(),
                p.y()
            )),
            PathCommand::Close => data.push('Z'),
        }
    }
    data
}

/// Splits path data into command and number tokens.
///
/// Commands may be glued to their first coordinate (`M0 0`), and numbers
/// may be separated by commas or whitespace.
fn tokenize(data: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in data.chars() {
        if c.is_ascii_alphabetic() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(c.to_string());
        } else if c.is_whitespace() || c == ',' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_parse_move_line() {
        let commands = parse_path_data("M 10 20 L 30 40").unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], PathCommand::MoveTo(Point::new(10.0, 20.0)));
        assert_eq!(commands[1], PathCommand::LineTo(Point::new(30.0, 40.0)));
    }

    #[test]
    fn test_parse_glued_and_comma_separated() {
        let commands = parse_path_data("M10,20L30,40Z").unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[2], PathCommand::Close);
    }

    #[test]
    fn test_parse_quadratic() {
        let commands = parse_path_data("M 0 0 Q 5 -3 10 0").unwrap();
        match commands[1] {
            PathCommand::QuadTo(control, end) => {
                assert_approx_eq!(f32, control.y(), -3.0);
                assert_approx_eq!(f32, end.x(), 10.0);
            }
            ref other => panic!("expected QuadTo, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_relative_commands() {
        assert!(matches!(
            parse_path_data("m 10 20 l 5 5"),
            Err(PathDataError::UnsupportedCommand('m'))
        ));
    }

    #[test]
    fn test_parse_rejects_arcs() {
        assert!(matches!(
            parse_path_data("M 0 0 A 5 5 0 0 1 10 10"),
            Err(PathDataError::UnsupportedCommand('A'))
        ));
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(
            parse_path_data("M 0"),
            Err(PathDataError::TruncatedCoordinates('M'))
        ));
    }

    #[test]
    fn test_emit_roundtrip() {
        let data = "M 0 0 L 10 5 Q 12 8 14 5 Z";
        let commands = parse_path_data(data).unwrap();
        let emitted = emit_path_data(&commands);
        assert_eq!(parse_path_data(&emitted).unwrap(), commands);
    }
}
