//! Point file format encoder/decoder.
//!
//! Point files are text files with one point per line, written as two
//! comma-separated coordinates (`x,y`).  Whitespace around coordinates is
//! ignored, and so are empty lines.

use itertools::Itertools as _;
use lloyd::Point2D;
use std::fmt;
use std::io;
use std::num::ParseFloatError;

#[derive(Debug)]
pub enum Error {
    /// A line does not hold exactly two coordinates.
    BadCoordinateCount { line: usize, count: usize },

    /// A coordinate is not a number.
    BadCoordinate { line: usize, source: ParseFloatError },

    /// A coordinate is NaN or infinite.
    NonFiniteCoordinate { line: usize },

    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadCoordinateCount { line, count } => {
                write!(f, "line {line}: expected 2 coordinates, got {count}")
            }
            Error::BadCoordinate { line, .. } => write!(f, "line {line}: invalid coordinate"),
            Error::NonFiniteCoordinate { line } => {
                write!(f, "line {line}: coordinates must be finite")
            }
            Error::Io(_) => write!(f, "read/write error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BadCoordinate { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn parse_line(line: &str, line_number: usize) -> Result<Option<Point2D>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let coordinates: Vec<f64> = line
        .split(',')
        .map(|coordinate| {
            coordinate
                .trim()
                .parse::<f64>()
                .map_err(|source| Error::BadCoordinate {
                    line: line_number,
                    source,
                })
        })
        .collect::<Result<_>>()?;

    match coordinates[..] {
        [x, y] if x.is_finite() && y.is_finite() => Ok(Some(Point2D::new(x, y))),
        [_, _] => Err(Error::NonFiniteCoordinate { line: line_number }),
        _ => Err(Error::BadCoordinateCount {
            line: line_number,
            count: coordinates.len(),
        }),
    }
}

/// Wrapping `r` in a [`std::io::BufReader`] is recommended.
pub fn read<R>(r: R) -> Result<Vec<Point2D>>
where
    R: io::BufRead,
{
    let mut points = Vec::new();
    for (idx, line) in r.lines().enumerate() {
        if let Some(point) = parse_line(&line?, idx + 1)? {
            points.push(point);
        }
    }
    Ok(points)
}

/// Wrapping `w` in a [`std::io::BufWriter`] is recommended.
pub fn write<I, W>(mut w: W, points: I) -> io::Result<()>
where
    I: IntoIterator<Item = Point2D>,
    W: io::Write,
{
    for point in points {
        writeln!(w, "{}", point.iter().join(","))?;
    }
    w.flush()
}
