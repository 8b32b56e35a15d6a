use anyhow::Context as _;
use anyhow::Result;
use lloyd::Point2D;
use std::env;
use std::fs;
use std::io;
use std::process;

pub mod points;
pub mod svg;

/// Parse command-line arguments.
///
/// Adds a `-h, --help` flag to `options`, prints usage and exits if it is
/// present, and fails if there are more than `max_free_args` free arguments.
pub fn parse_args(
    mut options: getopts::Options,
    usage: &str,
    max_free_args: usize,
) -> Result<getopts::Matches> {
    options.optflag("h", "help", "print this help menu");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(usage));
        process::exit(0);
    }
    if matches.free.len() > max_free_args {
        anyhow::bail!("too many arguments\n\n{}", options.usage(usage));
    }

    Ok(matches)
}

/// Open the given file for reading, or stdin if `filename` is `None` or "-".
pub fn reader(filename: Option<&String>) -> Result<Box<dyn io::BufRead>> {
    Ok(match filename.map(String::as_str) {
        None | Some("-") => Box::new(io::stdin().lock()),
        Some(filename) => {
            let file = fs::File::open(filename)
                .with_context(|| format!("failed to open {filename:?}"))?;
            Box::new(io::BufReader::new(file))
        }
    })
}

/// Open the given file for writing, or stdout if `filename` is `None` or "-".
pub fn writer(filename: Option<&String>) -> Result<Box<dyn io::Write>> {
    Ok(match filename.map(String::as_str) {
        None | Some("-") => Box::new(io::BufWriter::new(io::stdout().lock())),
        Some(filename) => {
            let file = fs::File::create(filename)
                .with_context(|| format!("failed to create {filename:?}"))?;
            Box::new(io::BufWriter::new(file))
        }
    })
}

pub fn read_points(filename: Option<&String>) -> Result<Vec<Point2D>> {
    let r = reader(filename)?;
    let points = points::read(r).context("failed to read point file")?;
    Ok(points)
}

/// Write the outcome of a clustering run.
///
/// One `centroid i: x,y` line per cluster, followed by one
/// `cluster i: x,y x,y ...` line per cluster listing its points.
pub fn write_clustering<W>(
    mut w: W,
    points: &[Point2D],
    part_ids: &[usize],
    centroids: &[Point2D],
) -> io::Result<()>
where
    W: io::Write,
{
    for (i, centroid) in centroids.iter().enumerate() {
        writeln!(w, "centroid {i}: {},{}", centroid.x, centroid.y)?;
    }
    for (i, members) in lloyd::parts(part_ids, centroids.len()).into_iter().enumerate() {
        write!(w, "cluster {i}:")?;
        for member in members {
            let p = points[member];
            write!(w, " {},{}", p.x, p.y)?;
        }
        writeln!(w)?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_clustering() {
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(10., 10.),
            Point2D::new(0., 1.),
        ];
        let part_ids = [1, 0, 1];
        let centroids = [Point2D::new(10., 10.), Point2D::new(0., 0.5), Point2D::new(3., 3.)];
        let mut out = Vec::new();

        write_clustering(&mut out, &points, &part_ids, &centroids).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "centroid 0: 10,10\n\
             centroid 1: 0,0.5\n\
             centroid 2: 3,3\n\
             cluster 0: 10,10\n\
             cluster 1: 0,0 0,1\n\
             cluster 2:\n",
        );
    }
}
