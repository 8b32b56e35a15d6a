//! SVG rendering of a clustering.

use lloyd::BoundingBox;
use lloyd::Point2D;
use rayon::iter::IntoParallelRefIterator as _;
use rayon::iter::ParallelIterator as _;
use std::f64::consts::PI;
use std::io;

/// Cluster colors, cycled through when there are more clusters than colors.
pub const PALETTE: [&str; 7] = [
    "#0000ff", // blue
    "#008000", // green
    "#ff0000", // red
    "#00bfbf", // cyan
    "#bf00bf", // magenta
    "#bfbf00", // yellow
    "#000000", // black
];

/// Space left around the points, in point coordinates.
const MARGIN: f64 = 1.0;

const GRID_COLOR: &str = "#d3d3d3";

pub fn color(cluster: usize) -> &'static str {
    PALETTE[cluster % PALETTE.len()]
}

/// Spacing of grid lines: 1, 2 or 5 times a power of ten, so that an
/// `extent`-long side is crossed by a handful of lines.
fn grid_step(extent: f64) -> f64 {
    let raw = extent / 5.0;
    if !(raw.is_finite() && 0.0 < raw) {
        return extent;
    }
    let magnitude = f64::powf(10.0, raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Multiples of `step` within `[min, max]`.
fn grid_lines(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let (first, last) = if step.is_finite() && 0.0 < step {
        ((min / step).ceil() as i64, (max / step).floor() as i64)
    } else {
        (1, 0)
    };
    (first..=last).map(move |i| i as f64 * step)
}

/// Five-pointed star centered on `(cx, cy)`, as an SVG path.
fn star(cx: f64, cy: f64, radius: f64) -> String {
    let mut d = String::new();
    for i in 0..10 {
        let r = if i % 2 == 0 { radius } else { radius * 0.4 };
        let angle = PI / 5.0 * i as f64 - PI / 2.0;
        let command = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!(
            "{command}{},{} ",
            cx + r * angle.cos(),
            cy + r * angle.sin(),
        ));
    }
    d.push('Z');
    d
}

/// Draw points colored by cluster, and centroids as stars.
///
/// The view box is the bounding box of the points padded by one unit on each
/// side, with a light grid in the background.  The y axis points upwards.
pub fn write<W>(
    mut w: W,
    points: &[Point2D],
    part_ids: &[usize],
    centroids: &[Point2D],
) -> io::Result<()>
where
    W: io::Write,
{
    let bb = match BoundingBox::<2>::from_points(points.par_iter().cloned()) {
        Some(bb) => bb.pad(MARGIN),
        None => {
            writeln!(w, r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#)?;
            return w.flush();
        }
    };
    let xmin = bb.p_min.x;
    let xmax = bb.p_max.x;
    let ymin = bb.p_min.y;
    let ymax = bb.p_max.y;
    let width = bb.extent(0);
    let height = bb.extent(1);
    let flip = |y: f64| ymax - y + ymin;
    let radius = f64::max(width, height) / 200.0;

    writeln!(
        w,
        r#"<svg viewBox="{xmin} {ymin} {width} {height}" xmlns="http://www.w3.org/2000/svg">"#,
    )?;
    writeln!(w, "<title>K-Means Clusters</title>")?;
    writeln!(
        w,
        r#"<rect x="{xmin}" y="{ymin}" width="{width}" height="{height}" fill="white"/>"#,
    )?;

    let stroke_width = radius / 2.0;
    for x in grid_lines(xmin, xmax, grid_step(width)) {
        writeln!(
            w,
            r#"<line x1="{x}" y1="{ymin}" x2="{x}" y2="{ymax}" stroke="{GRID_COLOR}" stroke-width="{stroke_width}"/>"#,
        )?;
    }
    for y in grid_lines(ymin, ymax, grid_step(height)) {
        let y = flip(y);
        writeln!(
            w,
            r#"<line x1="{xmin}" y1="{y}" x2="{xmax}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="{stroke_width}"/>"#,
        )?;
    }

    for (point, part_id) in points.iter().zip(part_ids) {
        writeln!(
            w,
            r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
            point.x,
            flip(point.y),
            color(*part_id),
        )?;
    }
    for (cluster, centroid) in centroids.iter().enumerate() {
        writeln!(
            w,
            r#"<path d="{}" fill="{}"/>"#,
            star(centroid.x, flip(centroid.y), 3.0 * radius),
            color(cluster),
        )?;
    }

    writeln!(w, "</svg>")?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles() {
        assert_eq!(color(0), PALETTE[0]);
        assert_eq!(color(6), PALETTE[6]);
        assert_eq!(color(7), PALETTE[0]);
        assert_eq!(color(15), PALETTE[1]);
    }

    #[test]
    fn test_write() {
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(0., 1.),
            Point2D::new(10., 10.),
            Point2D::new(10., 11.),
        ];
        let part_ids = [0, 0, 1, 1];
        let centroids = [Point2D::new(0., 0.5), Point2D::new(10., 10.5)];
        let mut out = Vec::new();

        write(&mut out, &points, &part_ids, &centroids).unwrap();

        let svg = String::from_utf8(out).unwrap();
        assert!(svg.starts_with(r#"<svg viewBox="-1 -1 12 13""#));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("<path").count(), 2);
        // Grid lines at 0, 5 and 10 on both axes.
        assert_eq!(svg.matches("<line").count(), 6);
        assert!(svg.contains(r#"<line x1="5" y1="-1" x2="5" y2="12""#));
        assert_eq!(svg.matches(PALETTE[0]).count(), 3);
        assert_eq!(svg.matches(PALETTE[1]).count(), 3);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_grid_step() {
        assert_eq!(grid_step(12.), 5.);
        assert_eq!(grid_step(10.), 2.);
        assert_eq!(grid_step(100.), 20.);
        assert_eq!(grid_step(40.), 10.);
        assert_eq!(grid_lines(-1., 11., 5.).collect::<Vec<_>>(), [0., 5., 10.]);
        assert_eq!(grid_lines(0., 1., f64::INFINITY).count(), 0);
    }

    #[test]
    fn test_write_no_points() {
        let mut out = Vec::new();
        write(&mut out, &[], &[], &[]).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("<circle"));
    }
}
