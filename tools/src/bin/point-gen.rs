use anyhow::Context as _;
use anyhow::Result;
use lloyd::Point2D;
use rand::Rng;
use rand::RngCore as _;
use rand::SeedableRng as _;

const USAGE: &str = "Usage: point-gen [options] [out-points] >out.txt";

fn parse_centers(definition: &str) -> Result<Vec<Point2D>> {
    definition
        .split(';')
        .map(|center| {
            let mut coords = center.split(',').map(|coord| {
                let coord = coord.trim();
                let f = coord
                    .parse::<f64>()
                    .with_context(|| format!("arg {:?} is not a valid float", coord))?;
                if !f.is_finite() {
                    anyhow::bail!("arg {:?} is not finite", coord);
                }
                Ok(f)
            });
            let x = coords.next().context("empty center")??;
            let y = coords.next().context("missing y coordinate")??;
            if coords.next().is_some() {
                anyhow::bail!("expected 2 coordinates in {:?}", center);
            }
            Ok(Point2D::new(x, y))
        })
        .collect()
}

/// Uniformly sample `count` points from the disk of the given center and radius.
fn disk_uniform(rng: &mut impl Rng, count: usize, center: Point2D, radius: f64) -> Vec<Point2D> {
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let p = Point2D::new(
            rng.gen_range(center.x - radius..=center.x + radius),
            rng.gen_range(center.y - radius..=center.y + radius),
        );
        if (center - p).norm() <= radius {
            points.push(p);
        }
    }
    points
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt(
        "c",
        "centers",
        "semicolon-separated list of cluster centers (default: 0,0)",
        "X,Y;...",
    );
    options.optopt("n", "count", "number of points per center (default: 100)", "N");
    options.optopt("r", "radius", "radius of each cluster (default: 1)", "R");
    options.optopt("s", "seed", "seed of the random number generator", "N");

    let matches = lloyd_tools::parse_args(options, USAGE, 1)?;

    let centers = match matches.opt_str("c") {
        Some(definition) => parse_centers(&definition).context("invalid value for option 'centers'")?,
        None => vec![Point2D::zeros()],
    };
    let count: usize = matches
        .opt_get_default("n", 100)
        .context("invalid value for option 'count'")?;
    let radius: f64 = matches
        .opt_get_default("r", 1.0)
        .context("invalid value for option 'radius'")?;
    if !(radius.is_finite() && 0.0 < radius) {
        anyhow::bail!("radius must be a positive number");
    }
    let seed: u64 = match matches.opt_get("s").context("invalid value for option 'seed'")? {
        Some(seed) => seed,
        None => rand::rngs::OsRng.next_u64(),
    };

    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    let points = centers
        .into_iter()
        .flat_map(|center| disk_uniform(&mut rng, count, center, radius));

    let output = lloyd_tools::writer(matches.free.first())?;
    lloyd_tools::points::write(output, points).context("failed to write points")?;

    Ok(())
}
