use anyhow::Context as _;
use anyhow::Result;
use itertools::Itertools as _;
use lloyd::Partition as _;
use rand::RngCore as _;
use rand::SeedableRng as _;
use std::fs;
use std::io;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

const USAGE: &str = "Usage: k-means [options] CLUSTER_COUNT [in-points [out-result]] <in.txt >out.txt";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt("n", "max-iter", "maximum number of iterations (default: 300)", "N");
    options.optopt("o", "svg", "render the clusters to an SVG file", "FILE");
    options.optopt("s", "seed", "seed of the random number generator", "N");
    options.optopt(
        "",
        "stable",
        "stop after N+1 iterations without change (default: 50)",
        "N",
    );
    options.optflag("", "sticky", "only move points that get closer than ever");
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print diagnostic data");

    let matches = lloyd_tools::parse_args(options, USAGE, 3)?;

    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_thread_ids(true)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    let _chrome_trace_guard = match matches.opt_str("t") {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    let cluster_count: usize = matches
        .free
        .first()
        .context("missing required argument CLUSTER_COUNT")?
        .parse()
        .context("invalid cluster count")?;
    let seed: u64 = match matches.opt_get("s").context("invalid value for option 'seed'")? {
        Some(seed) => seed,
        None => rand::rngs::OsRng.next_u64(),
    };

    let mut k_means = lloyd::KMeans::new(cluster_count, rand_pcg::Pcg64::seed_from_u64(seed));
    if let Some(max_iter) = matches
        .opt_get("n")
        .context("invalid value for option 'max-iter'")?
    {
        k_means.max_iter = max_iter;
    }
    if let Some(stable_iter) = matches
        .opt_get("stable")
        .context("invalid value for option 'stable'")?
    {
        k_means.stable_iter = stable_iter;
    }
    if matches.opt_present("sticky") {
        k_means.assignment = lloyd::Assignment::Sticky;
    }

    let points = lloyd_tools::read_points(matches.free.get(1))?;
    let mut partition = vec![0; points.len()];
    let metadata = k_means
        .partition(&mut partition, &points[..])
        .context("failed to cluster points")?;

    if matches.opt_present("v") {
        eprintln!("seed: {seed}");
        eprintln!(
            "initial centroids: {}",
            metadata
                .initial_centroids
                .iter()
                .map(|c| format!("{},{}", c.x, c.y))
                .join(" "),
        );
        eprintln!(
            "iterations: {} ({:?})",
            metadata.iterations, metadata.stop_reason
        );
        if metadata.empty_clusters != 0 {
            eprintln!("empty clusters: {}", metadata.empty_clusters);
        }
    }

    let output = lloyd_tools::writer(matches.free.get(2))?;
    lloyd_tools::write_clustering(output, &points, &partition, &metadata.centroids)
        .context("failed to print clusters")?;

    if let Some(filename) = matches.opt_str("o") {
        let svg = fs::File::create(&filename)
            .with_context(|| format!("failed to create {filename:?}"))?;
        lloyd_tools::svg::write(
            io::BufWriter::new(svg),
            &points,
            &partition,
            &metadata.centroids,
        )
        .context("failed to render clusters")?;
    }

    Ok(())
}
