//! An implementation of Lloyd's k-means algorithm.
//!
//! Starting from `k` centroids copied from random points, the algorithm
//! alternates between assigning each point to its closest centroid and moving
//! each centroid to the mean of its cluster, until assignments stop changing
//! or an iteration cap is reached.

use super::Error;
use crate::PointND;
use rand::Rng;

mod assign;
mod convergence;
mod init;
mod update;

use convergence::ConvergenceMonitor;
use convergence::State;

/// How points are mapped to centroids at each iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Assignment {
    /// Each point goes to its closest centroid (standard Lloyd step).
    #[default]
    Nearest,

    /// Each point remembers the smallest distance to a centroid it has ever
    /// seen, and only moves when a centroid gets strictly closer than that.
    ///
    /// Early assignments become hard to undo: a point stays in its cluster
    /// even after the cluster's centroid has moved away, so results can be
    /// worse than with [`Assignment::Nearest`].
    Sticky,
}

/// Why the k-means loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Assignments did not change for more than
    /// [`stable_iter`][KMeans::stable_iter] consecutive iterations.
    Converged,

    /// The loop reached [`max_iter`][KMeans::max_iter] iterations.
    MaxIter,
}

/// Diagnostic data for a [`KMeans`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct Metadata<const D: usize> {
    /// Centroids the algorithm started from, one per cluster.
    pub initial_centroids: Vec<PointND<D>>,

    /// Final centroids, one per cluster.  Centroid `i` is the representative
    /// of the points mapped to part `i`.
    pub centroids: Vec<PointND<D>>,

    /// Number of assign/update iterations that ran.
    pub iterations: usize,

    pub stop_reason: StopReason,

    /// Number of times a cluster was found empty during a centroid update,
    /// summed over all iterations and clusters.
    pub empty_clusters: usize,
}

/// # K-means algorithm
///
/// Groups points into `cluster_count` clusters using Lloyd's algorithm.
///
/// Initial centroids are copied from distinct points chosen at random with
/// `rng`.  When there are more clusters than points, points are drawn with
/// replacement and some clusters start (and may remain) identical.
///
/// A cluster may become empty during the run, in which case its centroid stays
/// where it was.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), lloyd::Error> {
/// use lloyd::Partition as _;
/// use lloyd::Point2D;
/// use lloyd::rand::SeedableRng as _;
///
/// let points = [
///     Point2D::new(0., 0.),
///     Point2D::new(1., 0.),
///     Point2D::new(0., 1.),
///     Point2D::new(20., 20.),
///     Point2D::new(21., 20.),
///     Point2D::new(20., 21.),
/// ];
/// let mut partition = [0; 6];
///
/// let rng = lloyd::rand::rngs::StdRng::seed_from_u64(0);
/// let metadata = lloyd::KMeans {
///     max_iter: 100,
///     ..lloyd::KMeans::new(2, rng)
/// }
/// .partition(&mut partition, &points[..])?;
///
/// assert_eq!(partition[0], partition[1]);
/// assert_eq!(partition[0], partition[2]);
/// assert_eq!(partition[3], partition[4]);
/// assert_eq!(partition[3], partition[5]);
/// assert_ne!(partition[0], partition[3]);
/// assert!(metadata.iterations <= 100);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct KMeans<R> {
    pub cluster_count: usize,

    /// Hard cap on the number of iterations.
    pub max_iter: usize,

    /// The loop stops after `stable_iter + 1` consecutive iterations that did
    /// not move any point.
    pub stable_iter: usize,

    pub assignment: Assignment,

    /// Source of randomness for the initial centroids.
    pub rng: R,
}

impl<R> KMeans<R> {
    /// K-means with the default iteration limits and assignment mode.
    pub fn new(cluster_count: usize, rng: R) -> Self {
        Self {
            cluster_count,
            max_iter: 300,
            stable_iter: 50,
            assignment: Assignment::default(),
            rng,
        }
    }
}

fn k_means<R, const D: usize>(
    part_ids: &mut [usize],
    points: &[PointND<D>],
    settings: &mut KMeans<R>,
) -> Result<Metadata<D>, Error>
where
    R: Rng,
{
    if settings.cluster_count == 0 {
        return Err(Error::ZeroClusters);
    }
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    if part_ids.len() != points.len() {
        return Err(Error::InputLenMismatch {
            expected: points.len(),
            actual: part_ids.len(),
        });
    }
    if let Some(index) = points
        .iter()
        .position(|p| p.iter().any(|x| !x.is_finite()))
    {
        return Err(Error::NonFiniteCoordinate { index });
    }

    let _span = tracing::info_span!(
        "k-means",
        point_count = points.len(),
        cluster_count = settings.cluster_count,
        assignment = ?settings.assignment,
    )
    .entered();

    let initial_centroids =
        init::initial_centroids(&mut settings.rng, points, settings.cluster_count);
    tracing::debug!(?initial_centroids);

    let mut centroids = initial_centroids.clone();
    let mut best_distances = match settings.assignment {
        Assignment::Nearest => Vec::new(),
        Assignment::Sticky => vec![f64::INFINITY; points.len()],
    };
    let mut monitor = ConvergenceMonitor::new(settings.max_iter, settings.stable_iter);
    let mut empty_clusters = 0;

    let stop_reason = loop {
        let moved = match settings.assignment {
            Assignment::Nearest => assign::assign_nearest(points, &centroids, part_ids),
            Assignment::Sticky => {
                assign::assign_sticky(points, &centroids, part_ids, &mut best_distances)
            }
        };
        // The first pass places points, it does not move them.
        let changed = monitor.iteration() > 0 && moved > 0;

        empty_clusters += update::update_centroids(points, part_ids, &mut centroids);

        tracing::debug!(iteration = monitor.iteration(), moved, "iteration done");

        if let State::Stopped(reason) = monitor.observe(changed) {
            break reason;
        }
    };

    tracing::info!(
        iterations = monitor.iteration(),
        ?stop_reason,
        empty_clusters,
        "k-means done"
    );

    Ok(Metadata {
        initial_centroids,
        centroids,
        iterations: monitor.iteration(),
        stop_reason,
        empty_clusters,
    })
}

impl<'a, R, const D: usize> crate::Partition<&'a [PointND<D>]> for KMeans<R>
where
    R: Rng,
{
    type Metadata = Metadata<D>;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        points: &'a [PointND<D>],
    ) -> Result<Self::Metadata, Self::Error> {
        k_means(part_ids, points, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Partition as _;
    use crate::Point2D;
    use crate::Point3D;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng as _;

    fn k_means_2d(
        points: &[Point2D],
        cluster_count: usize,
        seed: u64,
    ) -> Result<(Vec<usize>, Metadata<2>), Error> {
        let mut partition = vec![0; points.len()];
        let metadata = KMeans::new(cluster_count, StdRng::seed_from_u64(seed))
            .partition(&mut partition, points)?;
        Ok((partition, metadata))
    }

    #[test]
    fn test_configuration_errors() {
        let points = [Point2D::new(0., 0.)];
        assert_eq!(k_means_2d(&points, 0, 0), Err(Error::ZeroClusters));
        assert_eq!(k_means_2d(&[], 3, 0), Err(Error::EmptyInput));
        assert_eq!(k_means_2d(&[], 0, 0), Err(Error::ZeroClusters));

        let mut partition = [0; 2];
        let err = KMeans::new(1, StdRng::seed_from_u64(0))
            .partition(&mut partition, &points[..])
            .unwrap_err();
        assert_eq!(
            err,
            Error::InputLenMismatch {
                expected: 1,
                actual: 2
            },
        );

        let points = [Point2D::new(0., 0.), Point2D::new(f64::NAN, 1.)];
        assert_eq!(
            k_means_2d(&points, 1, 0),
            Err(Error::NonFiniteCoordinate { index: 1 }),
        );
    }

    #[test]
    fn test_single_cluster() {
        let points = [
            Point2D::new(1., 1.),
            Point2D::new(3., 1.),
            Point2D::new(2., 4.),
        ];
        let (partition, metadata) = k_means_2d(&points, 1, 0).unwrap();

        assert_eq!(partition, vec![0; 3]);
        assert_abs_diff_eq!(metadata.centroids[0], Point2D::new(2., 2.), epsilon = 1e-9);
        assert_eq!(metadata.stop_reason, StopReason::Converged);
        assert_eq!(metadata.iterations, 51);
        assert_eq!(metadata.empty_clusters, 0);
    }

    #[test]
    fn test_reproducible() {
        let points: Vec<_> = (0..50)
            .map(|i| Point2D::new((i * 7 % 13) as f64, (i * 5 % 11) as f64))
            .collect();
        let a = k_means_2d(&points, 4, 1234).unwrap();
        let b = k_means_2d(&points, 4, 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_cluster_is_absorbed() {
        // Two identical points and two clusters: both points go to the first
        // centroid, the second cluster stays empty.
        let points = [Point2D::new(1., 1.), Point2D::new(1., 1.)];
        let (partition, metadata) = k_means_2d(&points, 2, 9).unwrap();

        assert_eq!(partition, vec![0, 0]);
        assert_eq!(metadata.centroids, vec![Point2D::new(1., 1.); 2]);
        assert_eq!(metadata.empty_clusters, metadata.iterations);
    }

    #[test]
    fn test_max_iter() {
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(0., 1.),
            Point2D::new(10., 10.),
        ];
        let mut partition = [0; 3];
        let metadata = KMeans {
            max_iter: 5,
            ..KMeans::new(2, StdRng::seed_from_u64(0))
        }
        .partition(&mut partition, &points[..])
        .unwrap();

        assert_eq!(metadata.stop_reason, StopReason::MaxIter);
        assert_eq!(metadata.iterations, 5);
    }

    #[test]
    fn test_sticky_two_groups() {
        // Seeds drawn from both groups: sticky and nearest agree.
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(10., 10.),
            Point2D::new(0., 1.),
            Point2D::new(10., 11.),
        ];
        for seed in 0..20 {
            let mut partition = [0; 4];
            let metadata = KMeans {
                assignment: Assignment::Sticky,
                ..KMeans::new(2, StdRng::seed_from_u64(seed))
            }
            .partition(&mut partition, &points[..])
            .unwrap();

            assert!(partition.iter().all(|id| *id < 2));
            assert_eq!(metadata.centroids.len(), 2);
            let separated = metadata.initial_centroids[0].x != metadata.initial_centroids[1].x;
            if separated {
                assert_eq!(partition[0], partition[2]);
                assert_eq!(partition[1], partition[3]);
                assert_ne!(partition[0], partition[1]);
            }
        }
    }

    #[test]
    fn test_3d() {
        let points = [
            Point3D::new(0., 0., 0.),
            Point3D::new(0., 0., 1.),
            Point3D::new(5., 5., 5.),
            Point3D::new(5., 5., 6.),
        ];
        let mut partition = [0; 4];
        let metadata = KMeans::new(2, StdRng::seed_from_u64(3))
            .partition(&mut partition, &points[..])
            .unwrap();

        assert_eq!(partition[0], partition[1]);
        assert_eq!(partition[2], partition[3]);
        assert_ne!(partition[0], partition[2]);
        let low = partition[0];
        assert_abs_diff_eq!(
            metadata.centroids[low],
            Point3D::new(0., 0., 0.5),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_sticky_assignment_can_get_stuck() {
        // Seeded from (10, 10) and (10, 11): (10, 10) records a distance of zero
        // during the first pass, then never leaves the first cluster even though
        // its centroid drifts towards the origin.
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(0., 1.),
            Point2D::new(10., 10.),
            Point2D::new(10., 11.),
        ];

        let seed = (0..1000)
            .find(|seed| {
                let mut rng = StdRng::seed_from_u64(*seed);
                let seeds = init::seed_indices(&mut rng, points.len(), 2);
                seeds == [2, 3]
            })
            .unwrap();

        let mut partition = [0; 4];
        let metadata = KMeans {
            assignment: Assignment::Sticky,
            ..KMeans::new(2, StdRng::seed_from_u64(seed))
        }
        .partition(&mut partition, &points[..])
        .unwrap();

        assert_eq!(partition, [0, 0, 0, 1]);
        assert_abs_diff_eq!(
            metadata.centroids[0],
            Point2D::new(10. / 3., 11. / 3.),
            epsilon = 1e-9
        );

        let mut partition = [0; 4];
        KMeans::new(2, StdRng::seed_from_u64(seed))
            .partition(&mut partition, &points[..])
            .unwrap();
        assert_eq!(partition, [0, 0, 1, 1]);
    }

    proptest!(
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// After a run, every point is in a cluster of `[0, k)` and there are
        /// exactly `k` centroids.
        #[test]
        fn every_point_assigned(
            points in prop::collection::vec((-1e3..1e3_f64, -1e3..1e3_f64), 1..100),
            cluster_count in 1..12_usize,
            sticky in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let points: Vec<_> = points.into_iter().map(|(x, y)| Point2D::new(x, y)).collect();
            let mut partition = vec![usize::MAX; points.len()];
            let assignment = if sticky { Assignment::Sticky } else { Assignment::Nearest };

            let metadata = KMeans {
                assignment,
                ..KMeans::new(cluster_count, StdRng::seed_from_u64(seed))
            }
            .partition(&mut partition, &points[..])
            .unwrap();

            prop_assert!(partition.iter().all(|id| *id < cluster_count));
            prop_assert_eq!(metadata.centroids.len(), cluster_count);
            prop_assert_eq!(metadata.initial_centroids.len(), cluster_count);
            prop_assert!(1 <= metadata.iterations && metadata.iterations <= 300);
        }
    );
}
