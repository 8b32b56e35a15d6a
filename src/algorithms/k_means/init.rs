//! Selection of the initial centroids.

use crate::PointND;
use itertools::Itertools;
use rand::seq::index;
use rand::Rng;

/// Pick the indices of the `count` points the initial centroids are copied
/// from.
///
/// When there are enough points (`count <= point_count`), indices are sampled
/// without replacement, so no point seeds two centroids.  Otherwise, each
/// index is drawn independently and some centroids start at the same place.
///
/// `point_count` must not be zero.
pub(super) fn seed_indices<R>(rng: &mut R, point_count: usize, count: usize) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    debug_assert!(0 < point_count);

    if count <= point_count {
        return index::sample(rng, point_count, count).into_vec();
    }

    let seeds: Vec<usize> = (0..count)
        .map(|_| rng.gen_range(0..point_count))
        .collect();
    tracing::warn!(
        duplicates = seeds.iter().duplicates().count(),
        "more clusters than points, some initial centroids are shared"
    );
    seeds
}

/// Initial centroids, copied from randomly chosen points.
pub(super) fn initial_centroids<R, const D: usize>(
    rng: &mut R,
    points: &[PointND<D>],
    count: usize,
) -> Vec<PointND<D>>
where
    R: Rng + ?Sized,
{
    seed_indices(rng, points.len(), count)
        .into_iter()
        .map(|idx| points[idx])
        .collect()
}
