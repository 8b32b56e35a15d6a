//! Recomputation of the centroids.

use crate::geometry;
use crate::PointND;
use rayon::prelude::*;

/// Move each centroid to the mean of the points of its cluster.
///
/// A centroid whose cluster is empty keeps its coordinates.  Returns the number
/// of such empty clusters.
///
/// Centroids stay finite as long as points are, even near `f64::MAX`.
pub(super) fn update_centroids<const D: usize>(
    points: &[PointND<D>],
    part_ids: &[usize],
    centroids: &mut [PointND<D>],
) -> usize {
    let clusters = crate::parts(part_ids, centroids.len());

    centroids
        .par_iter_mut()
        .zip(clusters.par_iter())
        .enumerate()
        .map(|(cluster, (centroid, members))| {
            match geometry::center(members.iter().map(|idx| &points[*idx])) {
                Some(center) => {
                    *centroid = center;
                    0
                }
                None => {
                    tracing::warn!(cluster, "empty cluster, centroid left in place");
                    1
                }
            }
        })
        .sum()
}
