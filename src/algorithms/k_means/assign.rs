//! Assignment of points to their closest centroid.

use crate::PointND;
use rayon::prelude::*;

/// Euclidean distance between two points.
///
/// The difference is scaled down by its largest component before squaring, so
/// that finite points only yield an infinite distance when the difference
/// itself overflows.
fn distance<const D: usize>(a: &PointND<D>, b: &PointND<D>) -> f64 {
    let diff = a - b;
    let scale = diff.amax();
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    scale * (diff / scale).norm()
}

/// Index of the closest centroid and the distance to it.
///
/// Centroids are scanned in order and only a strictly smaller distance
/// replaces the current best, so the lowest index wins ties.
fn closest<const D: usize>(point: &PointND<D>, centroids: &[PointND<D>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let distance = distance(centroid, point);
        if distance < best.1 {
            best = (idx, distance);
        }
    }
    best
}

/// Standard Lloyd assignment step: map each point to its closest centroid.
///
/// Returns the number of points whose cluster differs from the one previously
/// stored in `part_ids`.
pub(super) fn assign_nearest<const D: usize>(
    points: &[PointND<D>],
    centroids: &[PointND<D>],
    part_ids: &mut [usize],
) -> usize {
    points
        .par_iter()
        .zip(part_ids.par_iter_mut())
        .map(|(point, part_id)| {
            let (closest, _) = closest(point, centroids);
            let moved = *part_id != closest;
            *part_id = closest;
            usize::from(moved)
        })
        .sum()
}

/// Sticky assignment step.
///
/// `best_distances` holds, for each point, the smallest distance to a centroid
/// observed in any previous call.  A point is only reassigned when a centroid
/// gets strictly closer than that record, even if the centroid it belongs to
/// has since moved away.
///
/// Points that never recorded a finite distance go to their closest centroid,
/// so the IDs previously stored in `part_ids` are always overwritten on the
/// first call.
///
/// Returns the number of points whose cluster changed.
pub(super) fn assign_sticky<const D: usize>(
    points: &[PointND<D>],
    centroids: &[PointND<D>],
    part_ids: &mut [usize],
    best_distances: &mut [f64],
) -> usize {
    debug_assert_eq!(points.len(), best_distances.len());

    points
        .par_iter()
        .zip(part_ids.par_iter_mut())
        .zip(best_distances.par_iter_mut())
        .map(|((point, part_id), best_distance)| {
            let mut candidate = None;
            for (idx, centroid) in centroids.iter().enumerate() {
                let distance = distance(centroid, point);
                if distance < *best_distance {
                    *best_distance = distance;
                    candidate = Some(idx);
                }
            }
            if candidate.is_none() && *best_distance == f64::INFINITY {
                candidate = Some(closest(point, centroids).0);
            }
            match candidate {
                Some(idx) if idx != *part_id => {
                    *part_id = idx;
                    1
                }
                _ => 0,
            }
        })
        .sum()
}
