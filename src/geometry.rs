//! A few useful geometric types

use nalgebra::SVector;
use rayon::prelude::*;

pub type PointND<const D: usize> = SVector<f64, D>;
pub type Point2D = PointND<2>;
pub type Point3D = PointND<3>;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<const D: usize> {
    pub p_min: PointND<D>,
    pub p_max: PointND<D>,
}

impl<const D: usize> BoundingBox<D> {
    /// The smallest box that contains all the given points.
    ///
    /// Returns `None` if there are no points.
    pub fn from_points<P>(points: P) -> Option<Self>
    where
        P: ParallelIterator<Item = PointND<D>>,
    {
        points
            .fold_with(None, |bb: Option<(PointND<D>, PointND<D>)>, p| match bb {
                None => Some((p, p)),
                Some((p_min, p_max)) => Some((p_min.inf(&p), p_max.sup(&p))),
            })
            .reduce_with(|left, right| match (left, right) {
                (Some((min_l, max_l)), Some((min_r, max_r))) => {
                    Some((min_l.inf(&min_r), max_l.sup(&max_r)))
                }
                (Some(bb), None) | (None, Some(bb)) => Some(bb),
                (None, None) => None,
            })
            .flatten()
            .map(|(p_min, p_max)| Self { p_min, p_max })
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn pad(self, margin: f64) -> Self {
        Self {
            p_min: self.p_min.add_scalar(-margin),
            p_max: self.p_max.add_scalar(margin),
        }
    }

    /// Length of the box along the given axis.
    pub fn extent(&self, axis: usize) -> f64 {
        self.p_max[axis] - self.p_min[axis]
    }
}

/// Arithmetic mean of a set of points, `None` if the set is empty.
///
/// Points are divided by their count before being summed, so the mean of
/// finite points is finite.
pub(crate) fn center<'a, const D: usize, I>(points: I) -> Option<PointND<D>>
where
    I: IntoIterator<Item = &'a PointND<D>>,
    I::IntoIter: ExactSizeIterator,
{
    let points = points.into_iter();
    let count = points.len();
    if count == 0 {
        return None;
    }
    let count = count as f64;
    Some(points.fold(PointND::<D>::zeros(), |sum, p| sum + p / count))
}
