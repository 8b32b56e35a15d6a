//! A point clustering library built around Lloyd's k-means algorithm.
//!
//! # Crate Layout
//!
//! Lloyd exposes a [`Partition`] trait, which is in turn implemented by
//! algorithms.  See its documentation for more details.  The trait is generic
//! around its input, which means algorithms can cluster different type of
//! collections (e.g. 2D and 3D point sets).
//!
//! # Available algorithms
//!
//! - [K-means][KMeans], with either the standard nearest-centroid assignment
//!   or the [sticky][Assignment::Sticky] variant.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> Result<(), lloyd::Error> {
//! use lloyd::Partition as _;
//! use lloyd::Point2D;
//! use lloyd::rand::SeedableRng as _;
//!
//! let points = [
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(0.0, 1.0),
//!     Point2D::new(10.0, 10.0),
//!     Point2D::new(10.0, 11.0),
//! ];
//! let mut partition = [0; 4];
//!
//! let rng = lloyd::rand::rngs::StdRng::seed_from_u64(5);
//! let metadata = lloyd::KMeans::new(2, rng).partition(&mut partition, &points[..])?;
//!
//! assert_eq!(partition[0], partition[1]);
//! assert_eq!(partition[2], partition[3]);
//! assert_eq!(metadata.centroids.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod algorithms;
mod geometry;


pub use crate::algorithms::*;
pub use crate::geometry::BoundingBox;
pub use crate::geometry::{Point2D, Point3D, PointND};

pub use nalgebra;
pub use rand;
pub use rayon;

/// The `Partition` trait allows for partitioning data.
///
/// Clustering algorithms implement this trait.
///
/// The generic argument `M` defines the input of the algorithms (e.g. a 2D set
/// of points).
///
/// The input partition must be of the correct size and its contents may or may
/// not be used by the algorithms.
pub trait Partition<M> {
    /// Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    /// Error details, should the algorithm fail to run.
    type Error;

    /// Partition the given data and output the part ID of each element in
    /// `part_ids`.
    ///
    /// Part IDs must be contiguous and start from zero, meaning the number of
    /// parts is one plus the maximum of `part_ids`.  If a lower ID does not
    /// appear in the array, the part is assumed to be empty.
    fn partition(&mut self, part_ids: &mut [usize], data: M)
        -> Result<Self::Metadata, Self::Error>;
}

/// Group element indices by part.
///
/// Returns exactly `part_count` lists; the `i`-th one holds, in increasing
/// order, the indices of the elements mapped to part `i`.  Parts that no
/// element maps to are empty.
///
/// # Panics
///
/// Panics if an ID in `part_ids` is not lower than `part_count`.
///
/// # Example
///
/// ```rust
/// let parts = lloyd::parts(&[1, 0, 1, 1], 3);
/// assert_eq!(parts, vec![vec![1], vec![0, 2, 3], vec![]]);
/// ```
pub fn parts(part_ids: &[usize], part_count: usize) -> Vec<Vec<usize>> {
    let mut parts = vec![Vec::new(); part_count];
    for (idx, part_id) in part_ids.iter().enumerate() {
        parts[*part_id].push(idx);
    }
    parts
}
