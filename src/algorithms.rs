use std::fmt;

mod k_means;

pub use k_means::Assignment;
pub use k_means::KMeans;
pub use k_means::Metadata as KMeansMetadata;
pub use k_means::StopReason;

/// Common errors thrown by algorithms.
///
/// All of them are raised before any work is done on the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The algorithm has been asked for zero clusters.
    ZeroClusters,

    /// There is no point to cluster.
    EmptyInput,

    /// Input sets don't have matching lengths.
    InputLenMismatch { expected: usize, actual: usize },

    /// A point has a NaN or infinite coordinate.
    NonFiniteCoordinate { index: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroClusters => write!(f, "cluster count must be at least one"),
            Error::EmptyInput => write!(f, "input contains no points"),
            Error::InputLenMismatch { expected, actual } => write!(
                f,
                "input sets don't have the same length (expected {expected} items, got {actual})",
            ),
            Error::NonFiniteCoordinate { index } => {
                write!(f, "point #{index} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for Error {}
