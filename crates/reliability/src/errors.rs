use ednafuse_labels::LabelError;
use thiserror::Error;

/// A result type for reliability estimation
pub type Result<T> = std::result::Result<T, ReliabilityError>;

/// An error when estimating or loading reliability records
#[derive(Error, Debug)]
pub enum ReliabilityError {
    /// When reference and auxiliary matrices disagree on shape
    #[error("Shape mismatch: reference is {0:?}, auxiliary is {1:?}")]
    ShapeMismatch((usize, usize), (usize, usize)),
    /// When a table does not line up with the label universe
    #[error("Table holds {0} records for a universe of {1} labels")]
    LengthMismatch(usize, usize),
    /// When a label error occurs
    #[error(transparent)]
    LabelError(#[from] LabelError),
    /// When a reliability file holds no record for a universe label
    #[cfg(feature = "persistent")]
    #[error("No reliability record for label: {0}")]
    MissingLabel(String),
    /// When reading or writing a reliability file fails
    #[cfg(feature = "persistent")]
    #[error("Reliability file IO error")]
    IoError(#[from] std::io::Error),
    /// When JSON encoding or decoding fails
    #[cfg(feature = "persistent")]
    #[error("Reliability JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
