use ednafuse_labels::LabelError;
use ednafuse_reliability::ReliabilityError;
use thiserror::Error;

/// A result type for mask reconciliation
pub type Result<T> = std::result::Result<T, MaskError>;

/// An error when building evidence tables or reconciling classifications
#[derive(Error, Debug)]
pub enum MaskError {
    /// When a weight vector or matrix disagrees with the label universe size
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// When probability values cannot be ordered (empty row or NaN)
    #[error("Unordered probability values: {0}")]
    UnorderedValues(String),
    /// When an evidence value cannot be interpreted
    #[error("Invalid evidence value: {0}")]
    InvalidValue(String),
    /// When a label error occurs
    #[error(transparent)]
    LabelError(#[from] LabelError),
    /// When a reliability error occurs
    #[error(transparent)]
    ReliabilityError(#[from] ReliabilityError),
    /// When reading or writing an evidence file fails
    #[error("Evidence file IO error")]
    IoError(#[from] std::io::Error),
    /// When CSV encoding or decoding fails
    #[error("Evidence CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
