use thiserror::Error;

/// A result type for label space operations
pub type Result<T> = std::result::Result<T, LabelError>;

/// An error when building or using a label universe
#[derive(Error, Debug)]
pub enum LabelError {
    /// When a label is not part of the built universe
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
    /// When a sample carries an empty label string
    #[error("Empty label string in sample: {0}")]
    EmptyLabel(String),
    /// When paired collections share no sample key
    #[error("No common sample key between reference and auxiliary collections")]
    EmptyIntersection,
}
