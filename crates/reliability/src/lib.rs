//! This library scores the reliability of an auxiliary assemblage signal
//! (e.g. eDNA metabarcoding detections) against a reference labeling
//! (e.g. image-derived ground truth), label by label.
//!
//! For every column of two row-aligned binary matrices it computes the 2×2
//! contingency table and derives precision, recall and specificity. A metric
//! with a zero denominator is not an error: it is substituted with a
//! caller-selected [`FallbackPolicy`] value and counted, so silent
//! degradation stays observable. Two presets cover the two consumers:
//!
//! * [`FallbackPolicy::reporting`] substitutes `NaN` so the macro averages
//!   skip undefined labels;
//! * [`FallbackPolicy::masking`] substitutes neutral values so every weight
//!   derived downstream (`precision`, `1 − recall`) is a multiplicative
//!   identity.
//!
//! The two conventions are intentionally distinct and must not be unified.
//!
//! # Features
//!
//! ## serializable
//!
//! The `serializable` feature enables serde on [`Reliability`] records.
//!
//! ## persistent
//!
//! The `persistent` feature enables `save()`/`load()` of a
//! [`ReliabilityTable`] to/from a JSON file keyed by label string, for reuse
//! by later evaluation runs.
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
mod estimator;
mod types;

pub use errors::*;
pub use estimator::*;
pub use types::*;
