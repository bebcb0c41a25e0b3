//! This library reconciles the class probabilities of an image classifier
//! with independent assemblage evidence (e.g. eDNA metabarcoding
//! detections), grouped by sampling event.
//!
//! Every classified image belongs to a sampling event; every event maps to
//! a presence/absence vector over the label universe. The engine multiplies
//! each event's probability rows elementwise by a per-event weight vector
//! and recomputes the final classifications. Weights come in two modes:
//!
//! * `Presence`: the binarized evidence itself, a hard 0/1 filter;
//! * `Reliability`: `precision(k)` where the evidence indicates label `k`
//!   present, `1 − recall(k)` where it does not, so the filter is softened
//!   by how trustworthy the evidence historically is per label
//!   (see [ednafuse_reliability]).
//!
//! Events present on only one side pass through untouched and are counted,
//! so silent degradation stays observable without aborting a run.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ndarray::array;
//! use ednafuse_mask::{event_rows, event_weights, EvidenceTable, Reconciler, WeightMode};
//!
//! // two images of the same trapping occasion, three classes
//! let probs = array![[0.5, 0.3, 0.2], [0.1, 0.6, 0.3]];
//! let rows = event_rows(&["ev_2019_04".to_string(), "ev_2019_04".to_string()]);
//!
//! // assemblage evidence: only the second class was detected
//! let evidence = EvidenceTable::from_counts(
//!     vec!["ev_2019_04".to_string()],
//!     array![[0., 7., 0.]],
//! )
//! .unwrap();
//! let weights = event_weights(&evidence, WeightMode::Presence).unwrap();
//!
//! let result = Reconciler::new().reconcile(probs, &rows, &weights).unwrap();
//! assert_eq!(result.predictions(), [1, 1]);
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
mod errors;
mod evidence;
mod metrics;
mod weights;

pub use algorithm::*;
pub use errors::*;
pub use evidence::*;
pub use metrics::*;
pub use weights::*;
