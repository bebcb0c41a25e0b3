//! This library builds the canonical label universe shared by the two
//! evidence sources of a camera-trap / eDNA survey and multi-hot encodes
//! per-sample label lists over it.
//!
//! The universe is the deduplicated, lexicographically sorted union of every
//! label appearing in either collection. Sorting makes the label→index
//! mapping deterministic for a given dataset, which matters downstream:
//! index positions double as column identifiers in classification
//! probability matrices and per-event weight vectors.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ednafuse_labels::LabelUniverse;
//!
//! let mut images = HashMap::new();
//! images.insert("event01".to_string(), vec!["Coleoptera".to_string()]);
//! let mut dna = HashMap::new();
//! dna.insert(
//!     "event01".to_string(),
//!     vec!["Araneae".to_string(), "Coleoptera".to_string()],
//! );
//!
//! let universe = LabelUniverse::from_collections(&images, &dna).unwrap();
//! assert_eq!(universe.labels(), ["Araneae", "Coleoptera"]);
//! assert_eq!(universe.index_of("Coleoptera"), Some(1));
//!
//! let encoded = universe.encode(&["Coleoptera"]).unwrap();
//! assert_eq!(encoded.to_vec(), vec![0., 1.]);
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod encoding;
mod errors;
mod universe;

pub use encoding::*;
pub use errors::*;
pub use universe::*;
