use std::collections::HashMap;

use log::warn;
use ndarray::{Array1, Array2};

use crate::errors::{LabelError, Result};
use crate::universe::LabelUniverse;

impl LabelUniverse {
    /// Multi-hot encode a label list into a length-`len()` binary vector.
    ///
    /// Position `index_of(label)` is set to 1 for every label present,
    /// 0 elsewhere. Duplicates collapse. A label outside the universe is an
    /// [`LabelError::UnknownLabel`] error, never silently ignored: it means
    /// the evaluation label set diverged from the one the universe was
    /// built from.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Array1<f64>> {
        let mut binary = Array1::<f64>::zeros(self.len());
        for label in labels {
            let label = label.as_ref();
            let idx = self
                .index_of(label)
                .ok_or_else(|| LabelError::UnknownLabel(label.to_string()))?;
            binary[idx] = 1.;
        }
        Ok(binary)
    }
}

/// Row-aligned binary matrices for the two evidence sources.
#[derive(Clone, Debug)]
pub struct PairedEncoding {
    /// Sample keys common to both collections, sorted
    pub keys: Vec<String>,
    /// Reference (ground truth) binary matrix, one row per key
    pub reference: Array2<f64>,
    /// Auxiliary (predicted) binary matrix, aligned row-for-row
    pub auxiliary: Array2<f64>,
    /// Number of samples present on one side only, skipped
    pub skipped: usize,
}

/// Encode two sample→labels collections into row-aligned binary matrices.
///
/// Rows follow the sorted intersection of the sample keys so the reference
/// and auxiliary matrices are comparable row-for-row. Samples present in
/// only one collection are skipped and counted.
pub fn encode_paired(
    universe: &LabelUniverse,
    reference: &HashMap<String, Vec<String>>,
    auxiliary: &HashMap<String, Vec<String>>,
) -> Result<PairedEncoding> {
    let mut keys: Vec<String> = reference
        .keys()
        .filter(|key| auxiliary.contains_key(*key))
        .cloned()
        .collect();
    keys.sort();
    if keys.is_empty() {
        return Err(LabelError::EmptyIntersection);
    }
    let skipped = reference.len() + auxiliary.len() - 2 * keys.len();
    if skipped > 0 {
        warn!("{skipped} sample(s) present in only one collection, skipped");
    }

    let n = universe.len();
    let mut reference_bin = Array2::<f64>::zeros((keys.len(), n));
    let mut auxiliary_bin = Array2::<f64>::zeros((keys.len(), n));
    for (i, key) in keys.iter().enumerate() {
        reference_bin.row_mut(i).assign(&universe.encode(&reference[key])?);
        auxiliary_bin.row_mut(i).assign(&universe.encode(&auxiliary[key])?);
    }
    Ok(PairedEncoding {
        keys,
        reference: reference_bin,
        auxiliary: auxiliary_bin,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn collection(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(key, labels)| {
                (
                    key.to_string(),
                    labels.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect()
    }

    fn universe_abc() -> LabelUniverse {
        let reference = collection(&[("s1", &["A", "B"])]);
        let auxiliary = collection(&[("s1", &["C"])]);
        LabelUniverse::from_collections(&reference, &auxiliary).unwrap()
    }

    #[test]
    fn test_encode_counts_distinct_labels() {
        let universe = universe_abc();
        let encoded = universe.encode(&["B", "A", "B"]).unwrap();
        assert_eq!(encoded, array![1., 1., 0.]);
        assert_eq!(encoded.sum(), 2.);
    }

    #[test]
    fn test_encode_empty_list() {
        let universe = universe_abc();
        let encoded = universe.encode::<&str>(&[]).unwrap();
        assert_eq!(encoded.sum(), 0.);
    }

    #[test]
    fn test_unknown_label_fails_fast() {
        let universe = universe_abc();
        let err = universe.encode(&["A", "Zygentoma"]).unwrap_err();
        assert!(matches!(err, LabelError::UnknownLabel(l) if l == "Zygentoma"));
    }

    #[test]
    fn test_paired_encoding_alignment() {
        let reference = collection(&[("s2", &["A"]), ("s1", &["B", "C"]), ("only_ref", &["A"])]);
        let auxiliary = collection(&[("s1", &["B"]), ("s2", &["C"]), ("only_aux", &["B"])]);
        let universe = universe_abc();
        let paired = encode_paired(&universe, &reference, &auxiliary).unwrap();
        assert_eq!(paired.keys, ["s1", "s2"]);
        assert_eq!(paired.reference, array![[0., 1., 1.], [1., 0., 0.]]);
        assert_eq!(paired.auxiliary, array![[0., 1., 0.], [0., 0., 1.]]);
        assert_eq!(paired.skipped, 2);
    }

    #[test]
    fn test_paired_encoding_empty_intersection() {
        let reference = collection(&[("s1", &["A"])]);
        let auxiliary = collection(&[("s2", &["B"])]);
        let universe = universe_abc();
        let err = encode_paired(&universe, &reference, &auxiliary).unwrap_err();
        assert!(matches!(err, LabelError::EmptyIntersection));
    }
}
