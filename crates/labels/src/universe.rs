use std::collections::{BTreeSet, HashMap};

use crate::errors::{LabelError, Result};

/// The canonical sorted set of class labels across both evidence sources.
///
/// Built as the union of the labels appearing in two sample→labels
/// collections, deduplicated and sorted lexicographically. The label→index
/// mapping is a bijection over `0..len()` and is stable across runs for the
/// same input data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelUniverse {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelUniverse {
    /// Build the universe from two sample→labels collections.
    ///
    /// Which collection contributed a given label is irrelevant (union
    /// semantics). Samples with empty label lists are permitted and
    /// contribute nothing; an empty label *string* is rejected.
    pub fn from_collections(
        reference: &HashMap<String, Vec<String>>,
        auxiliary: &HashMap<String, Vec<String>>,
    ) -> Result<Self> {
        let mut unique = BTreeSet::new();
        for (key, labels) in reference.iter().chain(auxiliary.iter()) {
            for label in labels {
                if label.is_empty() {
                    return Err(LabelError::EmptyLabel(key.clone()));
                }
                unique.insert(label.clone());
            }
        }
        let labels: Vec<String> = unique.into_iter().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Ok(LabelUniverse { labels, index })
    }

    /// Number of labels in the universe
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the universe holds no label at all
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The sorted labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of a label, `None` when outside the universe
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label at a given index, `None` when out of range
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_sorted_union() {
        let reference = collection(&[("s1", &["Diptera", "Araneae"]), ("s2", &[])]);
        let auxiliary = collection(&[("s1", &["Coleoptera", "Araneae"])]);
        let universe = LabelUniverse::from_collections(&reference, &auxiliary).unwrap();
        assert_eq!(universe.labels(), ["Araneae", "Coleoptera", "Diptera"]);
    }

    #[test]
    fn test_mappings_are_mutual_inverses() {
        let reference = collection(&[("s1", &["b", "a", "d"])]);
        let auxiliary = collection(&[("s1", &["c", "a"])]);
        let universe = LabelUniverse::from_collections(&reference, &auxiliary).unwrap();
        assert_eq!(universe.len(), 4);
        for i in 0..universe.len() {
            let label = universe.label_of(i).unwrap();
            assert_eq!(universe.index_of(label), Some(i));
        }
        assert_eq!(universe.label_of(4), None);
        assert_eq!(universe.index_of("e"), None);
    }

    #[test]
    fn test_empty_label_rejected() {
        let reference = collection(&[("s1", &["a", ""])]);
        let auxiliary = collection(&[]);
        let err = LabelUniverse::from_collections(&reference, &auxiliary).unwrap_err();
        assert!(matches!(err, LabelError::EmptyLabel(key) if key == "s1"));
    }

    #[test]
    fn test_empty_collections_give_empty_universe() {
        let universe =
            LabelUniverse::from_collections(&collection(&[]), &collection(&[])).unwrap();
        assert!(universe.is_empty());
    }
}
