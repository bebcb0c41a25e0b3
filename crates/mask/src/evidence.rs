use std::collections::HashMap;
use std::path::Path;

use ednafuse_labels::LabelUniverse;
use ndarray::{Array2, ArrayView1};

use crate::errors::{MaskError, Result};

/// Presence/absence evidence per sampling event.
///
/// One row per event, one column per label universe position. Raw counts are
/// binarized at the ingestion boundary (any value > 0 becomes 1), so the
/// table always holds 0/1 indicators whatever the upstream assemblage data
/// looked like.
#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceTable {
    events: Vec<String>,
    index: HashMap<String, usize>,
    data: Array2<f64>,
}

impl EvidenceTable {
    /// Build a table from raw per-event counts, binarizing them.
    ///
    /// Fails when the event keys do not line up with the count rows or when
    /// an event key repeats.
    pub fn from_counts(events: Vec<String>, counts: Array2<f64>) -> Result<Self> {
        if events.len() != counts.nrows() {
            return Err(MaskError::DimensionMismatch(format!(
                "{} event keys for {} count rows",
                events.len(),
                counts.nrows()
            )));
        }
        let mut index = HashMap::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            if index.insert(event.clone(), i).is_some() {
                return Err(MaskError::InvalidValue(format!(
                    "duplicate event key: {event}"
                )));
            }
        }
        let data = counts.mapv(|v| if v > 0. { 1. } else { 0. });
        Ok(EvidenceTable {
            events,
            index,
            data,
        })
    }

    /// Multi-hot encode an event→labels mapping into an evidence table,
    /// events in sorted key order.
    pub fn from_labelings(
        universe: &LabelUniverse,
        labeling: &HashMap<String, Vec<String>>,
    ) -> Result<Self> {
        let mut events: Vec<String> = labeling.keys().cloned().collect();
        events.sort();
        let mut data = Array2::<f64>::zeros((events.len(), universe.len()));
        for (i, event) in events.iter().enumerate() {
            data.row_mut(i).assign(&universe.encode(&labeling[event])?);
        }
        Self::from_counts(events, data)
    }

    /// Event keys, in table row order
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Number of label columns
    pub fn n_labels(&self) -> usize {
        self.data.ncols()
    }

    /// Number of events
    pub fn n_events(&self) -> usize {
        self.events.len()
    }

    /// Binary presence/absence row for an event
    pub fn row(&self, event: &str) -> Option<ArrayView1<f64>> {
        self.index.get(event).map(|&i| self.data.row(i))
    }

    /// Write the table as CSV: an `event` key column then one binary column
    /// per label, headed by the universe label strings.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P, universe: &LabelUniverse) -> Result<()> {
        if self.n_labels() != universe.len() {
            return Err(MaskError::DimensionMismatch(format!(
                "table has {} label columns for a universe of {} labels",
                self.n_labels(),
                universe.len()
            )));
        }
        let mut writer = csv::Writer::from_path(path)?;
        let mut header = Vec::with_capacity(universe.len() + 1);
        header.push("event".to_string());
        header.extend(universe.labels().iter().cloned());
        writer.write_record(&header)?;
        for (event, row) in self.events.iter().zip(self.data.rows()) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(event.clone());
            record.extend(row.iter().map(|&v| ((v != 0.) as u8).to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table written by [`EvidenceTable::write_csv`] or by any
    /// upstream assemblage export with the same shape. Columns after the
    /// event key are taken by position; values are parsed as numbers and
    /// binarized.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let n_labels = reader.headers()?.len().saturating_sub(1);
        let mut events = Vec::new();
        let mut values = Vec::new();
        for record in reader.records() {
            let record = record?;
            let event = record
                .get(0)
                .ok_or_else(|| MaskError::InvalidValue("empty CSV record".to_string()))?;
            events.push(event.to_string());
            for field in record.iter().skip(1) {
                let value: f64 = field.parse().map_err(|_| {
                    MaskError::InvalidValue(format!("non-numeric evidence entry: {field}"))
                })?;
                values.push(value);
            }
        }
        let counts = Array2::from_shape_vec((events.len(), n_labels), values)
            .map_err(|e| MaskError::DimensionMismatch(e.to_string()))?;
        Self::from_counts(events, counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn universe_abc() -> LabelUniverse {
        let mut reference = HashMap::new();
        reference.insert(
            "s1".to_string(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        );
        LabelUniverse::from_collections(&reference, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_counts_are_binarized() {
        let table = EvidenceTable::from_counts(
            vec!["e1".to_string(), "e2".to_string()],
            array![[0., 2., 5.], [1., 0., 0.]],
        )
        .unwrap();
        assert_eq!(table.row("e1").unwrap().to_vec(), vec![0., 1., 1.]);
        assert_eq!(table.row("e2").unwrap().to_vec(), vec![1., 0., 0.]);
        assert_eq!(table.row("e3"), None);
    }

    #[test]
    fn test_duplicate_event_rejected() {
        let err = EvidenceTable::from_counts(
            vec!["e1".to_string(), "e1".to_string()],
            array![[1.], [0.]],
        )
        .unwrap_err();
        assert!(matches!(err, MaskError::InvalidValue(_)));
    }

    #[test]
    fn test_event_row_mismatch_rejected() {
        let err = EvidenceTable::from_counts(vec!["e1".to_string()], array![[1.], [0.]])
            .unwrap_err();
        assert!(matches!(err, MaskError::DimensionMismatch(_)));
    }

    #[test]
    fn test_from_labelings_sorted_events() {
        let universe = universe_abc();
        let mut labeling = HashMap::new();
        labeling.insert("e2".to_string(), vec!["C".to_string()]);
        labeling.insert("e1".to_string(), vec!["A".to_string(), "B".to_string()]);
        let table = EvidenceTable::from_labelings(&universe, &labeling).unwrap();
        assert_eq!(table.events(), ["e1", "e2"]);
        assert_eq!(table.row("e1").unwrap().to_vec(), vec![1., 1., 0.]);
        assert_eq!(table.row("e2").unwrap().to_vec(), vec![0., 0., 1.]);
    }

    #[test]
    fn test_csv_roundtrip() {
        let universe = universe_abc();
        let table = EvidenceTable::from_counts(
            vec!["e1".to_string(), "e2".to_string()],
            array![[0., 3., 1.], [1., 0., 0.]],
        )
        .unwrap();
        let path = std::env::temp_dir().join("ednafuse_mhe_roundtrip.csv");
        table.write_csv(&path, &universe).unwrap();
        let reloaded = EvidenceTable::read_csv(&path).unwrap();
        assert_eq!(reloaded, table);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_csv_write_needs_matching_universe() {
        let universe = universe_abc();
        let table =
            EvidenceTable::from_counts(vec!["e1".to_string()], array![[1., 0.]]).unwrap();
        let path = std::env::temp_dir().join("ednafuse_mhe_mismatch.csv");
        let err = table.write_csv(&path, &universe).unwrap_err();
        assert!(matches!(err, MaskError::DimensionMismatch(_)));
    }
}
