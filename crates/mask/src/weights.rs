use std::collections::HashMap;

use ednafuse_reliability::ReliabilityTable;
use ndarray::Array1;

use crate::errors::{MaskError, Result};
use crate::evidence::EvidenceTable;

/// How per-event weight vectors are derived from the evidence table.
#[derive(Clone, Copy, Debug)]
pub enum WeightMode<'a> {
    /// Raw binary filter: weight 1 where evidence indicates presence, 0
    /// elsewhere. Labels without evidence are suppressed outright.
    Presence,
    /// Reliability-derived multipliers: `precision(k)` where evidence
    /// indicates presence, `1 − recall(k)` elsewhere. Positive calls are
    /// trusted proportionally to how often they are correct; absence calls
    /// are discounted proportionally to how often real positives get missed.
    Reliability(&'a ReliabilityTable),
}

/// Build one weight vector per event from the evidence table.
///
/// In reliability mode the table width must match the reliability records,
/// otherwise the call fails fast with a dimension mismatch.
pub fn event_weights(
    evidence: &EvidenceTable,
    mode: WeightMode,
) -> Result<HashMap<String, Array1<f64>>> {
    if let WeightMode::Reliability(table) = mode {
        if table.len() != evidence.n_labels() {
            return Err(MaskError::DimensionMismatch(format!(
                "{} reliability records for {} evidence columns",
                table.len(),
                evidence.n_labels()
            )));
        }
    }

    let mut weights = HashMap::with_capacity(evidence.n_events());
    for event in evidence.events() {
        // row lookup cannot fail for the table's own event keys
        let row = evidence
            .row(event)
            .ok_or_else(|| MaskError::InvalidValue(format!("missing evidence row: {event}")))?;
        let vector = match mode {
            WeightMode::Presence => row.to_owned(),
            WeightMode::Reliability(table) => Array1::from_iter(
                row.iter().enumerate().map(|(k, &present)| {
                    let record = &table.records()[k];
                    if present != 0. {
                        record.precision
                    } else {
                        1. - record.recall
                    }
                }),
            ),
        };
        weights.insert(event.clone(), vector);
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ednafuse_reliability::Reliability;
    use ndarray::array;

    fn evidence_one_event() -> EvidenceTable {
        // event with evidence for label 0 only
        EvidenceTable::from_counts(vec!["e1".to_string()], array![[4., 0., 0.]]).unwrap()
    }

    fn reliability_abc() -> ReliabilityTable {
        ReliabilityTable::from_records(vec![
            Reliability {
                precision: 0.8,
                recall: 0.7,
                specificity: 0.9,
            },
            Reliability {
                precision: 0.5,
                recall: 0.4,
                specificity: 0.9,
            },
            Reliability {
                precision: 0.3,
                recall: 0.9,
                specificity: 0.9,
            },
        ])
    }

    #[test]
    fn test_presence_weights_are_binary() {
        let weights = event_weights(&evidence_one_event(), WeightMode::Presence).unwrap();
        assert_eq!(weights["e1"], array![1., 0., 0.]);
    }

    #[test]
    fn test_reliability_weights() {
        let table = reliability_abc();
        let weights =
            event_weights(&evidence_one_event(), WeightMode::Reliability(&table)).unwrap();
        let w = &weights["e1"];
        assert_abs_diff_eq!(w[0], 0.8);
        assert_abs_diff_eq!(w[1], 0.6);
        assert_abs_diff_eq!(w[2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_never_called_label_weight_is_neutral() {
        use ednafuse_reliability::{estimate, FallbackPolicy};

        // label 1 never called positive by the auxiliary signal
        let reference = array![[1., 1.], [0., 1.]];
        let auxiliary = array![[1., 0.], [0., 0.]];
        let table = estimate(&reference, &auxiliary, FallbackPolicy::masking()).unwrap();

        let evidence =
            EvidenceTable::from_counts(vec!["e1".to_string()], array![[0., 1.]]).unwrap();
        let weights = event_weights(&evidence, WeightMode::Reliability(&table)).unwrap();
        // evidence indicates label 1 present: its weight is the precision
        // fallback 1, so the mask neither suppresses nor boosts the column
        assert_abs_diff_eq!(weights["e1"][1], 1.);
    }

    #[test]
    fn test_reliability_width_mismatch() {
        let table = ReliabilityTable::from_records(vec![Reliability {
            precision: 1.,
            recall: 1.,
            specificity: 1.,
        }]);
        let err =
            event_weights(&evidence_one_event(), WeightMode::Reliability(&table)).unwrap_err();
        assert!(matches!(err, MaskError::DimensionMismatch(_)));
    }
}
