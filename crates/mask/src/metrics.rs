use std::collections::{BTreeMap, BTreeSet};

/// Precision, recall and F1 for one class, plus its support (number of
/// samples truly in the class).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassMetrics {
    /// TP / predicted-positive count, or the zero-division fallback
    pub precision: f64,
    /// TP / support, or the zero-division fallback
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0 when both are 0
    pub f1: f64,
    /// Number of samples whose true class this is
    pub support: usize,
}

/// Per-class classification metrics over named (index-encoded) predictions.
#[derive(Clone, Debug)]
pub struct ClassificationReport {
    classes: BTreeMap<usize, ClassMetrics>,
    accuracy: f64,
}

/// Compute per-class precision/recall/F1 over the classes observed in either
/// the truth or the predictions.
///
/// `zero_division` replaces any metric whose denominator is zero (a class
/// present in the truth but never predicted, or vice versa), matching the
/// evaluation convention of the image pipeline (fallback 1).
pub fn classification_report(
    truth: &[usize],
    predictions: &[usize],
    zero_division: f64,
) -> ClassificationReport {
    debug_assert_eq!(truth.len(), predictions.len());

    let observed: BTreeSet<usize> = truth.iter().chain(predictions.iter()).copied().collect();
    let mut true_pos: BTreeMap<usize, usize> = BTreeMap::new();
    let mut pred_count: BTreeMap<usize, usize> = BTreeMap::new();
    let mut support: BTreeMap<usize, usize> = BTreeMap::new();
    let mut hits = 0_usize;
    for (&t, &p) in truth.iter().zip(predictions.iter()) {
        *support.entry(t).or_default() += 1;
        *pred_count.entry(p).or_default() += 1;
        if t == p {
            *true_pos.entry(t).or_default() += 1;
            hits += 1;
        }
    }

    let ratio = |numerator: usize, denominator: usize| {
        if denominator == 0 {
            zero_division
        } else {
            numerator as f64 / denominator as f64
        }
    };
    let classes = observed
        .into_iter()
        .map(|class| {
            let tp = true_pos.get(&class).copied().unwrap_or(0);
            let class_support = support.get(&class).copied().unwrap_or(0);
            let precision = ratio(tp, pred_count.get(&class).copied().unwrap_or(0));
            let recall = ratio(tp, class_support);
            let f1 = if precision + recall == 0. {
                0.
            } else {
                2. * precision * recall / (precision + recall)
            };
            (
                class,
                ClassMetrics {
                    precision,
                    recall,
                    f1,
                    support: class_support,
                },
            )
        })
        .collect();

    let accuracy = if truth.is_empty() {
        f64::NAN
    } else {
        hits as f64 / truth.len() as f64
    };
    ClassificationReport { classes, accuracy }
}

impl ClassificationReport {
    /// Fraction of samples predicted correctly
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Metrics for one class index
    pub fn class(&self, class: usize) -> Option<&ClassMetrics> {
        self.classes.get(&class)
    }

    /// All per-class metrics, keyed by class index
    pub fn per_class(&self) -> &BTreeMap<usize, ClassMetrics> {
        &self.classes
    }

    /// Recall averaged uniformly over the distinct classes observed in the
    /// truth (support > 0), not over the whole label universe.
    pub fn macro_recall(&self) -> f64 {
        let recalls: Vec<f64> = self
            .classes
            .values()
            .filter(|m| m.support > 0)
            .map(|m| m.recall)
            .collect();
        if recalls.is_empty() {
            f64::NAN
        } else {
            recalls.iter().sum::<f64>() / recalls.len() as f64
        }
    }
}

/// Fraction of samples whose true class index appears among the row's top-3
/// scored indices.
pub fn top3_accuracy(top3: &[Vec<usize>], truth: &[usize]) -> f64 {
    debug_assert_eq!(top3.len(), truth.len());
    if truth.is_empty() {
        return f64::NAN;
    }
    let hits = top3
        .iter()
        .zip(truth.iter())
        .filter(|(indices, t)| indices.contains(t))
        .count();
    hits as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_report_per_class() {
        let truth = [0, 0, 1, 2];
        let predictions = [0, 1, 1, 1];
        let report = classification_report(&truth, &predictions, 1.);

        let class0 = report.class(0).unwrap();
        assert_abs_diff_eq!(class0.precision, 1.);
        assert_abs_diff_eq!(class0.recall, 0.5);
        assert_eq!(class0.support, 2);

        let class1 = report.class(1).unwrap();
        assert_abs_diff_eq!(class1.precision, 1. / 3.);
        assert_abs_diff_eq!(class1.recall, 1.);

        // class 2 never predicted: precision falls back to 1, recall is 0
        let class2 = report.class(2).unwrap();
        assert_abs_diff_eq!(class2.precision, 1.);
        assert_abs_diff_eq!(class2.recall, 0.);

        assert_abs_diff_eq!(report.accuracy(), 0.5);
        assert_abs_diff_eq!(report.macro_recall(), 0.5);
    }

    #[test]
    fn test_predicted_only_class_excluded_from_macro_recall() {
        let truth = [0, 0];
        let predictions = [0, 3];
        let report = classification_report(&truth, &predictions, 1.);
        // class 3 has no support: its fallback recall must not enter the mean
        assert_abs_diff_eq!(report.class(3).unwrap().recall, 1.);
        assert_eq!(report.class(3).unwrap().support, 0);
        assert_abs_diff_eq!(report.macro_recall(), 0.5);
    }

    #[test]
    fn test_perfect_predictions() {
        let truth = [0, 1, 2, 1];
        let report = classification_report(&truth, &truth, 1.);
        assert_abs_diff_eq!(report.accuracy(), 1.);
        assert_abs_diff_eq!(report.macro_recall(), 1.);
        for metrics in report.per_class().values() {
            assert_abs_diff_eq!(metrics.f1, 1.);
        }
    }

    #[test]
    fn test_top3_accuracy() {
        let top3 = vec![
            vec![3, 2, 1],
            vec![0, 1, 2],
            vec![0, 2, 3],
            vec![3, 2, 1],
            vec![0, 1, 2],
        ];
        let truth = [0, 2, 1, 3, 1];
        assert_abs_diff_eq!(top3_accuracy(&top3, &truth), 0.6);
    }
}
