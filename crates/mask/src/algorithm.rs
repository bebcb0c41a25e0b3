use std::cmp::Ordering;
use std::collections::HashMap;

use ednafuse_labels::LabelUniverse;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1};
use ndarray_stats::QuantileExt;

use crate::errors::{MaskError, Result};
use crate::metrics::{classification_report, top3_accuracy};

/// Group classification-matrix row indices by sample event key.
///
/// `events` holds one event key per matrix row (multiple images per
/// trapping occasion share a key).
pub fn event_rows(events: &[String]) -> HashMap<String, Vec<usize>> {
    let mut rows: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, event) in events.iter().enumerate() {
        rows.entry(event.clone()).or_default().push(i);
    }
    rows
}

/// Which matrix top-3 accuracy is measured on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Top3Source {
    /// The reweighted matrix, after masking. This replicates the reference
    /// evaluation pipeline, which ranks the already-masked probabilities.
    #[default]
    Masked,
    /// The matrix as it was before any weight was applied.
    Original,
}

/// The mask reconciliation engine.
///
/// Applies per-event weight vectors to a classification probability matrix,
/// grouped by a shared sample-event key, and recomputes final
/// classifications. Events present on only one side are passed through
/// untouched and counted, never raised as errors.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    top3_source: Top3Source,
}

impl Reconciler {
    /// Engine with default settings (top-3 measured on the masked matrix)
    pub fn new() -> Self {
        Reconciler::default()
    }

    /// Select the matrix top-3 accuracy is measured on
    pub fn top3_source(mut self, source: Top3Source) -> Self {
        self.top3_source = source;
        self
    }

    /// Reweight the probability matrix and recompute classifications.
    ///
    /// The matrix is consumed and mutated; callers needing the unmasked
    /// original keep their own copy. All dimension checks run before the
    /// first row is touched, so a failed call never leaves a partially
    /// masked result behind.
    ///
    /// # Errors
    ///
    /// * [`MaskError::DimensionMismatch`]: a weight vector length or a row
    ///   index disagrees with the matrix,
    /// * [`MaskError::UnorderedValues`]: a reweighted row has no argmax
    ///   (empty or NaN).
    pub fn reconcile(
        &self,
        mut probs: Array2<f64>,
        rows: &HashMap<String, Vec<usize>>,
        weights: &HashMap<String, Array1<f64>>,
    ) -> Result<Reconciliation> {
        let n = probs.ncols();
        for (event, weight) in weights {
            if weight.len() != n {
                return Err(MaskError::DimensionMismatch(format!(
                    "weight vector for event {event} has length {} for {n} classes",
                    weight.len()
                )));
            }
        }
        for (event, indices) in rows {
            if let Some(&bad) = indices.iter().find(|&&i| i >= probs.nrows()) {
                return Err(MaskError::DimensionMismatch(format!(
                    "row index {bad} for event {event} outside matrix of {} rows",
                    probs.nrows()
                )));
            }
        }

        let original = match self.top3_source {
            Top3Source::Original => Some(probs.clone()),
            Top3Source::Masked => None,
        };

        let mut missing_events = 0;
        for (event, indices) in rows {
            match weights.get(event) {
                Some(weight) => {
                    for &i in indices {
                        probs.row_mut(i).zip_mut_with(weight, |p, w| *p *= w);
                    }
                }
                None => {
                    missing_events += 1;
                    warn!("event {event} has no weight vector, rows pass through unmasked");
                }
            }
        }
        let unused_weights = weights.keys().filter(|k| !rows.contains_key(*k)).count();
        if unused_weights > 0 {
            debug!("{unused_weights} weight vector(s) matched no classified event");
        }

        let predictions = probs
            .rows()
            .into_iter()
            .map(|row| {
                row.argmax()
                    .map_err(|e| MaskError::UnorderedValues(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        let top3_matrix = original.as_ref().unwrap_or(&probs);
        let top3 = top3_matrix
            .rows()
            .into_iter()
            .map(|row| top_indices(&row, 3))
            .collect();

        Ok(Reconciliation {
            probs,
            predictions,
            top3,
            missing_events,
            unused_weights,
        })
    }
}

/// Indices of the `k` largest entries of a row, best first.
fn top_indices(row: &ArrayView1<f64>, k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| row[b].partial_cmp(&row[a]).unwrap_or(Ordering::Equal));
    order.truncate(k);
    order
}

/// A reconciled classification matrix with its revised decisions.
#[derive(Clone, Debug)]
pub struct Reconciliation {
    probs: Array2<f64>,
    predictions: Vec<usize>,
    top3: Vec<Vec<usize>>,
    missing_events: usize,
    unused_weights: usize,
}

impl Reconciliation {
    /// The reweighted probability matrix
    pub fn probs(&self) -> &Array2<f64> {
        &self.probs
    }

    /// Take ownership of the reweighted probability matrix
    pub fn into_probs(self) -> Array2<f64> {
        self.probs
    }

    /// Revised top-1 class index per row
    pub fn predictions(&self) -> &[usize] {
        &self.predictions
    }

    /// Top-3 class indices per row, best first
    pub fn top3(&self) -> &[Vec<usize>] {
        &self.top3
    }

    /// Events in the row index that had no weight vector (passed through)
    pub fn missing_events(&self) -> usize {
        self.missing_events
    }

    /// Weight vectors that matched no classified event
    pub fn unused_weights(&self) -> usize {
        self.unused_weights
    }

    /// Revised predictions as label strings from the universe.
    pub fn named_predictions(&self, universe: &LabelUniverse) -> Result<Vec<String>> {
        self.predictions
            .iter()
            .map(|&index| {
                universe
                    .label_of(index)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        MaskError::DimensionMismatch(format!(
                            "class index {index} outside universe of {} labels",
                            universe.len()
                        ))
                    })
            })
            .collect()
    }

    /// Summary accuracy metrics against true class indices.
    ///
    /// Macro recall is averaged over the distinct true classes only, with a
    /// zero-division fallback of 1 in the underlying report.
    pub fn evaluate(&self, truth: &[usize]) -> Result<Evaluation> {
        if truth.len() != self.predictions.len() {
            return Err(MaskError::DimensionMismatch(format!(
                "{} true labels for {} classified rows",
                truth.len(),
                self.predictions.len()
            )));
        }
        let report = classification_report(truth, &self.predictions, 1.);
        Ok(Evaluation {
            top1_accuracy: report.accuracy(),
            top3_accuracy: top3_accuracy(&self.top3, truth),
            macro_recall: report.macro_recall(),
        })
    }
}

/// Summary accuracy metrics of a reconciliation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    /// Fraction of rows whose revised argmax matches the true class
    pub top1_accuracy: f64,
    /// Fraction of rows whose true class ranks among the top 3
    pub top3_accuracy: f64,
    /// Recall averaged over the distinct true classes
    pub macro_recall: f64,
}
