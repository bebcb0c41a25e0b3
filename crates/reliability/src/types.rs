#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Per-label reliability of the auxiliary signal against the reference labeling.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Reliability {
    /// TP / (TP + FP): how often a positive call is correct
    pub precision: f64,
    /// TP / (TP + FN): how often a real positive is called
    pub recall: f64,
    /// TN / (TN + FP): how often a real negative is left uncalled
    pub specificity: f64,
}

/// 2×2 contingency table for one label column.
///
/// Reference is taken as truth, auxiliary as the prediction. Any non-zero
/// entry counts as a positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contingency {
    /// Positive in both
    pub true_pos: usize,
    /// Positive in auxiliary only
    pub false_pos: usize,
    /// Negative in both
    pub true_neg: usize,
    /// Positive in reference only
    pub false_neg: usize,
}

/// Substitution values for metrics whose denominator is zero.
///
/// The value may be `NaN`: macro aggregates skip non-finite records, so
/// `NaN` marks a label as "undefined, exclude from averages" while a finite
/// value stands in as the metric itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallbackPolicy {
    /// Substitute when TP + FP == 0 (label never called positive)
    pub precision: f64,
    /// Substitute when TP + FN == 0 (label never truly present)
    pub recall: f64,
    /// Substitute when TN + FP == 0 (label never truly absent)
    pub specificity: f64,
}

impl FallbackPolicy {
    /// Fallbacks for aggregate reporting: `NaN` everywhere, so undefined
    /// labels drop out of the macro averages.
    pub fn reporting() -> Self {
        FallbackPolicy {
            precision: f64::NAN,
            recall: f64::NAN,
            specificity: f64::NAN,
        }
    }

    /// Fallbacks for downstream multiplicative masking, chosen so the
    /// derived weights are neutral: a never-called label keeps precision
    /// weight 1, a never-present label keeps absence weight `1 − 0 = 1`.
    pub fn masking() -> Self {
        FallbackPolicy {
            precision: 1.,
            recall: 0.,
            specificity: 1.,
        }
    }
}

/// Tally of fallback substitutions made during estimation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionCounts {
    /// Labels with undefined precision
    pub precision: usize,
    /// Labels with undefined recall
    pub recall: usize,
    /// Labels with undefined specificity
    pub specificity: usize,
}

impl SubstitutionCounts {
    /// Total substitutions across the three metrics
    pub fn total(&self) -> usize {
        self.precision + self.recall + self.specificity
    }
}
