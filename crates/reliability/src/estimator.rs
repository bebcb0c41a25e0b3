use log::debug;
use ndarray::{ArrayBase, ArrayView1, Data, Ix2};

#[cfg(feature = "persistent")]
use ednafuse_labels::{LabelError, LabelUniverse};
#[cfg(feature = "persistent")]
use std::collections::HashMap;
#[cfg(feature = "persistent")]
use std::fs;
#[cfg(feature = "persistent")]
use std::path::Path;

use crate::errors::{ReliabilityError, Result};
use crate::types::{Contingency, FallbackPolicy, Reliability, SubstitutionCounts};

/// Per-label reliability records, aligned with the label universe index.
#[derive(Clone, Debug, PartialEq)]
pub struct ReliabilityTable {
    records: Vec<Reliability>,
    substitutions: SubstitutionCounts,
}

/// 2×2 contingency table between a reference column (truth) and an
/// auxiliary column (prediction). Any non-zero entry is a positive.
pub fn contingency(reference: &ArrayView1<f64>, auxiliary: &ArrayView1<f64>) -> Contingency {
    let mut table = Contingency::default();
    for (&truth, &pred) in reference.iter().zip(auxiliary.iter()) {
        match (truth != 0., pred != 0.) {
            (true, true) => table.true_pos += 1,
            (false, true) => table.false_pos += 1,
            (false, false) => table.true_neg += 1,
            (true, false) => table.false_neg += 1,
        }
    }
    table
}

fn guarded(numerator: usize, denominator: usize, fallback: f64, substituted: &mut usize) -> f64 {
    if denominator == 0 {
        *substituted += 1;
        fallback
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Estimate per-label reliability from two row-aligned S×N binary matrices.
///
/// `reference` is the ground truth, `auxiliary` the signal under test. Every
/// zero-denominator metric is substituted per `policy` and tallied; no
/// division by zero ever surfaces as a fault.
pub fn estimate<D1, D2>(
    reference: &ArrayBase<D1, Ix2>,
    auxiliary: &ArrayBase<D2, Ix2>,
    policy: FallbackPolicy,
) -> Result<ReliabilityTable>
where
    D1: Data<Elem = f64>,
    D2: Data<Elem = f64>,
{
    if reference.dim() != auxiliary.dim() {
        return Err(ReliabilityError::ShapeMismatch(
            reference.dim(),
            auxiliary.dim(),
        ));
    }

    let mut records = Vec::with_capacity(reference.ncols());
    let mut substitutions = SubstitutionCounts::default();
    for k in 0..reference.ncols() {
        let table = contingency(&reference.column(k), &auxiliary.column(k));
        records.push(Reliability {
            precision: guarded(
                table.true_pos,
                table.true_pos + table.false_pos,
                policy.precision,
                &mut substitutions.precision,
            ),
            recall: guarded(
                table.true_pos,
                table.true_pos + table.false_neg,
                policy.recall,
                &mut substitutions.recall,
            ),
            specificity: guarded(
                table.true_neg,
                table.true_neg + table.false_pos,
                policy.specificity,
                &mut substitutions.specificity,
            ),
        });
    }
    if substitutions.total() > 0 {
        debug!(
            "{} undefined metric(s) substituted (precision: {}, recall: {}, specificity: {})",
            substitutions.total(),
            substitutions.precision,
            substitutions.recall,
            substitutions.specificity
        );
    }
    Ok(ReliabilityTable {
        records,
        substitutions,
    })
}

fn finite_mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0., 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

impl ReliabilityTable {
    /// Build a table from precomputed records
    pub fn from_records(records: Vec<Reliability>) -> Self {
        ReliabilityTable {
            records,
            substitutions: SubstitutionCounts::default(),
        }
    }

    /// Number of labels covered
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for label index `k`
    pub fn record(&self, k: usize) -> Option<&Reliability> {
        self.records.get(k)
    }

    /// All records, in universe index order
    pub fn records(&self) -> &[Reliability] {
        &self.records
    }

    /// Fallback substitutions made during estimation
    pub fn substitutions(&self) -> SubstitutionCounts {
        self.substitutions
    }

    /// Macro-averaged precision, skipping non-finite records
    pub fn macro_precision(&self) -> f64 {
        finite_mean(self.records.iter().map(|r| r.precision))
    }

    /// Macro-averaged recall, skipping non-finite records
    pub fn macro_recall(&self) -> f64 {
        finite_mean(self.records.iter().map(|r| r.recall))
    }

    /// Macro-averaged specificity, skipping non-finite records
    pub fn macro_specificity(&self) -> f64 {
        finite_mean(self.records.iter().map(|r| r.specificity))
    }

    /// Save the table as a JSON object keyed by label string, records in
    /// universe order. Non-finite metrics serialize as `null`, so tables
    /// meant for persistence should be estimated with finite fallbacks
    /// (e.g. [`FallbackPolicy::masking`]).
    #[cfg(feature = "persistent")]
    pub fn save<P: AsRef<Path>>(&self, path: P, universe: &LabelUniverse) -> Result<()> {
        if self.len() != universe.len() {
            return Err(ReliabilityError::LengthMismatch(self.len(), universe.len()));
        }
        let mut map = serde_json::Map::with_capacity(self.len());
        for (label, record) in universe.labels().iter().zip(self.records.iter()) {
            map.insert(label.clone(), serde_json::to_value(record)?);
        }
        fs::write(path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }

    /// Load a table saved by [`ReliabilityTable::save`], realigning records
    /// to the universe index. A key outside the universe or a universe label
    /// without a record fails fast.
    #[cfg(feature = "persistent")]
    pub fn load<P: AsRef<Path>>(path: P, universe: &LabelUniverse) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let map: HashMap<String, Reliability> = serde_json::from_str(&data)?;
        for key in map.keys() {
            if universe.index_of(key).is_none() {
                return Err(LabelError::UnknownLabel(key.clone()).into());
            }
        }
        let records = universe
            .labels()
            .iter()
            .map(|label| {
                map.get(label)
                    .copied()
                    .ok_or_else(|| ReliabilityError::MissingLabel(label.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ReliabilityTable::from_records(records))
    }
}
