//! End-to-end run of the masking pipeline on a small synthetic survey:
//! build the label universe from two label collections, estimate the
//! reliability of the DNA signal, then compare the unmasked, presence-masked
//! and reliability-masked evaluations.
//!
//! Run with `RUST_LOG=debug cargo run --example masked_eval` to see the
//! pass-through and substitution counts.
use std::collections::HashMap;
use std::error::Error;

use ednafuse_labels::{encode_paired, LabelUniverse};
use ednafuse_mask::{event_rows, event_weights, EvidenceTable, Reconciler, WeightMode};
use ednafuse_reliability::{estimate, FallbackPolicy};
use ndarray::array;

fn labeling(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
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

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Per-event assemblages from the two sources (training split)
    let images = labeling(&[
        ("ev01", &["Araneae", "Coleoptera"]),
        ("ev02", &["Coleoptera"]),
        ("ev03", &["Diptera"]),
        ("ev04", &["Araneae", "Diptera"]),
    ]);
    let dna = labeling(&[
        ("ev01", &["Coleoptera"]),
        ("ev02", &["Coleoptera", "Diptera"]),
        ("ev03", &["Diptera"]),
        ("ev04", &["Araneae"]),
    ]);

    let universe = LabelUniverse::from_collections(&images, &dna)?;
    println!("universe: {:?}", universe.labels());

    let paired = encode_paired(&universe, &images, &dna)?;
    let table = estimate(&paired.reference, &paired.auxiliary, FallbackPolicy::masking())?;
    for (label, record) in universe.labels().iter().zip(table.records()) {
        println!(
            "{label}: precision={:.2} recall={:.2} specificity={:.2}",
            record.precision, record.recall, record.specificity
        );
    }

    // Validation split: one probability row per image, events spanning rows
    let probs = array![
        [0.6, 0.3, 0.1],
        [0.2, 0.5, 0.3],
        [0.1, 0.45, 0.45],
        [0.3, 0.3, 0.4],
    ];
    let events: Vec<String> = ["ev01", "ev01", "ev02", "ev03"]
        .iter()
        .map(|e| e.to_string())
        .collect();
    let truth = [1, 1, 1, 2]; // Coleoptera, Coleoptera, Coleoptera, Diptera
    let rows = event_rows(&events);

    let evidence = EvidenceTable::from_labelings(&universe, &dna)?;

    let unmasked = Reconciler::new().reconcile(probs.clone(), &rows, &HashMap::new())?;
    let presence_weights = event_weights(&evidence, WeightMode::Presence)?;
    let presence = Reconciler::new().reconcile(probs.clone(), &rows, &presence_weights)?;
    let reliability_weights = event_weights(&evidence, WeightMode::Reliability(&table))?;
    let reliability = Reconciler::new().reconcile(probs, &rows, &reliability_weights)?;

    for (name, result) in [
        ("unmasked", &unmasked),
        ("presence", &presence),
        ("reliability", &reliability),
    ] {
        let eval = result.evaluate(&truth)?;
        println!(
            "{name}: predictions={:?} top1={:.2} top3={:.2} macro_recall={:.2}",
            result.named_predictions(&universe)?,
            eval.top1_accuracy,
            eval.top3_accuracy,
            eval.macro_recall
        );
    }

    Ok(())
}
