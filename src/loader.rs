//! JSON loading utilities for serialized evaluation batches.
//!
//! A training run can dump the raw per-scan arrays the metric engine
//! consumes ([`EvalBatch`]) as JSON; this module loads those dumps back for
//! offline evaluation, validating shapes on ingest.

use crate::error::{Result, SggEvalError};
use crate::types::EvalBatch;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an evaluation batch from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the batch
/// fails shape validation.
///
/// # Example
///
/// ```no_run
/// use sgg_eval::loader::load_from_file;
///
/// let batch = load_from_file("batch_000.json").unwrap();
/// println!("Loaded {} scans", batch.num_scans());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<EvalBatch> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let batch: EvalBatch = serde_json::from_reader(reader)?;

    validate_batch(&batch)?;

    Ok(batch)
}

/// Load an evaluation batch from a JSON string.
pub fn load_from_string(json: &str) -> Result<EvalBatch> {
    let batch: EvalBatch = serde_json::from_str(json)?;

    validate_batch(&batch)?;

    Ok(batch)
}

/// Validate the parallel-array shape contract of a batch.
///
/// All five per-scan sequences must agree on scan count; within each scan the
/// relation labels, relation logits and pair indices must agree on
/// candidate-pair count, and the refined logits must cover every object the
/// labels name.
pub fn validate_batch(batch: &EvalBatch) -> Result<()> {
    let num_scans = batch.relation_labels.len();
    if batch.relation_logits.len() != num_scans
        || batch.refine_logits.len() != num_scans
        || batch.object_labels.len() != num_scans
        || batch.pair_indices.len() != num_scans
    {
        return Err(SggEvalError::ShapeMismatch(format!(
            "scan counts disagree: {} labels, {} relation logits, {} refine logits, {} object labels, {} pair indices",
            num_scans,
            batch.relation_logits.len(),
            batch.refine_logits.len(),
            batch.object_labels.len(),
            batch.pair_indices.len()
        )));
    }

    for scan_idx in 0..num_scans {
        let num_pairs = batch.relation_labels[scan_idx].len();
        if batch.pair_indices[scan_idx].len() != num_pairs {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan {}: {} relation labels but {} pair indices",
                scan_idx,
                num_pairs,
                batch.pair_indices[scan_idx].len()
            )));
        }
        if batch.relation_logits[scan_idx].len() != num_pairs {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan {}: {} relation labels but {} relation logit rows",
                scan_idx,
                num_pairs,
                batch.relation_logits[scan_idx].len()
            )));
        }

        let num_objects = batch.object_labels[scan_idx].len();
        if batch.refine_logits[scan_idx].len() != num_objects {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan {}: {} object labels but {} refine logit rows",
                scan_idx,
                num_objects,
                batch.refine_logits[scan_idx].len()
            )));
        }

        for &(subject, object) in &batch.pair_indices[scan_idx] {
            if subject >= num_objects || object >= num_objects {
                return Err(SggEvalError::ShapeMismatch(format!(
                    "scan {}: pair ({}, {}) references objects outside 0..{}",
                    scan_idx, subject, object, num_objects
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> &'static str {
        r#"{
            "relation_logits": [[[0.0, 2.0, 1.0]]],
            "refine_logits": [[[1.0, 0.0], [0.0, 1.0]]],
            "relation_labels": [[1]],
            "object_labels": [[0, 1]],
            "pair_indices": [[[0, 1]]]
        }"#
    }

    #[test]
    fn test_load_from_string() {
        let batch = load_from_string(valid_json()).unwrap();
        assert_eq!(batch.num_scans(), 1);
        assert_eq!(batch.pairs_per_scan(), vec![1]);
        assert_eq!(batch.preds_per_scan(), vec![1]);
    }

    #[test]
    fn test_load_invalid_json() {
        assert!(matches!(
            load_from_string("not json"),
            Err(SggEvalError::JsonError(_))
        ));
    }

    #[test]
    fn test_validate_scan_count_mismatch() {
        let json = r#"{
            "relation_logits": [],
            "refine_logits": [[[1.0]]],
            "relation_labels": [[1]],
            "object_labels": [[0]],
            "pair_indices": [[[0, 0]]]
        }"#;
        assert!(matches!(
            load_from_string(json),
            Err(SggEvalError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_validate_pair_index_out_of_range() {
        let json = r#"{
            "relation_logits": [[[0.0, 1.0]]],
            "refine_logits": [[[1.0]]],
            "relation_labels": [[1]],
            "object_labels": [[0]],
            "pair_indices": [[[0, 3]]]
        }"#;
        assert!(matches!(
            load_from_string(json),
            Err(SggEvalError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let batch = load_from_string(valid_json()).unwrap();
        let json = serde_json::to_string(&batch).unwrap();
        let again = load_from_string(&json).unwrap();
        assert_eq!(again.relation_labels, batch.relation_labels);
        assert_eq!(again.pair_indices, batch.pair_indices);
    }
}
