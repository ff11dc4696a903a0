//! Object-classification and fixed-topK relation accuracy.
//!
//! These are the per-triple accuracy metrics: unlike Recall@K they do not
//! rank predictions globally but ask, for each ground-truth triple, whether
//! the prediction for that exact candidate pair got the predicate (and,
//! class-sensitively, the object identities) right.

use crate::error::{Result, SggEvalError};
use crate::matching::{find_pair, object_classes_correct, top_k_predicate_hit};
use crate::parsing::argmax;
use crate::types::{ScanGroundTruth, ScanPredictions};

/// Relation accuracy split for a batch of scans.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelationAccuracy {
    /// Fraction of ground-truth triples correct under per-pair top-K
    /// predicate matching plus subject/object class correctness.
    pub top_k_accuracy: f64,
    /// Fraction of ground-truth triples where the predicate was within the
    /// top-K but a wrong subject/object class prediction broke the match.
    /// This isolates error propagated from object classification.
    pub obj_cls_induced_error: f64,
    /// Total ground-truth triples considered.
    pub total_gt: usize,
}

/// Object-classification accuracy over a whole batch.
///
/// An object counts as correct when the argmax of its refined logits equals
/// its true label. Returns the accuracy and the total object count.
///
/// # Errors
///
/// Returns `ShapeMismatch` if scan counts or per-scan object counts disagree.
pub fn object_cls_accuracy(
    obj_logits: &[Vec<Vec<f64>>],
    obj_labels: &[Vec<usize>],
) -> Result<(f64, usize)> {
    if obj_logits.len() != obj_labels.len() {
        return Err(SggEvalError::ShapeMismatch(format!(
            "scan counts disagree: {} logit scans, {} label scans",
            obj_logits.len(),
            obj_labels.len()
        )));
    }

    let mut correct = 0usize;
    let mut total = 0usize;

    for (scan_idx, (logits, labels)) in obj_logits.iter().zip(obj_labels.iter()).enumerate() {
        if logits.len() != labels.len() {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan {}: {} object logit rows but {} object labels",
                scan_idx,
                logits.len(),
                labels.len()
            )));
        }
        for (row, &label) in logits.iter().zip(labels.iter()) {
            if argmax(row) == label {
                correct += 1;
            }
            total += 1;
        }
    }

    let accuracy = if total > 0 { correct as f64 / total as f64 } else { 0.0 };
    Ok((accuracy, total))
}

/// Top-K relation accuracy with the object-classification error split.
///
/// For every ground-truth triple in the batch, looks up the prediction for
/// its exact ordered pair and checks whether the true predicate is among the
/// pair's `k` most confident non-background predicates. With
/// `class_sensitive` the predicted subject/object classes must additionally
/// equal the true ones; a predicate hit with wrong classes is recorded as
/// object-classification-induced error instead of a correct prediction.
///
/// A batch with zero ground-truth triples yields all-zero fractions.
pub fn top_k_relation_accuracy(
    gt: &[ScanGroundTruth],
    pred: &[ScanPredictions],
    k: usize,
    class_sensitive: bool,
) -> RelationAccuracy {
    let mut correct = 0usize;
    let mut induced_error = 0usize;
    let mut total = 0usize;

    for (scan_gt, scan_pred) in gt.iter().zip(pred.iter()) {
        for gt_rel in &scan_gt.relations {
            total += 1;
            let Some(pair) = find_pair(scan_pred, gt_rel) else {
                continue;
            };
            if !top_k_predicate_hit(pair, gt_rel.triple.predicate, k) {
                continue;
            }
            if !class_sensitive || object_classes_correct(pair, gt_rel) {
                correct += 1;
            } else {
                induced_error += 1;
            }
        }
    }

    if total == 0 {
        return RelationAccuracy::default();
    }
    RelationAccuracy {
        top_k_accuracy: correct as f64 / total as f64,
        obj_cls_induced_error: induced_error as f64 / total as f64,
        total_gt: total,
    }
}

/// Top-K relation accuracy restricted to confidently-predicted triples.
///
/// Only ground-truth triples whose predicted probability for the *correct*
/// predicate exceeds `p` enter the denominator; the numerator counts those
/// that are also correct under the same matching as
/// [`top_k_relation_accuracy`]. Measures accuracy among confident
/// predictions only. Yields 0.0 when no triple clears the threshold.
pub fn low_p_relation_accuracy(
    gt: &[ScanGroundTruth],
    pred: &[ScanPredictions],
    k: usize,
    p: f64,
    class_sensitive: bool,
) -> f64 {
    let mut correct = 0usize;
    let mut total = 0usize;

    for (scan_gt, scan_pred) in gt.iter().zip(pred.iter()) {
        for gt_rel in &scan_gt.relations {
            let Some(pair) = find_pair(scan_pred, gt_rel) else {
                continue;
            };
            let predicate = gt_rel.triple.predicate;
            if pair.predicate_probs.get(predicate).copied().unwrap_or(0.0) <= p {
                continue;
            }
            total += 1;
            if top_k_predicate_hit(pair, predicate, k)
                && (!class_sensitive || object_classes_correct(pair, gt_rel))
            {
                correct += 1;
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64
}
