//! Per-scan Recall@K calculation.

use crate::matching::{recall_matches, TripleMatch};
use crate::types::{ScanGroundTruth, ScanPredictions};

/// Recall@K for one scan: recalled ground-truth triples / total ground-truth
/// triples, with matching restricted to the top `k` entries of the scan's
/// global prediction ranking.
///
/// A scan with zero ground-truth triples yields 0.0 so per-scan arrays stay
/// parallel to the batch; callers computing means must exclude such scans
/// (see [`ScanGroundTruth::is_empty`]), not average the placeholder in.
///
/// # Example
///
/// ```
/// use sgg_eval::metrics::scan_recall_at_k;
/// use sgg_eval::types::*;
///
/// let gt = ScanGroundTruth {
///     relations: vec![GtRelation {
///         triple: RelationTriple::new(0, 5, 1),
///         subject_class: 0,
///         object_class: 0,
///     }],
///     num_pairs: 1,
/// };
/// let preds = ScanPredictions {
///     ranked: vec![ScoredRelation {
///         triple: RelationTriple::new(0, 5, 1),
///         subject_class: 0,
///         object_class: 0,
///         score: 0.9,
///     }],
///     pairs: vec![],
/// };
/// assert_eq!(scan_recall_at_k(&gt, &preds, 50), 1.0);
/// ```
pub fn scan_recall_at_k(gt: &ScanGroundTruth, preds: &ScanPredictions, k: usize) -> f64 {
    if gt.is_empty() {
        return 0.0;
    }
    let outcomes = recall_matches(gt, preds, k);
    recall_from_matches(&outcomes, gt.len())
}

/// Recall from already-computed match outcomes.
pub fn recall_from_matches(outcomes: &[TripleMatch], num_gt: usize) -> f64 {
    if num_gt == 0 {
        return 0.0;
    }
    let recalled = outcomes.iter().filter(|m| m.matched).count();
    recalled as f64 / num_gt as f64
}
