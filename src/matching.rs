//! Matching of predicted relation triples against ground truth for a single
//! scan.
//!
//! Two matching policies are provided:
//!
//! - **Ranked-recall matching**: a ground-truth triple is recalled iff some
//!   prediction within the top-K entries of the scan's global ranking has an
//!   equal (subject, predicate, object) triple. The highest-ranked match
//!   wins and each prediction entry is consumed at most once, so multiple
//!   predictions for the same pair never double-count a ground-truth triple.
//! - **Per-pair top-K predicate matching**: a ground-truth triple counts as
//!   hit iff its predicate is among the K most confident non-background
//!   predicates for that exact ordered pair; a class-sensitive variant
//!   additionally requires the predicted subject/object classes to equal the
//!   true ones.

use crate::types::{GtRelation, PairPrediction, ScanGroundTruth, ScanPredictions, BACKGROUND_PREDICATE};
use std::collections::HashSet;

/// Outcome of matching one ground-truth triple against the ranked predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripleMatch {
    pub matched: bool,
    /// Rank (0-based, within the global ranking) of the matching prediction.
    pub rank: Option<usize>,
    /// Score of the matching prediction.
    pub score: Option<f64>,
}

impl TripleMatch {
    fn unmatched() -> Self {
        Self { matched: false, rank: None, score: None }
    }
}

/// Match every ground-truth triple of a scan against the top `k` entries of
/// its globally-ranked prediction set.
///
/// Returns one [`TripleMatch`] per ground-truth triple, in ground-truth
/// order. Iteration follows the ranking, so each triple records the rank of
/// its *best* (highest-ranked) matching prediction.
pub fn recall_matches(
    gt: &ScanGroundTruth,
    preds: &ScanPredictions,
    k: usize,
) -> Vec<TripleMatch> {
    let top_k = preds.top_k(k);
    let mut used_preds: HashSet<usize> = HashSet::new();
    let mut outcomes = vec![TripleMatch::unmatched(); gt.relations.len()];

    for (gt_idx, gt_rel) in gt.relations.iter().enumerate() {
        for (rank, pred) in top_k.iter().enumerate() {
            if used_preds.contains(&rank) {
                continue;
            }
            if pred.triple == gt_rel.triple {
                used_preds.insert(rank);
                outcomes[gt_idx] = TripleMatch {
                    matched: true,
                    rank: Some(rank),
                    score: Some(pred.score),
                };
                break;
            }
        }
    }

    outcomes
}

/// The `k` most confident non-background predicate classes for one pair,
/// most confident first. Ties keep ascending class order.
pub fn pair_top_k_predicates(pair: &PairPrediction, k: usize) -> Vec<usize> {
    let mut classes: Vec<usize> = (0..pair.predicate_probs.len())
        .filter(|&c| c != BACKGROUND_PREDICATE)
        .collect();
    classes.sort_by(|&a, &b| {
        pair.predicate_probs[b]
            .partial_cmp(&pair.predicate_probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    classes.truncate(k);
    classes
}

/// Find the prediction state for a ground-truth triple's exact ordered pair.
pub fn find_pair<'a>(preds: &'a ScanPredictions, gt_rel: &GtRelation) -> Option<&'a PairPrediction> {
    preds
        .pairs
        .iter()
        .find(|p| p.subject == gt_rel.triple.subject && p.object == gt_rel.triple.object)
}

/// Whether the true predicate is among the pair's top-`k` predicted
/// predicates (class-insensitive).
pub fn top_k_predicate_hit(pair: &PairPrediction, predicate: usize, k: usize) -> bool {
    pair_top_k_predicates(pair, k).contains(&predicate)
}

/// Whether the predicted subject/object classes agree with the true ones.
pub fn object_classes_correct(pair: &PairPrediction, gt_rel: &GtRelation) -> bool {
    pair.subject_class == gt_rel.subject_class && pair.object_class == gt_rel.object_class
}
