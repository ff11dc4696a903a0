//! Mean-Recall@K: per-predicate-class recall averaged uniformly over classes.
//!
//! The unweighted mean over classes prevents frequent predicates from
//! dominating the aggregate, which plain Recall@K is prone to.

use crate::matching::{recall_matches, TripleMatch};
use crate::types::{ScanGroundTruth, ScanPredictions};
use std::collections::BTreeMap;

/// Mean-Recall@K for one scan: the scan's ground-truth triples are grouped
/// by predicate class, per-class recall is computed within the top `k`
/// ranked predictions, and class recalls are averaged uniformly over the
/// classes present in the scan.
///
/// A zero-ground-truth scan yields 0.0 (same placeholder policy as
/// [`crate::metrics::scan_recall_at_k`]).
pub fn scan_mean_recall_at_k(gt: &ScanGroundTruth, preds: &ScanPredictions, k: usize) -> f64 {
    if gt.is_empty() {
        return 0.0;
    }
    let outcomes = recall_matches(gt, preds, k);

    let mut counts = ClassRecallCounts::new();
    counts.accumulate(gt, &outcomes);
    counts.mean_recall()
}

/// Per-predicate-class (recalled, total) counters.
///
/// Used per scan for scan-level mean recall and across a whole evaluation run
/// for the dataset-level variant. Classes with zero ground-truth occurrences
/// never enter the map and therefore never dilute the mean.
#[derive(Debug, Clone, Default)]
pub struct ClassRecallCounts {
    counts: BTreeMap<usize, (usize, usize)>,
}

impl ClassRecallCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one scan's match outcomes into the per-class counters.
    ///
    /// `outcomes` must be parallel to `gt.relations` (as produced by
    /// [`crate::matching::recall_matches`]).
    pub fn accumulate(&mut self, gt: &ScanGroundTruth, outcomes: &[TripleMatch]) {
        for (gt_rel, outcome) in gt.relations.iter().zip(outcomes.iter()) {
            let entry = self.counts.entry(gt_rel.triple.predicate).or_insert((0, 0));
            entry.1 += 1;
            if outcome.matched {
                entry.0 += 1;
            }
        }
    }

    /// Unweighted mean of per-class recalls over classes with at least one
    /// ground-truth occurrence. 0.0 when no class has been seen.
    pub fn mean_recall(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .counts
            .values()
            .map(|&(recalled, total)| recalled as f64 / total as f64)
            .sum();
        sum / self.counts.len() as f64
    }

    /// Number of predicate classes observed so far.
    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    /// Per-class recall values keyed by predicate class, ascending.
    pub fn per_class_recall(&self) -> Vec<(usize, f64)> {
        self.counts
            .iter()
            .map(|(&class, &(recalled, total))| (class, recalled as f64 / total as f64))
            .collect()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GtRelation, RelationTriple, ScoredRelation};

    fn gt_rel(s: usize, p: usize, o: usize) -> GtRelation {
        GtRelation {
            triple: RelationTriple::new(s, p, o),
            subject_class: 0,
            object_class: 0,
        }
    }

    fn scored(s: usize, p: usize, o: usize, score: f64) -> ScoredRelation {
        ScoredRelation {
            triple: RelationTriple::new(s, p, o),
            subject_class: 0,
            object_class: 0,
            score,
        }
    }

    #[test]
    fn test_mean_recall_unweighted_over_classes() {
        // Class 5: 2 triples, 1 recalled. Class 7: 1 triple, recalled.
        // Mean = (0.5 + 1.0) / 2, while plain recall would be 2/3.
        let gt = ScanGroundTruth {
            relations: vec![gt_rel(0, 5, 1), gt_rel(1, 5, 2), gt_rel(2, 7, 3)],
            num_pairs: 3,
        };
        let preds = ScanPredictions {
            ranked: vec![scored(0, 5, 1, 0.9), scored(2, 7, 3, 0.8)],
            pairs: vec![],
        };

        let mr = scan_mean_recall_at_k(&gt, &preds, 10);
        assert!((mr - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_mean_recall_equals_recall_when_uniform() {
        let gt = ScanGroundTruth {
            relations: vec![gt_rel(0, 5, 1), gt_rel(2, 7, 3)],
            num_pairs: 2,
        };
        let preds = ScanPredictions {
            ranked: vec![scored(0, 5, 1, 0.9), scored(2, 7, 3, 0.8)],
            pairs: vec![],
        };

        // Both classes fully recalled: mean recall == recall == 1.0.
        assert_eq!(scan_mean_recall_at_k(&gt, &preds, 10), 1.0);
    }

    #[test]
    fn test_mean_recall_bounds() {
        let gt = ScanGroundTruth {
            relations: vec![gt_rel(0, 5, 1)],
            num_pairs: 1,
        };
        let preds = ScanPredictions::default();
        let mr = scan_mean_recall_at_k(&gt, &preds, 10);
        assert!((0.0..=1.0).contains(&mr));
    }

    #[test]
    fn test_zero_gt_contributes_no_class_buckets() {
        let gt = ScanGroundTruth::default();
        let mut counts = ClassRecallCounts::new();
        counts.accumulate(&gt, &[]);
        assert_eq!(counts.num_classes(), 0);
        assert_eq!(counts.mean_recall(), 0.0);
    }

    #[test]
    fn test_dataset_level_accumulation() {
        let gt_a = ScanGroundTruth {
            relations: vec![gt_rel(0, 5, 1)],
            num_pairs: 1,
        };
        let preds_a = ScanPredictions {
            ranked: vec![scored(0, 5, 1, 0.9)],
            pairs: vec![],
        };
        let gt_b = ScanGroundTruth {
            relations: vec![gt_rel(0, 5, 1), gt_rel(1, 9, 2)],
            num_pairs: 2,
        };
        let preds_b = ScanPredictions::default();

        let mut counts = ClassRecallCounts::new();
        counts.accumulate(&gt_a, &recall_matches(&gt_a, &preds_a, 10));
        counts.accumulate(&gt_b, &recall_matches(&gt_b, &preds_b, 10));

        // Class 5: 1/2 recalled; class 9: 0/1. Mean = (0.5 + 0.0) / 2.
        assert_eq!(counts.num_classes(), 2);
        assert!((counts.mean_recall() - 0.25).abs() < 1e-12);
        assert_eq!(counts.per_class_recall(), vec![(5, 0.5), (9, 0.0)]);
    }
}
