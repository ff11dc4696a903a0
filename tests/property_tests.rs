//! Property-based tests using proptest
//!
//! These tests verify mathematical properties and invariants that should
//! always hold regardless of the input values.

use proptest::prelude::*;
use sgg_eval::metrics::{scan_mean_recall_at_k, scan_recall_at_k};
use sgg_eval::parsing::{parse_gt, parse_pred, softmax};
use sgg_eval::types::{GtRelation, RelationTriple, ScanGroundTruth, ScanPredictions, ScoredRelation};

/// Strategy: one scan's worth of raw arrays with consistent shapes.
///
/// Produces (relation_logits, refine_logits, relation_labels, object_labels,
/// pair_indices) for a scan with 2..=5 objects, 0..=8 candidate pairs,
/// 2..=5 predicate classes and 2..=4 object classes.
fn scan_arrays() -> impl Strategy<
    Value = (
        Vec<Vec<f64>>,
        Vec<Vec<f64>>,
        Vec<usize>,
        Vec<usize>,
        Vec<(usize, usize)>,
    ),
> {
    (2usize..=5, 2usize..=5, 2usize..=4, 0usize..=8).prop_flat_map(
        |(num_objects, num_predicates, num_obj_classes, num_pairs)| {
            let logit = -5.0f64..5.0;
            (
                prop::collection::vec(
                    prop::collection::vec(logit.clone(), num_predicates),
                    num_pairs,
                ),
                prop::collection::vec(
                    prop::collection::vec(logit, num_obj_classes),
                    num_objects,
                ),
                prop::collection::vec(0usize..num_predicates, num_pairs),
                prop::collection::vec(0usize..num_obj_classes, num_objects),
                prop::collection::vec((0usize..num_objects, 0usize..num_objects), num_pairs),
            )
        },
    )
}

proptest! {
    #[test]
    fn prop_gt_size_matches_positive_labels(
        (rel_logits, refine_logits, labels, obj_labels, pairs) in scan_arrays()
    ) {
        let _ = rel_logits;
        let _ = refine_logits;
        let positives = labels.iter().filter(|&&l| l != 0).count();
        let gt = parse_gt(
            &[labels.clone()],
            &[obj_labels.clone()],
            &[pairs.clone()],
        ).unwrap();

        prop_assert_eq!(gt[0].len(), positives);
        prop_assert_eq!(gt[0].num_pairs, pairs.len());
        prop_assert!(gt[0].relations.iter().all(|r| r.triple.is_positive()));
    }

    #[test]
    fn prop_ranking_non_increasing(
        (rel_logits, refine_logits, _labels, _obj_labels, pairs) in scan_arrays()
    ) {
        let pred = parse_pred(
            &[rel_logits],
            &[refine_logits],
            &[pairs],
        ).unwrap();

        for window in pred[0].ranked.windows(2) {
            prop_assert!(window[0].score >= window[1].score,
                "ranking not non-increasing: {} < {}", window[0].score, window[1].score);
        }
        for rel in &pred[0].ranked {
            prop_assert!(rel.triple.is_positive());
            prop_assert!((0.0..=1.0).contains(&rel.score));
        }
    }

    #[test]
    fn prop_recall_in_unit_range_and_monotone_in_k(
        (rel_logits, refine_logits, labels, obj_labels, pairs) in scan_arrays()
    ) {
        let gt = parse_gt(&[labels], &[obj_labels], &[pairs.clone()]).unwrap();
        let pred = parse_pred(&[rel_logits], &[refine_logits], &[pairs]).unwrap();

        let mut prev = 0.0;
        for k in 0..=10 {
            let r = scan_recall_at_k(&gt[0], &pred[0], k);
            prop_assert!((0.0..=1.0).contains(&r));
            prop_assert!(r >= prev, "recall decreased from {} to {} at k={}", prev, r, k);
            prev = r;
        }
    }

    #[test]
    fn prop_mean_recall_in_unit_range(
        (rel_logits, refine_logits, labels, obj_labels, pairs) in scan_arrays()
    ) {
        let gt = parse_gt(&[labels], &[obj_labels], &[pairs.clone()]).unwrap();
        let pred = parse_pred(&[rel_logits], &[refine_logits], &[pairs]).unwrap();

        let mr = scan_mean_recall_at_k(&gt[0], &pred[0], 50);
        prop_assert!((0.0..=1.0).contains(&mr));
    }

    #[test]
    fn prop_mean_recall_equals_recall_for_single_class(
        num_triples in 1usize..6,
        matched_mask in prop::collection::vec(any::<bool>(), 6),
    ) {
        // Every GT triple shares one predicate class, so the class-wise mean
        // collapses to plain recall.
        let relations: Vec<GtRelation> = (0..num_triples)
            .map(|i| GtRelation {
                triple: RelationTriple::new(i, 3, i + 1),
                subject_class: 0,
                object_class: 0,
            })
            .collect();
        let gt = ScanGroundTruth { relations, num_pairs: num_triples };

        let ranked: Vec<ScoredRelation> = (0..num_triples)
            .filter(|&i| matched_mask[i])
            .map(|i| ScoredRelation {
                triple: RelationTriple::new(i, 3, i + 1),
                subject_class: 0,
                object_class: 0,
                score: 0.9,
            })
            .collect();
        let preds = ScanPredictions { ranked, pairs: vec![] };

        let r = scan_recall_at_k(&gt, &preds, 50);
        let mr = scan_mean_recall_at_k(&gt, &preds, 50);
        prop_assert!((r - mr).abs() < 1e-12);
    }

    #[test]
    fn prop_softmax_is_distribution(
        logits in prop::collection::vec(-20.0f64..20.0, 1..10)
    ) {
        let probs = softmax(&logits);
        let sum: f64 = probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        prop_assert!(probs.iter().all(|&p| p >= 0.0));
    }
}
