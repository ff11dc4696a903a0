//! Parsers that normalize raw per-scan model outputs into ground-truth and
//! prediction sets.
//!
//! Both parsers take parallel per-scan sequences (one entry per scan in the
//! batch) and validate their shapes up front: scan-count or pair-count
//! disagreements are contract violations and fail the whole batch rather than
//! silently truncating.

use crate::error::{Result, SggEvalError};
use crate::types::{
    GtRelation, PairPrediction, RelationTriple, ScanGroundTruth, ScanPredictions, ScoredRelation,
    BACKGROUND_PREDICATE,
};

/// Parse per-scan ground-truth relation sets from raw label arrays.
///
/// For each candidate pair (in the given index order) with a non-background
/// predicate label, emits a [`GtRelation`] carrying the pair's subject/object
/// indices and the true object classes. Background-labeled pairs are dropped
/// from the positive set; their existence survives as
/// [`ScanGroundTruth::num_pairs`].
///
/// # Arguments
///
/// * `relation_labels` - Per scan: true predicate id per candidate pair (0 = background)
/// * `object_labels` - Per scan: true class id per detected object
/// * `pair_indices` - Per scan: (subject_index, object_index) per candidate pair
///
/// # Errors
///
/// Returns `ShapeMismatch` if the three sequences disagree on scan count, a
/// scan's label count disagrees with its pair count, or a pair references an
/// object index outside the scan's object list.
pub fn parse_gt(
    relation_labels: &[Vec<usize>],
    object_labels: &[Vec<usize>],
    pair_indices: &[Vec<(usize, usize)>],
) -> Result<Vec<ScanGroundTruth>> {
    if relation_labels.len() != object_labels.len() || relation_labels.len() != pair_indices.len() {
        return Err(SggEvalError::ShapeMismatch(format!(
            "scan counts disagree: {} relation label scans, {} object label scans, {} pair index scans",
            relation_labels.len(),
            object_labels.len(),
            pair_indices.len()
        )));
    }

    let mut parsed = Vec::with_capacity(relation_labels.len());

    for (scan_idx, ((labels, obj_labels), pairs)) in relation_labels
        .iter()
        .zip(object_labels.iter())
        .zip(pair_indices.iter())
        .enumerate()
    {
        if labels.len() != pairs.len() {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan {}: {} relation labels but {} candidate pairs",
                scan_idx,
                labels.len(),
                pairs.len()
            )));
        }

        let mut relations = Vec::new();
        for (&predicate, &(subject, object)) in labels.iter().zip(pairs.iter()) {
            if subject >= obj_labels.len() || object >= obj_labels.len() {
                return Err(SggEvalError::ShapeMismatch(format!(
                    "scan {}: pair ({}, {}) references objects outside 0..{}",
                    scan_idx,
                    subject,
                    object,
                    obj_labels.len()
                )));
            }
            if predicate == BACKGROUND_PREDICATE {
                continue;
            }
            relations.push(GtRelation {
                triple: RelationTriple::new(subject, predicate, object),
                subject_class: obj_labels[subject],
                object_class: obj_labels[object],
            });
        }

        parsed.push(ScanGroundTruth { relations, num_pairs: pairs.len() });
    }

    Ok(parsed)
}

/// Parse per-scan prediction sets from raw logits.
///
/// Per candidate pair: the predicate is the argmax of the pair's predicate
/// logits, the subject/object classes are the argmax of the corresponding
/// object's refined logits, and the score is the post-softmax probability of
/// the selected predicate. Pairs whose argmax lands on the background class
/// are kept in the per-pair view (for top-K predicate matching) but excluded
/// from the ranked set, since a background prediction can never match a
/// positive ground-truth triple.
///
/// The ranked set is sorted by score descending with a stable sort, so equal
/// scores keep their original candidate-pair order.
///
/// # Errors
///
/// Returns `ShapeMismatch` if scan counts disagree, a scan's logit row count
/// disagrees with its pair count, a predicate logit row is empty, or a pair
/// references an object without refined logits.
pub fn parse_pred(
    relation_logits: &[Vec<Vec<f64>>],
    refine_logits: &[Vec<Vec<f64>>],
    pair_indices: &[Vec<(usize, usize)>],
) -> Result<Vec<ScanPredictions>> {
    if relation_logits.len() != refine_logits.len() || relation_logits.len() != pair_indices.len() {
        return Err(SggEvalError::ShapeMismatch(format!(
            "scan counts disagree: {} relation logit scans, {} refine logit scans, {} pair index scans",
            relation_logits.len(),
            refine_logits.len(),
            pair_indices.len()
        )));
    }

    let mut parsed = Vec::with_capacity(relation_logits.len());

    for (scan_idx, ((rel_logits, obj_logits), pairs)) in relation_logits
        .iter()
        .zip(refine_logits.iter())
        .zip(pair_indices.iter())
        .enumerate()
    {
        if rel_logits.len() != pairs.len() {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan {}: {} relation logit rows but {} candidate pairs",
                scan_idx,
                rel_logits.len(),
                pairs.len()
            )));
        }

        let mut pair_preds = Vec::with_capacity(pairs.len());
        let mut ranked = Vec::new();

        for (logits, &(subject, object)) in rel_logits.iter().zip(pairs.iter()) {
            if logits.is_empty() {
                return Err(SggEvalError::ShapeMismatch(format!(
                    "scan {}: empty predicate logit row",
                    scan_idx
                )));
            }
            if subject >= obj_logits.len() || object >= obj_logits.len() {
                return Err(SggEvalError::ShapeMismatch(format!(
                    "scan {}: pair ({}, {}) references objects outside 0..{}",
                    scan_idx,
                    subject,
                    object,
                    obj_logits.len()
                )));
            }

            let probs = softmax(logits);
            let predicate = argmax(&probs);
            let subject_class = argmax(&obj_logits[subject]);
            let object_class = argmax(&obj_logits[object]);

            if predicate != BACKGROUND_PREDICATE {
                ranked.push(ScoredRelation {
                    triple: RelationTriple::new(subject, predicate, object),
                    subject_class,
                    object_class,
                    score: probs[predicate],
                });
            }

            pair_preds.push(PairPrediction {
                subject,
                object,
                subject_class,
                object_class,
                predicate_probs: probs,
            });
        }

        // Stable sort: ties keep original candidate-pair order.
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        parsed.push(ScanPredictions { ranked, pairs: pair_preds });
    }

    Ok(parsed)
}

/// Numerically-stable softmax over a logit vector.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// Index of the maximum value; first index wins on ties. Empty input yields 0.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gt_drops_background() {
        let relation_labels = vec![vec![0, 5, 0, 7]];
        let object_labels = vec![vec![10, 11, 12, 13]];
        let pair_indices = vec![vec![(0, 1), (0, 1), (2, 3), (2, 3)]];

        let gt = parse_gt(&relation_labels, &object_labels, &pair_indices).unwrap();
        assert_eq!(gt.len(), 1);
        assert_eq!(gt[0].len(), 2);
        assert_eq!(gt[0].num_pairs, 4);
        assert_eq!(gt[0].relations[0].triple, RelationTriple::new(0, 5, 1));
        assert_eq!(gt[0].relations[0].subject_class, 10);
        assert_eq!(gt[0].relations[0].object_class, 11);
        assert_eq!(gt[0].relations[1].triple, RelationTriple::new(2, 7, 3));
        assert!(gt[0].relations.iter().all(|r| r.triple.is_positive()));
    }

    #[test]
    fn test_parse_gt_scan_count_mismatch() {
        let result = parse_gt(&[vec![1]], &[], &[vec![(0, 1)]]);
        assert!(matches!(result, Err(SggEvalError::ShapeMismatch(_))));
    }

    #[test]
    fn test_parse_gt_pair_count_mismatch() {
        let result = parse_gt(&[vec![1, 2]], &[vec![0, 0]], &[vec![(0, 1)]]);
        assert!(matches!(result, Err(SggEvalError::ShapeMismatch(_))));
    }

    #[test]
    fn test_parse_gt_pair_index_out_of_range() {
        let result = parse_gt(&[vec![1]], &[vec![0]], &[vec![(0, 5)]]);
        assert!(matches!(result, Err(SggEvalError::ShapeMismatch(_))));
    }

    #[test]
    fn test_parse_pred_ranking_descending() {
        // Pair 0 strongly predicts predicate 2, pair 1 weakly predicts 1.
        let relation_logits = vec![vec![
            vec![0.0, 0.0, 4.0],
            vec![0.0, 1.0, 0.0],
        ]];
        let refine_logits = vec![vec![vec![1.0, 0.0], vec![0.0, 1.0]]];
        let pair_indices = vec![vec![(0, 1), (1, 0)]];

        let pred = parse_pred(&relation_logits, &refine_logits, &pair_indices).unwrap();
        assert_eq!(pred[0].ranked.len(), 2);
        assert!(pred[0].ranked[0].score >= pred[0].ranked[1].score);
        assert_eq!(pred[0].ranked[0].triple, RelationTriple::new(0, 2, 1));
        assert_eq!(pred[0].ranked[0].subject_class, 0);
        assert_eq!(pred[0].ranked[0].object_class, 1);
        assert_eq!(pred[0].pairs.len(), 2);
    }

    #[test]
    fn test_parse_pred_excludes_background_argmax() {
        let relation_logits = vec![vec![vec![5.0, 0.0, 0.0]]];
        let refine_logits = vec![vec![vec![1.0], vec![1.0]]];
        let pair_indices = vec![vec![(0, 1)]];

        let pred = parse_pred(&relation_logits, &refine_logits, &pair_indices).unwrap();
        assert!(pred[0].ranked.is_empty());
        // The per-pair distribution survives for top-K predicate matching.
        assert_eq!(pred[0].pairs.len(), 1);
    }

    #[test]
    fn test_parse_pred_stable_tie_order() {
        // Two identical logit rows: ranked order must keep pair order.
        let relation_logits = vec![vec![
            vec![0.0, 3.0],
            vec![0.0, 3.0],
        ]];
        let refine_logits = vec![vec![vec![1.0], vec![1.0], vec![1.0]]];
        let pair_indices = vec![vec![(0, 1), (1, 2)]];

        let pred = parse_pred(&relation_logits, &refine_logits, &pair_indices).unwrap();
        assert_eq!(pred[0].ranked[0].triple.subject, 0);
        assert_eq!(pred[0].ranked[1].triple.subject, 1);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_argmax_first_tie_wins() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
    }
}
