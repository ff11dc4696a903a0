//! Confidence score thresholding utilities.
//!
//! Scores in this crate are post-softmax probabilities, so thresholds live in
//! [0.0, 1.0] and the low-probability knob `P` reads as a probability floor.

use crate::error::{Result, SggEvalError};
use crate::types::{ScanPredictions, ScoredRelation};

/// Filter ranked predictions by confidence score threshold.
///
/// Returns a new vector containing only predictions with score >= threshold;
/// the descending-score order of the input is preserved.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use sgg_eval::threshold::filter_by_confidence;
/// use sgg_eval::types::{RelationTriple, ScoredRelation};
///
/// let ranked = vec![
///     ScoredRelation {
///         triple: RelationTriple::new(0, 5, 1),
///         subject_class: 0,
///         object_class: 0,
///         score: 0.9,
///     },
///     ScoredRelation {
///         triple: RelationTriple::new(1, 2, 0),
///         subject_class: 0,
///         object_class: 0,
///         score: 0.3,
///     },
/// ];
///
/// let filtered = filter_by_confidence(&ranked, 0.5).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(ranked: &[ScoredRelation], threshold: f64) -> Result<Vec<ScoredRelation>> {
    validate_threshold(threshold)?;

    Ok(ranked
        .iter()
        .filter(|rel| rel.score >= threshold)
        .cloned()
        .collect())
}

/// Filter a scan's prediction set by confidence threshold.
///
/// Only the ranked set is filtered; the per-pair predicate distributions are
/// kept intact since per-pair top-K matching is rank-based, not
/// threshold-based.
pub fn filter_scan_by_confidence(preds: &ScanPredictions, threshold: f64) -> Result<ScanPredictions> {
    let ranked = filter_by_confidence(&preds.ranked, threshold)?;

    Ok(ScanPredictions { ranked, pairs: preds.pairs.clone() })
}

/// Generate a range of threshold values for evaluation sweeps.
///
/// # Example
///
/// ```
/// use sgg_eval::threshold::generate_threshold_range;
///
/// let thresholds = generate_threshold_range(0.0, 1.0, 11).unwrap();
/// assert_eq!(thresholds.len(), 11);
/// assert_eq!(thresholds[0], 0.0);
/// assert_eq!(thresholds[10], 1.0);
/// ```
pub fn generate_threshold_range(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(SggEvalError::InvalidThreshold(
            "Number of steps must be greater than 0".to_string(),
        ));
    }

    validate_threshold(start)?;
    validate_threshold(end)?;

    if start > end {
        return Err(SggEvalError::InvalidThreshold(format!(
            "Start threshold ({}) must be <= end threshold ({})",
            start, end
        )));
    }

    if steps == 1 {
        return Ok(vec![start]);
    }

    let step_size = (end - start) / (steps - 1) as f64;
    Ok((0..steps).map(|i| start + step_size * i as f64).collect())
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(SggEvalError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RelationTriple;

    fn scored(score: f64) -> ScoredRelation {
        ScoredRelation {
            triple: RelationTriple::new(0, 1, 1),
            subject_class: 0,
            object_class: 0,
            score,
        }
    }

    #[test]
    fn test_filter_by_confidence() {
        let ranked = vec![scored(0.9), scored(0.3)];
        let filtered = filter_by_confidence(&ranked, 0.5).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].score, 0.9);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(filter_by_confidence(&[], 1.5).is_err());
        assert!(filter_by_confidence(&[], -0.1).is_err());
    }

    #[test]
    fn test_filter_scan_keeps_pair_view() {
        let preds = ScanPredictions {
            ranked: vec![scored(0.9), scored(0.1)],
            pairs: vec![],
        };
        let filtered = filter_scan_by_confidence(&preds, 0.5).unwrap();
        assert_eq!(filtered.ranked.len(), 1);
    }

    #[test]
    fn test_generate_threshold_range() {
        let thresholds = generate_threshold_range(0.0, 1.0, 11).unwrap();
        assert_eq!(thresholds.len(), 11);
        assert!((thresholds[0] - 0.0).abs() < 1e-10);
        assert!((thresholds[10] - 1.0).abs() < 1e-10);
        assert!((thresholds[5] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_generate_threshold_range_degenerate() {
        assert!(generate_threshold_range(0.0, 1.0, 0).is_err());
        assert!(generate_threshold_range(0.8, 0.2, 5).is_err());
        assert_eq!(generate_threshold_range(0.4, 0.9, 1).unwrap(), vec![0.4]);
    }
}
