//! Core data types for scene-graph relation evaluation.

use serde::{Deserialize, Serialize};

/// Predicate class id reserved for "no relation" / background.
///
/// Background-labeled pairs never enter a positive ground-truth set and
/// background predictions are never emitted into a ranked prediction set.
pub const BACKGROUND_PREDICATE: usize = 0;

/// A (subject, predicate, object) relation between two detected objects.
///
/// Subject and object are indices into the scan's detected-object list;
/// the predicate is an integer category id with 0 reserved for background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationTriple {
    pub subject: usize,
    pub predicate: usize,
    pub object: usize,
}

impl RelationTriple {
    pub fn new(subject: usize, predicate: usize, object: usize) -> Self {
        Self { subject, predicate, object }
    }

    /// Check whether the predicate is a positive (non-background) relation.
    pub fn is_positive(&self) -> bool {
        self.predicate != BACKGROUND_PREDICATE
    }
}

/// A ground-truth relation: the triple plus the true class ids of the
/// subject and object, taken from the scan's object labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GtRelation {
    pub triple: RelationTriple,
    pub subject_class: usize,
    pub object_class: usize,
}

/// Per-candidate-pair prediction state retained for top-K predicate matching.
///
/// Unlike [`ScoredRelation`], which keeps only the argmax predicate, this
/// carries the full post-softmax predicate distribution for the pair so that
/// "is the true predicate among the K most confident?" stays answerable.
#[derive(Debug, Clone, PartialEq)]
pub struct PairPrediction {
    pub subject: usize,
    pub object: usize,
    /// Predicted subject class (argmax of the subject's refined logits).
    pub subject_class: usize,
    /// Predicted object class (argmax of the object's refined logits).
    pub object_class: usize,
    /// Post-softmax probability per predicate class (index 0 = background).
    pub predicate_probs: Vec<f64>,
}

/// A single entry of a scan's confidence-ranked prediction set.
///
/// The score is the post-softmax probability of the selected predicate, so
/// all scores live in [0, 1] and confidence thresholds read as probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRelation {
    pub triple: RelationTriple,
    pub subject_class: usize,
    pub object_class: usize,
    pub score: f64,
}

/// Normalized ground truth for one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanGroundTruth {
    /// Positive (non-background) relations in candidate-pair order.
    pub relations: Vec<GtRelation>,
    /// Total candidate pairs in the scan, background-labeled pairs included.
    pub num_pairs: usize,
}

impl ScanGroundTruth {
    /// A scan with no positive relation is degenerate for recall purposes:
    /// it contributes a literal 0 to per-scan arrays but must be excluded
    /// from any mean that divides by ground-truth count.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }
}

/// Normalized predictions for one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPredictions {
    /// Non-background predictions sorted by score descending.
    ///
    /// The sort is stable: equal scores keep their candidate-pair order.
    pub ranked: Vec<ScoredRelation>,
    /// One entry per candidate pair, in the original pair order.
    pub pairs: Vec<PairPrediction>,
}

impl ScanPredictions {
    /// The top-K slice of the global ranking used for Recall@K.
    pub fn top_k(&self, k: usize) -> &[ScoredRelation] {
        &self.ranked[..k.min(self.ranked.len())]
    }
}

/// Raw model outputs for one batch, as parallel per-scan sequences.
///
/// This is what the detector/extractor hands to the metric engine each batch
/// and also the on-disk JSON dump format consumed by [`crate::loader`]:
///
/// - `relation_logits[s]`: candidate_pairs × predicate_classes
/// - `refine_logits[s]`: objects × object_classes
/// - `relation_labels[s]`: candidate_pairs (0 = background)
/// - `object_labels[s]`: objects
/// - `pair_indices[s]`: candidate_pairs × (subject_index, object_index)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalBatch {
    pub relation_logits: Vec<Vec<Vec<f64>>>,
    pub refine_logits: Vec<Vec<Vec<f64>>>,
    pub relation_labels: Vec<Vec<usize>>,
    pub object_labels: Vec<Vec<usize>>,
    pub pair_indices: Vec<Vec<(usize, usize)>>,
}

impl EvalBatch {
    /// Number of scans in the batch, taken from the relation labels.
    pub fn num_scans(&self) -> usize {
        self.relation_labels.len()
    }

    /// Candidate-pair count per scan, as measured off the raw label arrays.
    pub fn pairs_per_scan(&self) -> Vec<usize> {
        self.relation_labels.iter().map(|scan| scan.len()).collect()
    }

    /// Prediction-row count per scan, as measured off the relation logits.
    pub fn preds_per_scan(&self) -> Vec<usize> {
        self.relation_logits.iter().map(|scan| scan.len()).collect()
    }
}

/// Metric values computed for a single batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_index: usize,
    /// Per-scan Recall@K, in scan order (0.0 placeholder for zero-GT scans).
    pub recall_k: Vec<f64>,
    /// Per-scan mean-Recall@K, in scan order.
    pub mean_recall_k: Vec<f64>,
    pub top_k_rel_accuracy: f64,
    pub low_p_rel_accuracy: f64,
    /// `None` when object-classification metrics are gated off.
    pub obj_cls_accuracy: Option<f64>,
    pub obj_cls_induced_error: Option<f64>,
    pub total_objects: usize,
    pub num_scans: usize,
    pub degenerate_scans: usize,
}

/// Epoch-level aggregate metrics.
///
/// A fixed record of named fields; every mean excludes degenerate
/// (zero-ground-truth) scans from its denominator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub recall_k: f64,
    pub mean_recall_k: f64,
    /// Dataset-level mean recall: per-predicate-class recall pooled across
    /// all scans, averaged uniformly over classes with at least one GT.
    pub dataset_mean_recall_k: f64,
    pub top_k_rel_accuracy: f64,
    pub low_p_rel_accuracy: f64,
    pub obj_cls_accuracy: Option<f64>,
    pub obj_cls_induced_error: Option<f64>,
    pub total_scans: usize,
    pub degenerate_scans: usize,
    pub total_objects: usize,
}
