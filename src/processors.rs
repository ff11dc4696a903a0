//! Stateful per-batch metric accumulators.
//!
//! Both processors follow the same lifecycle: constructed once per
//! evaluation run with their `(K, P)` configuration, `step()`-ed once per
//! batch with parsed ground-truth/prediction sets, queried through
//! `compute*` calls (read-only), and `reset()` between batches. A `compute*`
//! call before any `step()` is a programmer error and fails with
//! [`SggEvalError::NotStepped`] rather than returning zeros. A second
//! `step()` without `reset()` replaces the stored batch; it never
//! accumulates. `reset()` clears batch state but keeps `K` and `P`.
//!
//! Not designed for concurrent access: all mutation goes through `&mut self`
//! on the single evaluation thread.

use crate::error::{Result, SggEvalError};
use crate::metrics::{
    low_p_relation_accuracy, object_cls_accuracy, scan_mean_recall_at_k, scan_recall_at_k,
    top_k_relation_accuracy, RelationAccuracy,
};
use crate::types::{ScanGroundTruth, ScanPredictions};

/// Fixed-topK / low-probability relation accuracy accumulator.
///
/// `K` (default 3) bounds the per-pair predicate ranking consulted for a
/// match; `P` (default 0.2) is the probability floor for the
/// confident-predictions-only accuracy variant.
#[derive(Debug, Clone)]
pub struct BatchMetricProcessor {
    k: usize,
    p: f64,
    class_sensitive: bool,
    batch: Option<(Vec<ScanGroundTruth>, Vec<ScanPredictions>)>,
}

impl BatchMetricProcessor {
    pub fn new(k: usize, p: f64) -> Self {
        Self { k, p, class_sensitive: true, batch: None }
    }

    /// Disable (or re-enable) subject/object class correctness in matching.
    /// Used when object-classification metrics are gated off entirely.
    pub fn with_class_sensitivity(mut self, class_sensitive: bool) -> Self {
        self.class_sensitive = class_sensitive;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    /// Record a parsed batch for subsequent `compute*` calls.
    ///
    /// Replaces any previously stepped batch.
    pub fn step(
        &mut self,
        per_batch_gt: Vec<ScanGroundTruth>,
        per_batch_pred: Vec<ScanPredictions>,
    ) -> Result<()> {
        if per_batch_gt.len() != per_batch_pred.len() {
            return Err(SggEvalError::ShapeMismatch(format!(
                "{} ground-truth scans but {} prediction scans",
                per_batch_gt.len(),
                per_batch_pred.len()
            )));
        }
        self.batch = Some((per_batch_gt, per_batch_pred));
        Ok(())
    }

    fn stepped(&self) -> Result<&(Vec<ScanGroundTruth>, Vec<ScanPredictions>)> {
        self.batch.as_ref().ok_or_else(|| {
            SggEvalError::NotStepped("BatchMetricProcessor::compute* called before step()".into())
        })
    }

    /// Batch-level object classification accuracy and total object count.
    pub fn compute_obj_cls_accuracy(
        &self,
        obj_logits: &[Vec<Vec<f64>>],
        obj_labels: &[Vec<usize>],
    ) -> Result<(f64, usize)> {
        self.stepped()?;
        object_cls_accuracy(obj_logits, obj_labels)
    }

    /// Top-K relation accuracy plus the object-classification-induced error
    /// rate, over all ground-truth triples in the stepped batch.
    pub fn compute_top_k_rel_accuracy(&self) -> Result<RelationAccuracy> {
        let (gt, pred) = self.stepped()?;
        Ok(top_k_relation_accuracy(gt, pred, self.k, self.class_sensitive))
    }

    /// Top-K relation accuracy restricted to triples whose correct-predicate
    /// probability exceeds `P`.
    pub fn compute_low_p_rel_accuracy(&self) -> Result<f64> {
        let (gt, pred) = self.stepped()?;
        Ok(low_p_relation_accuracy(gt, pred, self.k, self.p, self.class_sensitive))
    }

    /// Clear batch-scoped state. `K` and `P` persist.
    pub fn reset(&mut self) {
        self.batch = None;
    }
}

struct RecallBatch {
    gt: Vec<ScanGroundTruth>,
    pred: Vec<ScanPredictions>,
}

/// Ranked Recall@K / mean-Recall@K accumulator.
///
/// `K` (default 100) is the rank cutoff into each scan's global prediction
/// ranking. `P` is unused here; it is accepted and kept so both processors
/// share one configuration shape.
pub struct RecallKProcessor {
    k: usize,
    p: f64,
    batch: Option<RecallBatch>,
}

impl RecallKProcessor {
    pub fn new(k: usize, p: f64) -> Self {
        Self { k, p, batch: None }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    /// Record a parsed batch plus the per-scan sizes measured off the raw
    /// tensors. Replaces any previously stepped batch.
    ///
    /// The size vectors cross-check the parsed sets: `num_gt_per_scan` must
    /// equal each scan's candidate-pair count and `num_pred_per_scan` its
    /// prediction-row count.
    pub fn step(
        &mut self,
        per_batch_gt: Vec<ScanGroundTruth>,
        per_batch_pred: Vec<ScanPredictions>,
        num_gt_per_scan: &[usize],
        num_pred_per_scan: &[usize],
    ) -> Result<()> {
        if per_batch_gt.len() != per_batch_pred.len()
            || per_batch_gt.len() != num_gt_per_scan.len()
            || per_batch_gt.len() != num_pred_per_scan.len()
        {
            return Err(SggEvalError::ShapeMismatch(format!(
                "scan counts disagree: {} gt, {} pred, {} gt sizes, {} pred sizes",
                per_batch_gt.len(),
                per_batch_pred.len(),
                num_gt_per_scan.len(),
                num_pred_per_scan.len()
            )));
        }
        for (scan_idx, (gt, &num_gt)) in per_batch_gt.iter().zip(num_gt_per_scan.iter()).enumerate()
        {
            if gt.num_pairs != num_gt {
                return Err(SggEvalError::ShapeMismatch(format!(
                    "scan {}: parsed {} candidate pairs but {} reported",
                    scan_idx, gt.num_pairs, num_gt
                )));
            }
        }
        for (scan_idx, (pred, &num_pred)) in
            per_batch_pred.iter().zip(num_pred_per_scan.iter()).enumerate()
        {
            if pred.pairs.len() != num_pred {
                return Err(SggEvalError::ShapeMismatch(format!(
                    "scan {}: parsed {} prediction rows but {} reported",
                    scan_idx,
                    pred.pairs.len(),
                    num_pred
                )));
            }
        }

        self.batch = Some(RecallBatch { gt: per_batch_gt, pred: per_batch_pred });
        Ok(())
    }

    fn stepped(&self) -> Result<&RecallBatch> {
        self.batch.as_ref().ok_or_else(|| {
            SggEvalError::NotStepped("RecallKProcessor::compute* called before step()".into())
        })
    }

    /// Per-scan Recall@K for the stepped batch, in scan order.
    ///
    /// Zero-ground-truth scans carry a literal 0.0 so the output stays
    /// parallel to the batch; they must be excluded from any mean (the
    /// stepped [`ScanGroundTruth::is_empty`] flags identify them).
    pub fn compute_recall_k(&self) -> Result<Vec<f64>> {
        let batch = self.stepped()?;
        Ok(batch
            .gt
            .iter()
            .zip(batch.pred.iter())
            .map(|(gt, pred)| scan_recall_at_k(gt, pred, self.k))
            .collect())
    }

    /// Per-scan mean-Recall@K (per-predicate-class recall averaged uniformly
    /// within each scan), in scan order. Same zero-GT placeholder policy as
    /// [`Self::compute_recall_k`].
    pub fn compute_mean_recall_k(&self) -> Result<Vec<f64>> {
        let batch = self.stepped()?;
        Ok(batch
            .gt
            .iter()
            .zip(batch.pred.iter())
            .map(|(gt, pred)| scan_mean_recall_at_k(gt, pred, self.k))
            .collect())
    }

    /// Which scans of the stepped batch have zero ground-truth triples.
    pub fn degenerate_scans(&self) -> Result<Vec<bool>> {
        let batch = self.stepped()?;
        Ok(batch.gt.iter().map(|gt| gt.is_empty()).collect())
    }

    /// Borrow the stepped sets, e.g. for dataset-level per-class pooling.
    pub fn stepped_batch(&self) -> Result<(&[ScanGroundTruth], &[ScanPredictions])> {
        let batch = self.stepped()?;
        Ok((&batch.gt, &batch.pred))
    }

    /// Clear batch-scoped state. `K` and `P` persist.
    pub fn reset(&mut self) {
        self.batch = None;
    }
}
