//! Epoch-level evaluation orchestrator.
//!
//! [`EpochEvaluator`] owns the two metric processors and drives the full
//! per-batch pipeline (parse, step, compute, reset), collecting per-batch
//! values into epoch-level aggregates. It is the crate-side counterpart of an
//! evaluation loop: the caller feeds it one [`EvalBatch`] at a time and asks
//! for [`EpochMetrics`] at the end.

use crate::error::{Result, SggEvalError};
use crate::matching::recall_matches;
use crate::metrics::ClassRecallCounts;
use crate::parsing::{parse_gt, parse_pred};
use crate::processors::{BatchMetricProcessor, RecallKProcessor};
use crate::stats::EvalStats;
use crate::types::{BatchSummary, EpochMetrics, EvalBatch};
use log::{debug, warn};

/// Configuration knobs for an evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct EvalConfig {
    /// Per-pair predicate rank cutoff for the accuracy processor.
    pub top_k: usize,
    /// Global ranking cutoff for the recall processor.
    pub recall_k: usize,
    /// Probability floor for the confident-predictions accuracy variant.
    pub low_p: f64,
    /// Whether object-classification-dependent metrics run at all.
    pub has_obj: bool,
    /// Whether relation metrics run at all.
    pub has_rel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { top_k: 3, recall_k: 100, low_p: 0.2, has_obj: true, has_rel: true }
    }
}

/// Drives the metric processors across the batches of one evaluation run.
///
/// Capability flags (`has_obj`, `has_rel`) are resolved once at construction;
/// gated metrics simply surface as `None` in the outputs.
pub struct EpochEvaluator {
    config: EvalConfig,
    accuracy: BatchMetricProcessor,
    recall: RecallKProcessor,
    class_counts: ClassRecallCounts,
    stats: EvalStats,
    // Per-scan recall values pooled across batches, degenerate scans excluded.
    recall_values: Vec<f64>,
    mean_recall_values: Vec<f64>,
    // Per-batch accuracy values, averaged over batches at finalize.
    top_k_values: Vec<f64>,
    low_p_values: Vec<f64>,
    obj_acc_values: Vec<f64>,
    obj_err_values: Vec<f64>,
    total_objects: usize,
    total_scans: usize,
    degenerate_scans: usize,
}

impl EpochEvaluator {
    pub fn new(config: EvalConfig) -> Self {
        let accuracy =
            BatchMetricProcessor::new(config.top_k, config.low_p).with_class_sensitivity(config.has_obj);
        let recall = RecallKProcessor::new(config.recall_k, config.low_p);
        Self {
            config,
            accuracy,
            recall,
            class_counts: ClassRecallCounts::new(),
            stats: EvalStats::new(),
            recall_values: Vec::new(),
            mean_recall_values: Vec::new(),
            top_k_values: Vec::new(),
            low_p_values: Vec::new(),
            obj_acc_values: Vec::new(),
            obj_err_values: Vec::new(),
            total_objects: 0,
            total_scans: 0,
            degenerate_scans: 0,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn stats(&self) -> &EvalStats {
        &self.stats
    }

    /// Run the full metric pipeline on one batch of raw model outputs.
    ///
    /// Parses ground truth and predictions, steps both processors, computes
    /// every enabled metric, folds the results into the epoch aggregates and
    /// resets the processors for the next batch.
    pub fn process_batch(&mut self, batch: &EvalBatch) -> Result<BatchSummary> {
        if batch.num_scans() == 0 {
            return Err(SggEvalError::EmptyBatch(
                "batch contains no scans".to_string(),
            ));
        }

        let batch_index = self.stats.batches_processed;
        let num_scans = batch.num_scans();
        self.stats.add_batch(num_scans);
        self.total_scans += num_scans;

        let mut summary = BatchSummary {
            batch_index,
            num_scans,
            ..Default::default()
        };

        let gt = parse_gt(&batch.relation_labels, &batch.object_labels, &batch.pair_indices)?;
        let pred = parse_pred(&batch.relation_logits, &batch.refine_logits, &batch.pair_indices)?;

        for (scan_idx, (scan_gt, scan_pred)) in gt.iter().zip(pred.iter()).enumerate() {
            self.stats.add_gt_counts(scan_gt.len(), scan_gt.num_pairs);
            self.stats.add_ranked_predictions(scan_pred.ranked.len());
            if scan_gt.is_empty() {
                warn!(
                    "batch {}: scan {} has no positive ground-truth relation, excluded from means",
                    batch_index, scan_idx
                );
                self.stats.add_degenerate_scan();
                self.degenerate_scans += 1;
                summary.degenerate_scans += 1;
            }
        }

        if self.config.has_rel {
            let num_gt_per_scan = batch.pairs_per_scan();
            let num_pred_per_scan = batch.preds_per_scan();
            self.recall.step(gt.clone(), pred.clone(), &num_gt_per_scan, &num_pred_per_scan)?;
            self.accuracy.step(gt.clone(), pred.clone())?;

            summary.recall_k = self.recall.compute_recall_k()?;
            summary.mean_recall_k = self.recall.compute_mean_recall_k()?;

            // Dataset-level per-class pooling uses the same top-K matching
            // that produced the per-scan recall values.
            for (scan_gt, scan_pred) in gt.iter().zip(pred.iter()) {
                let outcomes = recall_matches(scan_gt, scan_pred, self.config.recall_k);
                self.class_counts.accumulate(scan_gt, &outcomes);
            }

            for (scan_idx, scan_gt) in gt.iter().enumerate() {
                if !scan_gt.is_empty() {
                    self.recall_values.push(summary.recall_k[scan_idx]);
                    self.mean_recall_values.push(summary.mean_recall_k[scan_idx]);
                }
            }

            let rel_acc = self.accuracy.compute_top_k_rel_accuracy()?;
            summary.top_k_rel_accuracy = rel_acc.top_k_accuracy;
            summary.low_p_rel_accuracy = self.accuracy.compute_low_p_rel_accuracy()?;
            self.top_k_values.push(rel_acc.top_k_accuracy);
            self.low_p_values.push(summary.low_p_rel_accuracy);

            if self.config.has_obj {
                let (obj_acc, num_objects) = self
                    .accuracy
                    .compute_obj_cls_accuracy(&batch.refine_logits, &batch.object_labels)?;
                summary.obj_cls_accuracy = Some(obj_acc);
                summary.obj_cls_induced_error = Some(rel_acc.obj_cls_induced_error);
                summary.total_objects = num_objects;
                self.obj_acc_values.push(obj_acc);
                self.obj_err_values.push(rel_acc.obj_cls_induced_error);
                self.total_objects += num_objects;
                self.stats.add_objects_scored(num_objects);
            }

            self.recall.reset();
            self.accuracy.reset();
        }

        debug!(
            "batch {}: {} scans, recall@{} = {:?}",
            batch_index, num_scans, self.config.recall_k, summary.recall_k
        );

        Ok(summary)
    }

    /// Epoch-level aggregates over everything processed so far.
    ///
    /// Recall means pool per-scan values across the run with degenerate
    /// scans excluded; accuracy means average the per-batch values, matching
    /// how the per-batch metrics are reported during the run.
    pub fn finalize(&self) -> EpochMetrics {
        EpochMetrics {
            recall_k: mean(&self.recall_values),
            mean_recall_k: mean(&self.mean_recall_values),
            dataset_mean_recall_k: self.class_counts.mean_recall(),
            top_k_rel_accuracy: mean(&self.top_k_values),
            low_p_rel_accuracy: mean(&self.low_p_values),
            obj_cls_accuracy: if self.config.has_obj && self.config.has_rel {
                Some(mean(&self.obj_acc_values))
            } else {
                None
            },
            obj_cls_induced_error: if self.config.has_obj && self.config.has_rel {
                Some(mean(&self.obj_err_values))
            } else {
                None
            },
            total_scans: self.total_scans,
            degenerate_scans: self.degenerate_scans,
            total_objects: self.total_objects,
        }
    }

    /// Per-predicate-class recall pooled across the whole run.
    pub fn per_class_recall(&self) -> Vec<(usize, f64)> {
        self.class_counts.per_class_recall()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
