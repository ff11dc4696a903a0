//! # sgg-eval
//!
//! A Rust library for evaluating 3D scene-graph relation prediction
//! (predicate classification / PredCls) on point-cloud scans with object
//! detections.
//!
//! This library provides the metric engine of a relation-prediction
//! evaluation loop:
//!
//! - **Recall@K** over each scan's globally confidence-ranked relation
//!   triples
//! - **mean-Recall@K** (per-predicate-class recall averaged uniformly, so
//!   frequent predicates cannot dominate)
//! - **Top-K relation accuracy** under exact per-pair triple matching, with
//!   the error share attributable to wrong object classification split out
//! - **Object classification accuracy** over refined per-object logits
//!
//! ## Features
//!
//! - Parse raw per-scan logits/labels into normalized, confidence-ranked
//!   ground-truth and prediction sets
//! - Stateful per-batch accumulators with a `step()` / `compute*` / `reset()`
//!   lifecycle
//! - Epoch-level aggregation that excludes zero-ground-truth scans from
//!   every mean
//! - JSON loading of serialized batch dumps for offline evaluation
//! - DataFrame export of per-batch and per-scan metric tables
//!
//! ## Quick Start
//!
//! ```rust
//! use sgg_eval::evaluator::{EpochEvaluator, EvalConfig};
//! use sgg_eval::types::EvalBatch;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut evaluator = EpochEvaluator::new(EvalConfig::default());
//!
//! // One scan with two objects and one candidate pair labeled predicate 1.
//! let batch = EvalBatch {
//!     relation_logits: vec![vec![vec![0.0, 6.0, 0.0]]],
//!     refine_logits: vec![vec![vec![5.0, 0.0], vec![0.0, 5.0]]],
//!     relation_labels: vec![vec![1]],
//!     object_labels: vec![vec![0, 1]],
//!     pair_indices: vec![vec![(0, 1)]],
//! };
//!
//! let summary = evaluator.process_batch(&batch)?;
//! println!("Recall@100 per scan: {:?}", summary.recall_k);
//!
//! let epoch = evaluator.finalize();
//! println!("Epoch Recall@100: {:.4}", epoch.recall_k);
//! # Ok(())
//! # }
//! ```
//!
//! ## Input format
//!
//! The engine consumes parallel per-scan arrays as produced by the detector
//! and relation-feature extractor (or loaded from a JSON dump):
//!
//! - `relation_logits[scan]`: candidate_pairs × predicate_classes
//! - `refine_logits[scan]`: objects × object_classes
//! - `relation_labels[scan]`: true predicate per pair, 0 = background
//! - `object_labels[scan]`: true class per object
//! - `pair_indices[scan]`: (subject_index, object_index) per pair
//!
//! Prediction scores are post-softmax probabilities, so the low-probability
//! threshold `P` reads as a probability floor.

pub mod error;
pub mod types;
pub mod loader;
pub mod threshold;
pub mod parsing;
pub mod matching;
pub mod metrics;
pub mod processors;
pub mod evaluator;
pub mod stats;
pub mod polars_utils;

// Re-export commonly used types and functions
pub use error::{Result, SggEvalError};
pub use types::{
    BatchSummary, EpochMetrics, EvalBatch, GtRelation, PairPrediction, RelationTriple,
    ScanGroundTruth, ScanPredictions, ScoredRelation, BACKGROUND_PREDICATE,
};
pub use loader::{load_from_file, load_from_string};
pub use parsing::{parse_gt, parse_pred};
pub use processors::{BatchMetricProcessor, RecallKProcessor};
pub use evaluator::{EpochEvaluator, EvalConfig};
pub use threshold::{filter_by_confidence, generate_threshold_range};
