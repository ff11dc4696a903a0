//! Metric calculation modules for scene-graph relation evaluation.

pub mod recall;
pub mod mean_recall;
pub mod accuracy;

pub use recall::{recall_from_matches, scan_recall_at_k};
pub use mean_recall::{scan_mean_recall_at_k, ClassRecallCounts};
pub use accuracy::{
    low_p_relation_accuracy, object_cls_accuracy, top_k_relation_accuracy, RelationAccuracy,
};
