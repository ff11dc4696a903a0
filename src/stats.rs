/// Statistics tracking for evaluation-run processing
///
/// This module provides structures for tracking what the metric engine saw
/// while consuming batches: scan counts, degenerate scans, background pairs
/// dropped from the positive sets, and so on.

use serde::{Deserialize, Serialize};

/// Statistics collected while processing evaluation batches
///
/// A fixed record of named counters; there is no stringly-keyed statistics
/// dictionary anywhere in the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalStats {
    /// Total number of batches processed
    pub batches_processed: usize,

    /// Total number of scans processed
    pub scans_processed: usize,

    /// Number of scans with zero positive ground-truth triples
    pub degenerate_scans: usize,

    /// Candidate pairs whose true label was background
    pub background_pairs: usize,

    /// Positive ground-truth triples seen
    pub positive_triples: usize,

    /// Non-background predictions entered into ranked sets
    pub ranked_predictions: usize,

    /// Total detected objects scored for classification accuracy
    pub objects_scored: usize,
}

impl EvalStats {
    /// Create a new `EvalStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed batch of `num_scans` scans
    pub fn add_batch(&mut self, num_scans: usize) {
        self.batches_processed += 1;
        self.scans_processed += num_scans;
    }

    /// Record a scan with no positive ground-truth triple
    pub fn add_degenerate_scan(&mut self) {
        self.degenerate_scans += 1;
    }

    /// Record ground-truth composition for one scan
    pub fn add_gt_counts(&mut self, positive: usize, total_pairs: usize) {
        self.positive_triples += positive;
        self.background_pairs += total_pairs.saturating_sub(positive);
    }

    /// Record the size of a scan's ranked prediction set
    pub fn add_ranked_predictions(&mut self, count: usize) {
        self.ranked_predictions += count;
    }

    /// Record objects scored for classification accuracy
    pub fn add_objects_scored(&mut self, count: usize) {
        self.objects_scored += count;
    }

    /// Fraction of processed scans that were degenerate
    pub fn degenerate_fraction(&self) -> f64 {
        if self.scans_processed == 0 {
            return 0.0;
        }
        self.degenerate_scans as f64 / self.scans_processed as f64
    }

    /// Get a formatted one-line summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "EvalStats {{ batches: {}, scans: {}, degenerate: {}, gt triples: {}, background pairs: {}, ranked preds: {} }}",
            self.batches_processed,
            self.scans_processed,
            self.degenerate_scans,
            self.positive_triples,
            self.background_pairs,
            self.ranked_predictions
        )
    }

    /// Print a summary of the statistics to stdout
    pub fn print_summary(&self) {
        println!("\n=== Evaluation Statistics ===");
        println!("Batches processed: {}", self.batches_processed);
        println!("Scans processed: {}", self.scans_processed);
        println!("  - Degenerate (zero-GT): {}", self.degenerate_scans);
        println!("Positive GT triples: {}", self.positive_triples);
        println!("Background pairs: {}", self.background_pairs);
        println!("Ranked predictions: {}", self.ranked_predictions);
        println!("Objects scored: {}", self.objects_scored);
        println!("=============================\n");
    }
}
