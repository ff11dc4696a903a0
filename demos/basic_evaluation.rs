//! Basic evaluation example demonstrating core functionality.

use sgg_eval::evaluator::{EpochEvaluator, EvalConfig};
use sgg_eval::parsing::{parse_gt, parse_pred};
use sgg_eval::processors::RecallKProcessor;
use sgg_eval::{load_from_string, polars_utils};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Scene-Graph Relation Evaluation Example ===\n");

    // Example 1: Load a serialized batch dump
    println!("1. Loading a Batch Dump");
    let batch_json = r#"{
        "relation_logits": [
            [[0.0, 4.0, 0.5], [0.2, 0.1, 3.0], [2.5, 0.0, 0.0]]
        ],
        "refine_logits": [
            [[2.0, 0.1, 0.0], [0.0, 2.0, 0.1], [0.1, 0.0, 2.0]]
        ],
        "relation_labels": [[1, 2, 0]],
        "object_labels": [[0, 1, 2]],
        "pair_indices": [[[0, 1], [1, 2], [2, 0]]]
    }"#;

    let batch = load_from_string(batch_json)?;
    println!("   Loaded {} scan(s), pairs per scan: {:?}", batch.num_scans(), batch.pairs_per_scan());
    println!();

    // Example 2: Parse into normalized sets
    println!("2. Parsing Ground Truth and Predictions");
    let gt = parse_gt(&batch.relation_labels, &batch.object_labels, &batch.pair_indices)?;
    let pred = parse_pred(&batch.relation_logits, &batch.refine_logits, &batch.pair_indices)?;
    println!("   Scan 0: {} positive GT triples of {} pairs", gt[0].len(), gt[0].num_pairs);
    println!("   Scan 0: {} ranked predictions", pred[0].ranked.len());
    for rel in &pred[0].ranked {
        println!(
            "     ({}, {}, {}) score {:.4}",
            rel.triple.subject, rel.triple.predicate, rel.triple.object, rel.score
        );
    }
    println!();

    // Example 3: Recall@K with a standalone processor
    println!("3. Recall@K");
    let mut recall = RecallKProcessor::new(50, 0.2);
    recall.step(gt, pred, &batch.pairs_per_scan(), &batch.preds_per_scan())?;
    println!("   Recall@50 per scan: {:?}", recall.compute_recall_k()?);
    println!("   Mean-Recall@50 per scan: {:?}", recall.compute_mean_recall_k()?);
    println!();

    // Example 4: Full epoch pipeline with DataFrame export
    println!("4. Epoch Evaluation");
    let mut evaluator = EpochEvaluator::new(EvalConfig::default());
    let summary = evaluator.process_batch(&batch)?;
    println!("   Top-{} relation accuracy: {:.4}", evaluator.config().top_k, summary.top_k_rel_accuracy);
    println!("   Object classification accuracy: {:?}", summary.obj_cls_accuracy);

    let epoch = evaluator.finalize();
    println!("   Epoch Recall@{}: {:.4}", evaluator.config().recall_k, epoch.recall_k);
    println!("   Epoch dataset mean-Recall: {:.4}", epoch.dataset_mean_recall_k);

    let df = polars_utils::batch_summaries_to_dataframe(&[summary])?;
    println!("\n{}", df);

    evaluator.stats().print_summary();

    Ok(())
}
