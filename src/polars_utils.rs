/// Utilities for working with Polars DataFrames
///
/// This module converts per-batch and per-scan metric records into Polars
/// DataFrames for downstream analysis, and provides schema validation helpers
/// for DataFrames handed in from elsewhere.

use polars::prelude::*;
use crate::error::SggEvalError;
use crate::types::BatchSummary;

/// Validate that a DataFrame contains all required columns
///
/// # Arguments
///
/// * `df` - The DataFrame to validate
/// * `required_columns` - Slice of required column names
///
/// # Returns
///
/// `Ok(())` if all columns are present, error otherwise
pub fn validate_columns(df: &DataFrame, required_columns: &[&str]) -> Result<(), SggEvalError> {
    let column_names: Vec<String> = df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for col in required_columns {
        if !column_names.iter().any(|c| c == col) {
            return Err(SggEvalError::MissingColumn(col.to_string()));
        }
    }

    Ok(())
}

/// Validate the schema of a batch-summary DataFrame
///
/// Expected columns: batch, num_scans, top_k_rel_accuracy, low_p_rel_accuracy
pub fn validate_summary_schema(df: &DataFrame) -> Result<(), SggEvalError> {
    validate_columns(df, &["batch", "num_scans", "top_k_rel_accuracy", "low_p_rel_accuracy"])?;

    let batch_dtype = df.column("batch")?.dtype();
    if !matches!(batch_dtype, DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
        return Err(SggEvalError::InvalidDataFrame(
            format!("batch must be integer type, got {:?}", batch_dtype)
        ));
    }

    let acc_dtype = df.column("top_k_rel_accuracy")?.dtype();
    if !matches!(acc_dtype, DataType::Float64 | DataType::Float32) {
        return Err(SggEvalError::InvalidDataFrame(
            format!("top_k_rel_accuracy must be Float64 or Float32, got {:?}", acc_dtype)
        ));
    }

    Ok(())
}

/// Convert per-batch summaries into a DataFrame of scalar metrics
///
/// One row per batch. Gated object-classification metrics surface as null.
pub fn batch_summaries_to_dataframe(summaries: &[BatchSummary]) -> Result<DataFrame, SggEvalError> {
    let batch: Vec<u64> = summaries.iter().map(|s| s.batch_index as u64).collect();
    let num_scans: Vec<u64> = summaries.iter().map(|s| s.num_scans as u64).collect();
    let degenerate: Vec<u64> = summaries.iter().map(|s| s.degenerate_scans as u64).collect();
    let top_k: Vec<f64> = summaries.iter().map(|s| s.top_k_rel_accuracy).collect();
    let low_p: Vec<f64> = summaries.iter().map(|s| s.low_p_rel_accuracy).collect();
    let obj_acc: Vec<Option<f64>> = summaries.iter().map(|s| s.obj_cls_accuracy).collect();
    let obj_err: Vec<Option<f64>> = summaries.iter().map(|s| s.obj_cls_induced_error).collect();
    let total_objects: Vec<u64> = summaries.iter().map(|s| s.total_objects as u64).collect();

    let df = DataFrame::new(vec![
        Series::new("batch", batch),
        Series::new("num_scans", num_scans),
        Series::new("degenerate_scans", degenerate),
        Series::new("top_k_rel_accuracy", top_k),
        Series::new("low_p_rel_accuracy", low_p),
        Series::new("obj_cls_accuracy", obj_acc),
        Series::new("obj_cls_induced_error", obj_err),
        Series::new("total_objects", total_objects),
    ])?;

    Ok(df)
}

/// Convert per-batch summaries into a long-format per-scan recall DataFrame
///
/// One row per (batch, scan) with that scan's Recall@K and mean-Recall@K.
/// Zero-GT placeholder values are carried through as-is; exclusion from
/// averages is the caller's job, typically via the degenerate counts in
/// [`batch_summaries_to_dataframe`].
pub fn per_scan_recall_to_dataframe(summaries: &[BatchSummary]) -> Result<DataFrame, SggEvalError> {
    let mut batch = Vec::new();
    let mut scan = Vec::new();
    let mut recall_k = Vec::new();
    let mut mean_recall_k = Vec::new();

    for summary in summaries {
        for (scan_idx, (&rk, &mrk)) in summary
            .recall_k
            .iter()
            .zip(summary.mean_recall_k.iter())
            .enumerate()
        {
            batch.push(summary.batch_index as u64);
            scan.push(scan_idx as u64);
            recall_k.push(rk);
            mean_recall_k.push(mrk);
        }
    }

    let df = DataFrame::new(vec![
        Series::new("batch", batch),
        Series::new("scan", scan),
        Series::new("recall_k", recall_k),
        Series::new("mean_recall_k", mean_recall_k),
    ])?;

    Ok(df)
}

/// Convert per-predicate-class recall values into a DataFrame
///
/// One row per predicate class, ascending by class id.
pub fn per_class_recall_to_dataframe(per_class: &[(usize, f64)]) -> Result<DataFrame, SggEvalError> {
    let class: Vec<u64> = per_class.iter().map(|&(c, _)| c as u64).collect();
    let recall: Vec<f64> = per_class.iter().map(|&(_, r)| r).collect();

    let df = DataFrame::new(vec![
        Series::new("predicate_class", class),
        Series::new("recall", recall),
    ])?;

    Ok(df)
}
