//! Groups `CampaignRow`s sharing `(Target-text, Operation)` into a single
//! operation bucket (spec.md §3 "CampaignRow").

use fit_types::{CampaignRow, FitError, Operation};

/// Rows sharing `(target_text, operation)`, carrying one shared `op_prob`
/// (first occurrence wins) and a list of `(value, value_prob)` pairs in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationBucket {
    pub target_text: String,
    pub operation: Operation,
    pub op_prob: f64,
    pub values: Vec<i64>,
    pub value_probs: Vec<f64>,
}

/// Group `rows` into buckets, in first-appearance order. A row whose
/// `(target, operation)` key already has a bucket, but with a different
/// `operation_probability`, is a configuration error (spec.md §3: "later
/// mismatches are a configuration error").
pub fn group_rows(rows: &[CampaignRow]) -> Result<Vec<OperationBucket>, FitError> {
    let mut buckets: Vec<OperationBucket> = Vec::new();

    for row in rows {
        if let Some(bucket) =
            buckets.iter_mut().find(|b| b.target_text == row.target_text && b.operation == row.operation)
        {
            if (bucket.op_prob - row.operation_probability).abs() > 1e-9 {
                return Err(FitError::OpProbMismatch {
                    target: row.target_text.clone(),
                    operation: row.operation,
                    first: bucket.op_prob,
                    second: row.operation_probability,
                });
            }
            bucket.values.push(row.value);
            bucket.value_probs.push(row.value_probability);
        } else {
            buckets.push(OperationBucket {
                target_text: row.target_text.clone(),
                operation: row.operation,
                op_prob: row.operation_probability,
                values: vec![row.value],
                value_probs: vec![row.value_probability],
            });
        }
    }

    Ok(buckets)
}
