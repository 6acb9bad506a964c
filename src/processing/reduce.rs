//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`, integer columns stay [`Value::Int64`] unless a float is present
///   or the integer sum overflows.
/// - `Mean` always yields [`Value::Float64`].
/// - For numeric ops, returns `Some(Value::Null)` if there are no non-null numeric values.
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    Some(reduce_at(dataset, idx, op))
}

/// Same as [`reduce`], addressing the column by index.
pub fn reduce_at(dataset: &DataSet, idx: usize, op: ReduceOp) -> Value {
    if op == ReduceOp::Count {
        return Value::Int64(dataset.row_count() as i64);
    }

    let cells: Vec<&Value> = dataset
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|v| v.as_f64().is_some())
        .collect();
    if cells.is_empty() {
        return Value::Null;
    }

    if op != ReduceOp::Mean {
        let ints: Option<Vec<i64>> = cells
            .iter()
            .map(|v| match v {
                Value::Int64(i) => Some(*i),
                _ => None,
            })
            .collect();
        if let Some(reduced) = ints.and_then(|ints| reduce_ints(&ints, op)) {
            return Value::Int64(reduced);
        }
    }

    let floats: Vec<f64> = cells.iter().filter_map(|v| v.as_f64()).collect();
    Value::Float64(reduce_floats(&floats, op))
}

fn reduce_ints(values: &[i64], op: ReduceOp) -> Option<i64> {
    match op {
        ReduceOp::Sum => values.iter().try_fold(0_i64, |acc, v| acc.checked_add(*v)),
        ReduceOp::Min => values.iter().copied().min(),
        ReduceOp::Max => values.iter().copied().max(),
        ReduceOp::Count | ReduceOp::Mean => None,
    }
}

fn reduce_floats(values: &[f64], op: ReduceOp) -> f64 {
    match op {
        ReduceOp::Sum => values.iter().sum(),
        ReduceOp::Mean => values.iter().sum::<f64>() / values.len() as f64,
        ReduceOp::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        ReduceOp::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ReduceOp::Count => values.len() as f64,
    }
}

/// Extreme value of a numeric column plus every row that attains it, in row order.
///
/// `op` must be [`ReduceOp::Min`] or [`ReduceOp::Max`]; other ops and all-null columns
/// return `None`. Integer columns are compared exactly, not through `f64`.
pub fn arg_extreme(dataset: &DataSet, idx: usize, op: ReduceOp) -> Option<(f64, Vec<usize>)> {
    if !matches!(op, ReduceOp::Min | ReduceOp::Max) {
        return None;
    }
    let extreme = reduce_at(dataset, idx, op);
    let rows = match extreme {
        Value::Int64(e) => {
            dataset.matching_rows(|row| matches!(row.get(idx), Some(Value::Int64(v)) if *v == e))
        }
        Value::Float64(e) => {
            dataset.matching_rows(|row| row.get(idx).and_then(Value::as_f64) == Some(e))
        }
        _ => return None,
    };
    Some((extreme.as_f64()?, rows))
}
