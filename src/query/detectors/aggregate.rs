//! Sum, average, max and min over a resolved numeric column.

use crate::error::QueryResult;
use crate::processing::{arg_extreme, reduce_at, ReduceOp};
use crate::query::columns::aggregate_target;
use crate::query::response::{format_number, QueryResponse, ResultKind, NO_NUMERIC_COLUMN_ANSWER};
use crate::query::text::QueryText;
use crate::types::Value;

use super::Ctx;

const SUM_KEYWORDS: &[&str] = &["sum", "total"];
const AVERAGE_KEYWORDS: &[&str] = &["average", "mean", "avg"];
const MAX_KEYWORDS: &[&str] = &["max", "highest"];
const MIN_KEYWORDS: &[&str] = &["min", "lowest"];

pub(super) fn mentions_sum(text: &QueryText) -> bool {
    text.mentions_any(SUM_KEYWORDS)
}

pub(super) fn mentions_average(text: &QueryText) -> bool {
    text.mentions_any(AVERAGE_KEYWORDS)
}

pub(super) fn mentions_max(text: &QueryText) -> bool {
    text.mentions_any(MAX_KEYWORDS)
}

pub(super) fn mentions_min(text: &QueryText) -> bool {
    text.mentions_any(MIN_KEYWORDS)
}

/// Outcome of resolving the column an aggregate runs over.
enum Target {
    Column(usize),
    NoNumericColumn,
}

fn target(ctx: &Ctx<'_>) -> Target {
    aggregate_target(&ctx.dataset.schema, ctx.classes, ctx.text)
        .map_or(Target::NoNumericColumn, Target::Column)
}

pub(super) fn sum(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    let idx = match target(ctx) {
        Target::Column(idx) => idx,
        Target::NoNumericColumn => return Ok(Some(no_numeric_column(ResultKind::Sum))),
    };
    // An all-null column sums to zero.
    let total = reduce_at(ctx.dataset, idx, ReduceOp::Sum).as_f64().unwrap_or(0.0);
    let column = ctx.column_name(idx);
    let answer = format!("The total {column} is {}.", format_number(total));
    Ok(Some(
        QueryResponse::new(ResultKind::Sum, answer)
            .with_column(column)
            .with_value(Some(total)),
    ))
}

pub(super) fn average(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    let idx = match target(ctx) {
        Target::Column(idx) => idx,
        Target::NoNumericColumn => return Ok(Some(no_numeric_column(ResultKind::Average))),
    };
    let mean = reduce_at(ctx.dataset, idx, ReduceOp::Mean).as_f64();
    let column = ctx.column_name(idx);
    let answer = match mean {
        Some(mean) => format!("The average {column} is {}.", format_number(mean)),
        None => format!("{column} has no numeric values to average."),
    };
    Ok(Some(
        QueryResponse::new(ResultKind::Average, answer)
            .with_column(column)
            .with_value(mean),
    ))
}

pub(super) fn max(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    extreme(ctx, ReduceOp::Max, ResultKind::Max, "highest")
}

pub(super) fn min(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    extreme(ctx, ReduceOp::Min, ResultKind::Min, "lowest")
}

/// Max/min answer listing the first categorical column's value for every tied row.
fn extreme(
    ctx: &Ctx<'_>,
    op: ReduceOp,
    kind: ResultKind,
    adjective: &str,
) -> QueryResult<Option<QueryResponse>> {
    let idx = match target(ctx) {
        Target::Column(idx) => idx,
        Target::NoNumericColumn => return Ok(Some(no_numeric_column(kind))),
    };
    let column = ctx.column_name(idx);

    let Some((value, rows)) = arg_extreme(ctx.dataset, idx, op) else {
        let answer = format!("{column} has no numeric values.");
        return Ok(Some(QueryResponse::new(kind, answer).with_column(column)));
    };

    let mut answer = format!("The {adjective} {column} is {}.", format_number(value));
    let mut labels: Vec<Value> = Vec::new();
    if let Some(label_idx) = ctx.classes.first_categorical() {
        labels = rows
            .iter()
            .map(|&row| {
                ctx.dataset.rows[row]
                    .get(label_idx)
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect();
        let listed: Vec<String> = labels.iter().map(Value::to_string).collect();
        answer.push_str(&format!(" ({}: {})", ctx.column_name(label_idx), listed.join(", ")));
    }

    Ok(Some(
        QueryResponse::new(kind, answer)
            .with_count(rows.len())
            .with_column(column)
            .with_value(Some(value))
            .with_values(labels)
            .with_details(ctx.preview_rows(&rows)),
    ))
}

fn no_numeric_column(kind: ResultKind) -> QueryResponse {
    QueryResponse::new(kind, NO_NUMERIC_COLUMN_ANSWER)
}
