//! Row-count and count-of-value detectors.

use std::collections::HashSet;

use crate::error::QueryResult;
use crate::processing::equals;
use crate::query::response::{QueryResponse, ResultKind};
use crate::query::text::QueryText;
use crate::types::Value;

use super::{rows_phrase, Ctx};

const ROW_COUNT_KEYWORDS: &[&str] = &["how many rows", "number of rows", "row count", "count rows"];
const COUNT_KEYWORDS: &[&str] = &["how many", "count", "number of"];

pub(super) fn mentions_row_count(text: &QueryText) -> bool {
    text.mentions_any(ROW_COUNT_KEYWORDS)
}

pub(super) fn mentions_count(text: &QueryText) -> bool {
    text.mentions_any(COUNT_KEYWORDS)
}

pub(super) fn row_count(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    let n = ctx.dataset.row_count();
    let answer = format!("The dataset has {}.", rows_phrase(n));
    Ok(Some(QueryResponse::new(ResultKind::Count, answer).with_count(n)))
}

/// Counts rows holding the first categorical value that the question mentions.
///
/// Columns are scanned in schema order and values in first-appearance order; the first
/// value whose lower-cased text occurs anywhere in the question wins.
pub(super) fn count_value(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    for &idx in &ctx.classes.categorical {
        let Some(value) = first_mentioned_value(ctx, idx) else {
            continue;
        };
        let rows = equals(ctx.dataset, idx, &value);
        let column = ctx.column_name(idx);
        let answer = format!(
            "There are {} where {column} is {value}.",
            rows_phrase(rows.len())
        );
        let response = QueryResponse::new(ResultKind::Count, answer)
            .with_count(rows.len())
            .with_column(column)
            .with_details(ctx.preview_rows(&rows))
            .with_values(vec![value]);
        return Ok(Some(response));
    }
    Ok(None)
}

fn first_mentioned_value(ctx: &Ctx<'_>, idx: usize) -> Option<Value> {
    let mut seen: HashSet<String> = HashSet::new();
    for row in &ctx.dataset.rows {
        let Some(value) = row.get(idx) else { continue };
        let Some(text) = value.folded_text() else { continue };
        if text.is_empty() || seen.contains(&text) {
            continue;
        }
        if ctx.text.folded.contains(&text) {
            return Some(value.clone());
        }
        seen.insert(text);
    }
    None
}
