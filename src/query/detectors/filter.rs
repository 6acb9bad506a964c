//! Filtering detectors: numeric "where" clauses, prefix and substring matches.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{QueryError, QueryResult};
use crate::processing::{compare, contains, starts_with, Comparison};
use crate::query::columns::resolve_column;
use crate::query::response::{format_number, QueryResponse, ResultKind};
use crate::query::text::QueryText;
use crate::types::Value;

use super::{rows_phrase, Ctx};

// <verb> [me] [the|all] <select> where <filter> [is] <comparator> [than] <number>
static WHERE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:give|show|get|find)\b(?:\s+me)?(?:\s+(?:the|all))?\s+(?P<select>[\w\s.\-]+?)\s+where\s+(?P<filter>[\w\s.\-]+?)\s*(?:\bis\s+)?(?P<op>greater\s+than|more\s+than|higher\s+than|less\s+than|lower\s+than|smaller\s+than|equals|equal\s+to|==|=|>|<|\bis\b)\s*(?:than\s+)?(?P<value>-?\d+(?:\.\d+)?)",
    )
    .expect("Invalid regex")
});
static PREFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:starting|begins|starts)\s+with\s+(?:the\s+)?(?:letter\s+)?["']?(?P<letter>[a-z])"#)
        .expect("Invalid regex")
});
static SUBSTRING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:containing|with)\s+(?P<term>\S+)").expect("Invalid regex"));

const PREFIX_TRIGGERS: &[&str] = &["starting with", "begins with", "starts with"];
const NAME_HINTS: &[&str] = &["name", "fullname", "full name"];

pub(super) fn mentions_where(text: &QueryText) -> bool {
    text.sanitized.contains("where")
}

pub(super) fn mentions_prefix(text: &QueryText) -> bool {
    text.mentions_any(PREFIX_TRIGGERS)
}

pub(super) fn mentions_substring(text: &QueryText) -> bool {
    text.sanitized
        .split_whitespace()
        .any(|word| word == "containing" || word == "with")
}

fn parse_comparison(op: &str) -> Comparison {
    let op = op.split_whitespace().next().unwrap_or(op);
    match op {
        "greater" | "more" | "higher" | ">" => Comparison::Greater,
        "less" | "lower" | "smaller" | "<" => Comparison::Less,
        _ => Comparison::Equal,
    }
}

/// `show me <column> where <numeric column> <comparator> <number>`.
///
/// Declines when the filter column does not resolve to a numeric column.
pub(super) fn conditional_filter(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    let Some(caps) = WHERE_PATTERN.captures(&ctx.text.folded) else {
        return Ok(None);
    };
    let schema = &ctx.dataset.schema;

    let Some(filter_idx) = resolve_column(schema, &caps["filter"]) else {
        return Ok(None);
    };
    if !ctx.classes.is_numeric(filter_idx) {
        return Ok(None);
    }

    let raw = &caps["value"];
    let threshold: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| QueryError::InvalidNumber {
        raw: raw.to_string(),
        message: e.to_string(),
    })?;
    let cmp = parse_comparison(&caps["op"]);

    let rows = compare(ctx.dataset, filter_idx, cmp, threshold);
    let mut answer = format!(
        "Found {} where {} is {} {}.",
        rows_phrase(rows.len()),
        ctx.column_name(filter_idx),
        cmp.phrase(),
        format_number(threshold)
    );

    let mut response = QueryResponse::new(ResultKind::ConditionalFilter, String::new())
        .with_count(rows.len())
        .with_details(ctx.preview_rows(&rows));

    if let Some(select_idx) = resolve_column(schema, &caps["select"]) {
        let values: Vec<Value> = rows
            .iter()
            .take(ctx.options.max_preview_values)
            .map(|&row| {
                ctx.dataset.rows[row]
                    .get(select_idx)
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect();
        if !values.is_empty() {
            let listed: Vec<String> = values.iter().map(Value::to_string).collect();
            answer.push_str(&format!(" {}: {}", ctx.column_name(select_idx), listed.join(", ")));
            if rows.len() > values.len() {
                answer.push_str(", ...");
            }
        }
        response = response.with_column(ctx.column_name(select_idx)).with_values(values);
    }

    response.answer = answer;
    Ok(Some(response))
}

/// `names starting with a`.
pub(super) fn prefix_filter(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    let Some(caps) = PREFIX_PATTERN.captures(&ctx.text.folded) else {
        return Ok(None);
    };
    let Some(idx) = prefix_target(ctx) else {
        return Ok(None);
    };
    let letter = &caps["letter"];

    let rows = starts_with(ctx.dataset, idx, letter);
    let column = ctx.column_name(idx);
    let answer = format!(
        "Found {} where {column} starts with '{}'.",
        rows_phrase(rows.len()),
        letter.to_uppercase()
    );
    Ok(Some(
        QueryResponse::new(ResultKind::Filter, answer)
            .with_count(rows.len())
            .with_column(column)
            .with_details(ctx.preview_rows(&rows)),
    ))
}

/// Column a prefix filter applies to.
///
/// A categorical column named in the question, else the first categorical column with
/// "name" in it when the question talks about names, else the first categorical column.
fn prefix_target(ctx: &Ctx<'_>) -> Option<usize> {
    let categorical = &ctx.classes.categorical;
    let lowered = |idx: usize| ctx.column_name(idx).to_lowercase();

    categorical
        .iter()
        .copied()
        .find(|&idx| ctx.text.folded.contains(&lowered(idx)))
        .or_else(|| {
            if NAME_HINTS.iter().any(|hint| ctx.text.folded.contains(hint)) {
                categorical.iter().copied().find(|&idx| lowered(idx).contains("name"))
            } else {
                None
            }
        })
        .or_else(|| ctx.classes.first_categorical())
}

/// `rows containing smith` / `names with smith`, matched against the first categorical
/// column.
pub(super) fn substring_filter(ctx: &Ctx<'_>) -> QueryResult<Option<QueryResponse>> {
    let Some(caps) = SUBSTRING_PATTERN.captures(&ctx.text.folded) else {
        return Ok(None);
    };
    let term = caps["term"].trim_matches(|c: char| !c.is_alphanumeric());
    if term.is_empty() {
        return Ok(None);
    }
    let Some(idx) = ctx.classes.first_categorical() else {
        return Ok(None);
    };

    let rows = contains(ctx.dataset, idx, term);
    let column = ctx.column_name(idx);
    let answer = format!(
        "Found {} where {column} contains '{term}'.",
        rows_phrase(rows.len())
    );
    Ok(Some(
        QueryResponse::new(ResultKind::Filter, answer)
            .with_count(rows.len())
            .with_column(column)
            .with_details(ctx.preview_rows(&rows)),
    ))
}
