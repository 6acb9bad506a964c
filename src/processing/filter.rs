//! Row selection for [`crate::types::DataSet`].
//!
//! Every function returns matching row indexes in row order. Text matching is
//! case-insensitive and never matches null cells.

use crate::types::{DataSet, Value};

/// Numeric comparison used by threshold filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `value > threshold`
    Greater,
    /// `value < threshold`
    Less,
    /// `value == threshold`
    Equal,
}

impl Comparison {
    /// Evaluate `lhs <op> rhs`.
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Greater => lhs > rhs,
            Self::Less => lhs < rhs,
            Self::Equal => lhs == rhs,
        }
    }

    /// Phrase used in answers ("greater than", ...).
    pub fn phrase(self) -> &'static str {
        match self {
            Self::Greater => "greater than",
            Self::Less => "less than",
            Self::Equal => "equal to",
        }
    }
}

/// Rows whose numeric value in column `idx` satisfies `cmp` against `threshold`.
pub fn compare(dataset: &DataSet, idx: usize, cmp: Comparison, threshold: f64) -> Vec<usize> {
    dataset.matching_rows(|row| {
        row.get(idx)
            .and_then(Value::as_f64)
            .is_some_and(|v| cmp.holds(v, threshold))
    })
}

/// Rows whose string form in column `idx` starts with `prefix`.
pub fn starts_with(dataset: &DataSet, idx: usize, prefix: &str) -> Vec<usize> {
    let prefix = prefix.to_lowercase();
    text_matches(dataset, idx, |text| text.starts_with(&prefix))
}

/// Rows whose string form in column `idx` contains `needle`.
pub fn contains(dataset: &DataSet, idx: usize, needle: &str) -> Vec<usize> {
    let needle = needle.to_lowercase();
    text_matches(dataset, idx, |text| text.contains(&needle))
}

/// Rows whose value in column `idx` equals `value` exactly.
pub fn equals(dataset: &DataSet, idx: usize, value: &Value) -> Vec<usize> {
    dataset.matching_rows(|row| row.get(idx) == Some(value))
}

fn text_matches<F>(dataset: &DataSet, idx: usize, mut predicate: F) -> Vec<usize>
where
    F: FnMut(&str) -> bool,
{
    dataset.matching_rows(|row| {
        row.get(idx)
            .and_then(Value::folded_text)
            .is_some_and(|text| predicate(&text))
    })
}
