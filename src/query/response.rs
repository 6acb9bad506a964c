//! Structured answer returned by the interpreter.

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::types::{DataSet, Value};

/// Answer given when an aggregate is asked of a dataset without numeric columns.
pub const NO_NUMERIC_COLUMN_ANSWER: &str = "No numeric column found in the dataset.";

/// What kind of answer a detector produced. Serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Count,
    Sum,
    Average,
    Max,
    Min,
    Filter,
    ConditionalFilter,
    Help,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Max => "max",
            Self::Min => "min",
            Self::Filter => "filter",
            Self::ConditionalFilter => "conditional_filter",
            Self::Help => "help",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset row rendered as ordered `column -> value` pairs.
///
/// Serializes as a JSON object that keeps schema column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPreview(pub Vec<(String, Value)>);

impl RowPreview {
    pub fn from_row(dataset: &DataSet, row: usize) -> Self {
        let cells = dataset.rows.get(row).map(Vec::as_slice).unwrap_or_default();
        Self(
            dataset
                .schema
                .field_names()
                .zip(cells)
                .map(|(name, value)| (name.to_owned(), value.clone()))
                .collect(),
        )
    }

    /// Value of `column` in this row.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }
}

impl Serialize for RowPreview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of interpreting one question.
///
/// `count` is always the size of the full match set; `values` and `details` are previews
/// capped by [`super::InterpreterOptions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    /// The question as received.
    pub query: String,
    /// Human-readable answer.
    pub answer: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Computed aggregate (sum, mean, extreme).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<RowPreview>,
}

impl QueryResponse {
    pub(crate) fn new(kind: ResultKind, answer: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            answer: answer.into(),
            kind,
            count: None,
            column: None,
            value: None,
            values: Vec::new(),
            details: Vec::new(),
        }
    }

    pub(crate) fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub(crate) fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub(crate) fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self
    }

    pub(crate) fn with_values(mut self, values: Vec<Value>) -> Self {
        self.values = values;
        self
    }

    pub(crate) fn with_details(mut self, details: Vec<RowPreview>) -> Self {
        self.details = details;
        self
    }

    /// `true` when an aggregate could not run for lack of a numeric column.
    pub fn is_no_numeric_column(&self) -> bool {
        self.answer == NO_NUMERIC_COLUMN_ANSWER
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Render a number the way answers show it: whole numbers without a fraction, others with
/// two decimals.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else if v.fract() == 0.0 {
        format!("{v}")
    } else {
        format!("{v:.2}")
    }
}
