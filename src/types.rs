//! Core data model types.
//!
//! Uploaded files are ingested into an in-memory [`DataSet`]: a [`Schema`] (a list of typed
//! [`Field`]s) plus row-major [`Value`] storage. Whether a column counts as numeric or
//! categorical for query answering is derived from its [`DataType`].

use std::fmt;

use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed cell in a [`DataSet`].
///
/// Serializes untagged, so `Null` becomes JSON `null` and numbers stay numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value. Text and booleans are not numbers here; see
    /// [`crate::query`] for the coercion that rewrites them.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Lower-cased string form used for case-insensitive text matching.
    ///
    /// Returns `None` for nulls so missing cells never match a text filter.
    pub fn folded_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            other => Some(other.to_string().to_lowercase()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Indexes of rows for which `predicate` returns `true`, in row order.
    pub fn matching_rows<F>(&self, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate(row.as_slice()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Rewrite every cell of column `idx` in place.
    ///
    /// Returns the number of cells that `f` turned from non-null into [`Value::Null`].
    pub fn rewrite_column<F>(&mut self, idx: usize, mut f: F) -> usize
    where
        F: FnMut(&Value) -> Value,
    {
        let mut nulled = 0;
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                let out = f(cell);
                if out.is_null() && !cell.is_null() {
                    nulled += 1;
                }
                *cell = out;
            }
        }
        nulled
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("active", DataType::Bool),
            Field::new("name", DataType::Utf8),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Bool(true), Value::Utf8("Ada".to_string())],
            vec![Value::Int64(2), Value::Bool(false), Value::Utf8("Brian".to_string())],
            vec![Value::Int64(3), Value::Bool(true), Value::Null],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn schema_index_of_works() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.index_of("id"), Some(0));
        assert_eq!(ds.schema.index_of("name"), Some(2));
        assert_eq!(ds.schema.index_of("missing"), None);
        assert_eq!(ds.column_names(), vec!["id", "active", "name"]);
    }

    #[test]
    fn matching_rows_preserves_row_order() {
        let ds = sample_dataset();
        let out = ds.matching_rows(|row| matches!(row.get(1), Some(Value::Bool(true))));
        assert_eq!(out, vec![0, 2]);
        assert!(ds.matching_rows(|_| false).is_empty());
    }

    #[test]
    fn rewrite_column_counts_new_nulls_only() {
        let mut ds = sample_dataset();
        let nulled = ds.rewrite_column(2, |v| match v {
            Value::Utf8(s) if s.starts_with('A') => v.clone(),
            _ => Value::Null,
        });
        assert_eq!(nulled, 1);
        assert_eq!(ds.rows[1][2], Value::Null);
        assert_eq!(ds.rows[0][2], Value::Utf8("Ada".to_string()));
    }

    #[test]
    fn folded_text_skips_nulls() {
        assert_eq!(Value::Null.folded_text(), None);
        assert_eq!(Value::Utf8("Ada".into()).folded_text().as_deref(), Some("ada"));
        assert_eq!(Value::Float64(98.5).folded_text().as_deref(), Some("98.5"));
    }

    #[test]
    fn values_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Int64(3),
            Value::Float64(1.5),
            Value::Bool(true),
            Value::Utf8("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3,1.5,true,"x"]"#);
    }
}
