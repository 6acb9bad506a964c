//! Column classification, numeric coercion and name resolution.

use crate::types::{DataSet, DataType, Schema, Value};

use super::text::QueryText;

/// Column indexes split into numeric and categorical sets, each in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnClasses {
    pub numeric: Vec<usize>,
    pub categorical: Vec<usize>,
}

impl ColumnClasses {
    /// Int64/Float64 fields are numeric; text, booleans and everything else are categorical.
    pub fn classify(schema: &Schema) -> Self {
        let (numeric, categorical): (Vec<usize>, Vec<usize>) = (0..schema.fields.len())
            .partition(|&idx| schema.fields[idx].data_type.is_numeric());
        Self {
            numeric,
            categorical,
        }
    }

    pub fn is_numeric(&self, idx: usize) -> bool {
        self.numeric.contains(&idx)
    }

    pub fn first_numeric(&self) -> Option<usize> {
        self.numeric.first().copied()
    }

    pub fn first_categorical(&self) -> Option<usize> {
        self.categorical.first().copied()
    }
}

/// Rewrite every cell of the numeric columns to a number or null, in place.
///
/// Numbers are kept, numeric text is parsed, booleans become 1/0, anything else becomes
/// [`Value::Null`]. Running it again on its own output changes nothing.
///
/// Returns `(column index, cells turned into null)` for columns that lost values.
pub fn coerce_numeric_columns(dataset: &mut DataSet, classes: &ColumnClasses) -> Vec<(usize, usize)> {
    let mut nulled = Vec::new();
    for &idx in &classes.numeric {
        let data_type = dataset.schema.fields[idx].data_type;
        let count = dataset.rewrite_column(idx, |cell| coerce_cell(cell, data_type));
        if count > 0 {
            nulled.push((idx, count));
        }
    }
    nulled
}

fn coerce_cell(cell: &Value, data_type: DataType) -> Value {
    match cell {
        Value::Int64(_) | Value::Null => cell.clone(),
        Value::Float64(v) if v.is_nan() => Value::Null,
        Value::Float64(_) => cell.clone(),
        Value::Bool(b) => Value::Int64(i64::from(*b)),
        Value::Utf8(s) => {
            let s = s.trim();
            if data_type == DataType::Int64 {
                if let Ok(i) = s.parse::<i64>() {
                    return Value::Int64(i);
                }
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| !f.is_nan())
                .map_or(Value::Null, Value::Float64)
        }
    }
}

/// Resolve a free-text token to a column: exact case-insensitive name match first, then
/// the first column whose name contains the token or is contained in it.
pub fn resolve_column(schema: &Schema, token: &str) -> Option<usize> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }
    let names: Vec<String> = schema.field_names().map(str::to_lowercase).collect();
    names.iter().position(|name| *name == token).or_else(|| {
        names
            .iter()
            .position(|name| name.contains(&token) || token.contains(name.as_str()))
    })
}

/// Target column for sum/average/max/min.
///
/// The first numeric column (schema order) whose lower-cased name appears in the sanitized
/// query, else the first numeric column, else `None`.
pub fn aggregate_target(schema: &Schema, classes: &ColumnClasses, text: &QueryText) -> Option<usize> {
    classes
        .numeric
        .iter()
        .copied()
        .find(|&idx| {
            let name = schema.fields[idx].name.to_lowercase();
            text.sanitized.contains(&name)
        })
        .or_else(|| classes.first_numeric())
}

#[cfg(test)]
mod tests {
    use super::{aggregate_target, coerce_numeric_columns, resolve_column, ColumnClasses};
    use crate::query::text::QueryText;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("scoreboard", DataType::Utf8),
            Field::new("score", DataType::Float64),
            Field::new("active", DataType::Bool),
            Field::new("age", DataType::Int64),
        ])
    }

    #[test]
    fn classify_splits_by_type() {
        let classes = ColumnClasses::classify(&schema());
        assert_eq!(classes.numeric, vec![1, 3]);
        assert_eq!(classes.categorical, vec![0, 2]);
    }

    #[test]
    fn exact_match_beats_substring() {
        let s = schema();
        assert_eq!(resolve_column(&s, "score"), Some(1));
        assert_eq!(resolve_column(&s, "SCOREBOARD"), Some(0));
        assert_eq!(resolve_column(&s, "board"), Some(0));
        assert_eq!(resolve_column(&s, "ages"), Some(3));
        assert_eq!(resolve_column(&s, "salary"), None);
        assert_eq!(resolve_column(&s, "  "), None);
    }

    #[test]
    fn aggregate_target_prefers_mentioned_numeric_column() {
        let s = schema();
        let classes = ColumnClasses::classify(&s);
        assert_eq!(aggregate_target(&s, &classes, &QueryText::new("average age")), Some(3));
        assert_eq!(aggregate_target(&s, &classes, &QueryText::new("total please")), Some(1));

        let text_only = Schema::new(vec![Field::new("name", DataType::Utf8)]);
        let classes = ColumnClasses::classify(&text_only);
        assert_eq!(aggregate_target(&text_only, &classes, &QueryText::new("sum")), None);
    }

    #[test]
    fn coercion_is_idempotent() {
        let s = Schema::new(vec![
            Field::new("n", DataType::Int64),
            Field::new("x", DataType::Float64),
        ]);
        let mut ds = DataSet::new(
            s,
            vec![
                vec![Value::Utf8(" 7 ".into()), Value::Utf8("2.5".into())],
                vec![Value::Utf8("n/a".into()), Value::Bool(true)],
                vec![Value::Int64(3), Value::Float64(f64::NAN)],
            ],
        );
        let classes = ColumnClasses::classify(&ds.schema);

        let nulled = coerce_numeric_columns(&mut ds, &classes);
        assert_eq!(nulled, vec![(0, 1), (1, 1)]);
        let once = ds.clone();
        assert_eq!(
            once.rows,
            vec![
                vec![Value::Int64(7), Value::Float64(2.5)],
                vec![Value::Null, Value::Int64(1)],
                vec![Value::Int64(3), Value::Null],
            ]
        );

        assert!(coerce_numeric_columns(&mut ds, &classes).is_empty());
        assert_eq!(ds, once);
    }
}
