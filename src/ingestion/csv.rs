//! CSV ingestion implementation.

use std::path::Path;

use csv::StringRecord;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::infer::{header_name, infer_column_types, is_missing};

/// Ingest a CSV file into an in-memory [`DataSet`] using an explicit schema.
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader using an explicit schema.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let record = result?;
        rows.push(project_record(row_idx0, &record, schema, &col_idxs)?);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Ingest a CSV file, inferring column types from the data.
///
/// Column order follows the header row. See [`super::infer`] for the inference rules.
pub fn ingest_csv_inferred_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    ingest_csv_inferred_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing reader, inferring column types from the data.
pub fn ingest_csv_inferred_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "csv has no header row".to_string(),
        });
    }

    // Inference needs every value before the first one can be typed.
    let records = rdr.records().collect::<Result<Vec<StringRecord>, _>>()?;
    let types = infer_column_types(headers.len(), &records);

    let schema = Schema::new(
        headers
            .iter()
            .zip(types)
            .enumerate()
            .map(|(idx, (name, data_type))| Field::new(header_name(name, idx), data_type))
            .collect(),
    );
    let col_idxs: Vec<usize> = (0..schema.fields.len()).collect();

    let rows = records
        .iter()
        .enumerate()
        .map(|(row_idx0, record)| project_record(row_idx0, record, &schema, &col_idxs))
        .collect::<IngestionResult<Vec<_>>>()?;

    Ok(DataSet::new(schema, rows))
}

fn project_record(
    row_idx0: usize,
    record: &StringRecord,
    schema: &Schema,
    col_idxs: &[usize],
) -> IngestionResult<Vec<Value>> {
    // Report 1-based row number for users; +1 again because header is row 1.
    let user_row = row_idx0 + 2;

    let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
    for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
        let raw = record.get(csv_idx).unwrap_or("");
        row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
    }
    Ok(row)
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_err),
    }
}

pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
