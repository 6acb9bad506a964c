#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::csv::parse_bool;
use super::infer::{header_name, is_missing, CellType, ColumnVotes};

/// Ingest an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Validates that all schema fields exist as headers
/// - Reads remaining rows and converts cells into typed `Value`s
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let sheets: Option<Vec<&str>> = sheet_name.map(|s| vec![s]);
    ingest_excel_workbook_from_path(path, sheets.as_deref(), schema)
}

/// Ingest multiple sheets from an Excel workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// All selected tabs must share the header schema.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let ranges = read_sheet_ranges(path.as_ref(), sheet_names)?;

    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for (sheet, range) in &ranges {
        let mut sheet_rows = ingest_sheet_range(sheet, range, schema)?;
        all_rows.append(&mut sheet_rows);
    }

    Ok(DataSet::new(schema.clone(), all_rows))
}

/// Ingest one or more sheets, inferring column types from the cells.
///
/// Column names come from the header row of the first selected sheet. Numeric cells that
/// all hold whole numbers produce an [`DataType::Int64`] column; any fractional number makes
/// the column [`DataType::Float64`]; dates, text and mixed columns become
/// [`DataType::Utf8`].
pub fn ingest_excel_inferred_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> IngestionResult<DataSet> {
    let ranges = read_sheet_ranges(path.as_ref(), sheet_names)?;
    let Some((first_sheet, first_range)) = ranges.first() else {
        return Err(IngestionError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    };

    let (_, header_cells) = find_header_row(first_range)
        .map_err(|e| wrap_schema_err_with_sheet(first_sheet, e))?;
    let names: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, h)| header_name(h, idx))
        .collect();

    let mut votes = vec![ColumnVotes::default(); names.len()];
    for (sheet, range) in &ranges {
        let (header_row_idx, col_idxs) = project_headers(range, &names)
            .map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;
        for row in range.rows().skip(header_row_idx + 1) {
            for (vote, &col_idx) in votes.iter_mut().zip(col_idxs.iter()) {
                vote.add(cell_type(row.get(col_idx).unwrap_or(&Data::Empty)));
            }
        }
    }

    let schema = Schema::new(
        names
            .into_iter()
            .zip(votes.iter().map(ColumnVotes::resolve))
            .map(|(name, data_type)| Field::new(name, data_type))
            .collect(),
    );

    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for (sheet, range) in &ranges {
        let mut sheet_rows = ingest_sheet_range(sheet, range, &schema)?;
        all_rows.append(&mut sheet_rows);
    }

    Ok(DataSet::new(schema, all_rows))
}

fn read_sheet_ranges(
    path: &Path,
    sheet_names: Option<&[&str]>,
) -> IngestionResult<Vec<(String, Range<Data>)>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut ranges = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        ranges.push((sheet, range));
    }
    Ok(ranges)
}

fn ingest_sheet_range(
    sheet: &str,
    range: &Range<Data>,
    schema: &Schema,
) -> IngestionResult<Vec<Vec<Value>>> {
    let names: Vec<String> = schema.field_names().map(str::to_owned).collect();
    let (header_row_idx, col_idxs) =
        project_headers(range, &names).map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate().skip(header_row_idx + 1) {
        // Report 1-based row number (Excel-like).
        let user_row = idx0 + 1;

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &col_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            let col_label = format!("{sheet}:{name}", name = field.name);
            out_row.push(convert_cell(user_row, &col_label, field.data_type, cell)?);
        }
        rows.push(out_row);
    }

    Ok(rows)
}

fn wrap_schema_err_with_sheet(sheet: &str, err: IngestionError) -> IngestionError {
    match err {
        IngestionError::SchemaMismatch { message } => IngestionError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn find_header_row(range: &Range<Data>) -> IngestionResult<(usize, Vec<String>)> {
    range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(cell_to_header_string).collect()))
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })
}

/// Locate the header row and map each wanted column name to its cell index.
fn project_headers(range: &Range<Data>, names: &[String]) -> IngestionResult<(usize, Vec<usize>)> {
    let (header_row_idx, header_cells) = find_header_row(range)?;
    let header_names: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, h)| header_name(h, idx))
        .collect();

    let mut col_idxs: Vec<usize> = Vec::with_capacity(names.len());
    for name in names {
        match header_names.iter().position(|h| h == name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!("missing required column '{name}'. headers={header_cells:?}"),
                });
            }
        }
    }

    Ok((header_row_idx, col_idxs))
}

fn cell_type(c: &Data) -> CellType {
    match c {
        Data::Empty | Data::Error(_) => CellType::Empty,
        Data::Int(_) => CellType::Int,
        Data::Float(f) if f.fract() == 0.0 => CellType::Int,
        Data::Float(_) => CellType::Float,
        Data::Bool(_) => CellType::Bool,
        Data::String(s) => CellType::of_text(s),
        _ => CellType::Text,
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> IngestionResult<Value> {
    if matches!(c, Data::Empty | Data::Error(_)) {
        return Ok(Value::Null);
    }
    if let Data::String(s) = c {
        if is_missing(s) {
            return Ok(Value::Null);
        }
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(cell_to_string(c))),
        DataType::Bool => parse_bool_cell(row, column, c).map(Value::Bool),
        DataType::Int64 => parse_i64_cell(row, column, c).map(Value::Int64),
        DataType::Float64 => parse_f64_cell(row, column, c).map(Value::Float64),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        _ => c.to_string(),
    }
}

fn parse_error(row: usize, column: &str, raw: String, message: impl Into<String>) -> IngestionError {
    IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw,
        message: message.into(),
    }
}

fn parse_bool_cell(row: usize, column: &str, c: &Data) -> IngestionResult<bool> {
    match c {
        Data::Bool(b) => Ok(*b),
        Data::Int(i) => Ok(*i != 0),
        Data::Float(f) => Ok(*f != 0.0),
        Data::String(s) => parse_bool(s).map_err(|message| parse_error(row, column, s.clone(), message)),
        _ => Err(parse_error(row, column, c.to_string(), "expected bool")),
    }
}

fn parse_i64_cell(row: usize, column: &str, c: &Data) -> IngestionResult<i64> {
    match c {
        Data::Int(i) => Ok(*i),
        Data::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        Data::Float(_) => Err(parse_error(
            row,
            column,
            c.to_string(),
            "expected integer (got non-integer float)",
        )),
        Data::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| parse_error(row, column, s.clone(), e.to_string())),
        _ => Err(parse_error(row, column, c.to_string(), "expected integer")),
    }
}

fn parse_f64_cell(row: usize, column: &str, c: &Data) -> IngestionResult<f64> {
    match c {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| parse_error(row, column, s.clone(), e.to_string())),
        _ => Err(parse_error(row, column, c.to_string(), "expected number")),
    }
}
