//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which loads an uploaded file into an
//! in-memory [`crate::types::DataSet`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If [`IngestionOptions::schema`] is `None`, column types are inferred from the data.
//! - If an [`crate::observability::Observer`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

use super::csv;
use crate::observability::{IngestionContext, IngestionStats, Observer, Severity};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// How to choose sheet(s) when ingesting an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet (default).
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
    /// Ingest all sheets and concatenate rows.
    AllSheets,
    /// Ingest only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases: auto-detected format, inferred column types, first
/// sheet of a workbook, no observer.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// If `None`, infer column names and types from the file itself.
    pub schema: Option<Schema>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn Observer>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("schema_fields", &self.schema.as_ref().map(|s| s.fields.len()))
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            schema: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use sheet_query::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), sheet_query::IngestionError> {
/// // Uses `.csv` to select CSV ingestion and infers column types.
/// let ds = ingest_from_path("uploads/people.csv", &IngestionOptions::default())?;
/// println!("rows={} columns={:?}", ds.row_count(), ds.column_names());
/// # Ok(())
/// # }
/// ```
///
/// Forcing a schema and a format:
///
/// ```no_run
/// use sheet_query::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
/// use sheet_query::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), sheet_query::IngestionError> {
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Csv),
///     schema: Some(Schema::new(vec![Field::new("id", DataType::Int64)])),
///     ..Default::default()
/// };
/// let ds = ingest_from_path("input_without_extension", &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match (fmt, options.schema.as_ref()) {
        (IngestionFormat::Csv, Some(schema)) => csv::ingest_csv_from_path(path, schema),
        (IngestionFormat::Csv, None) => csv::ingest_csv_inferred_from_path(path),
        (IngestionFormat::Excel, schema) => {
            ingest_excel_dispatch(path, schema, &options.excel_sheet_selection)
        }
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: ds.row_count(),
                    columns: ds.schema.fields.len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn severity_for_error(e: &IngestionError) -> Severity {
    match e {
        IngestionError::Io(_) | IngestionError::Walk(_) => Severity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => Severity::Error,
        IngestionError::SchemaMismatch { .. } => Severity::Error,
        IngestionError::ParseError { .. } => Severity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<IngestionFormat> {
    IngestionFormat::from_path(path).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension of path ({})",
            path.display()
        ),
    })
}

fn ingest_excel_dispatch(
    path: &Path,
    schema: Option<&Schema>,
    sel: &ExcelSheetSelection,
) -> IngestionResult<DataSet> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, schema, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        let names: Option<Vec<&str>> = match sel {
            ExcelSheetSelection::First => None,
            ExcelSheetSelection::Sheet(name) => Some(vec![name.as_str()]),
            ExcelSheetSelection::AllSheets => None,
            ExcelSheetSelection::Sheets(names) => Some(names.iter().map(String::as_str).collect()),
        };

        match (sel, schema) {
            (ExcelSheetSelection::First, Some(schema)) => excel::ingest_excel_from_path(path, None, schema),
            (ExcelSheetSelection::First, None) => {
                let first = first_sheet_name(path)?;
                excel::ingest_excel_inferred_from_path(path, Some(&[first.as_str()][..]))
            }
            (_, Some(schema)) => excel::ingest_excel_workbook_from_path(path, names.as_deref(), schema),
            (_, None) => excel::ingest_excel_inferred_from_path(path, names.as_deref()),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::SchemaMismatch {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(feature = "excel")]
fn first_sheet_name(path: &Path) -> IngestionResult<String> {
    use calamine::{open_workbook_auto, Reader};

    let workbook = open_workbook_auto(path)?;
    workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{infer_format_from_path, IngestionFormat};
    use std::path::Path;

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(IngestionFormat::from_extension("CSV"), Some(IngestionFormat::Csv));
        assert_eq!(IngestionFormat::from_extension("xlsx"), Some(IngestionFormat::Excel));
        assert_eq!(IngestionFormat::from_extension("ods"), Some(IngestionFormat::Excel));
        assert_eq!(IngestionFormat::from_extension("json"), None);
    }

    #[test]
    fn unknown_extension_is_schema_mismatch() {
        let err = infer_format_from_path(Path::new("upload.txt")).unwrap_err();
        assert!(err.to_string().contains("cannot infer format"));
        assert!(infer_format_from_path(Path::new("no_extension")).is_err());
    }
}
