//! Natural-language question answering over an in-memory [`DataSet`].
//!
//! [`interpret`] classifies the dataset's columns, coerces numeric columns in place and
//! then walks a fixed cascade of detectors. Each detector pairs a keyword check on the
//! question with an executor; the first executor that produces an answer wins. When
//! nothing matches, a help answer lists the available columns and example questions.
//!
//! # Example
//!
//! ```
//! use sheet_query::query::{interpret, InterpreterOptions, ResultKind};
//! use sheet_query::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("score", DataType::Int64),
//! ]);
//! let mut ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("Ann".to_string()), Value::Int64(7)],
//!         vec![Value::Utf8("Bob".to_string()), Value::Int64(5)],
//!     ],
//! );
//!
//! let resp = interpret(&mut ds, "what is the total score?", &InterpreterOptions::default()).unwrap();
//! assert_eq!(resp.kind, ResultKind::Sum);
//! assert_eq!(resp.value, Some(12.0));
//! ```

mod columns;
mod detectors;
mod response;
mod text;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{QueryError, QueryResult};
use crate::observability::{Observer, QueryEvent};
use crate::types::DataSet;

pub use columns::{aggregate_target, coerce_numeric_columns, resolve_column, ColumnClasses};
pub use detectors::detector_order;
pub use response::{format_number, QueryResponse, ResultKind, RowPreview, NO_NUMERIC_COLUMN_ANSWER};
pub use text::QueryText;

use detectors::{help, Ctx, DETECTORS, HELP};

/// Options for [`interpret`].
#[derive(Clone)]
pub struct InterpreterOptions {
    /// Maximum number of full-row previews in `details`.
    pub max_preview_rows: usize,
    /// Maximum number of selected values a conditional filter returns.
    pub max_preview_values: usize,
    /// Optional observer for query events.
    pub observer: Option<Arc<dyn Observer>>,
}

impl fmt::Debug for InterpreterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpreterOptions")
            .field("max_preview_rows", &self.max_preview_rows)
            .field("max_preview_values", &self.max_preview_values)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_preview_rows: 10,
            max_preview_values: 20,
            observer: None,
        }
    }
}

impl InterpreterOptions {
    fn emit(&self, event: QueryEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_query_event(&event);
        }
    }
}

/// Answer `query` against `dataset`.
///
/// Numeric columns are coerced in place before detection: unparsable cells become nulls.
/// Coercion is idempotent, so asking the same question twice gives the same answer.
///
/// Unrecognized questions and aggregates over datasets without numeric columns are
/// answered normally. Errors are reserved for datasets whose rows do not match their
/// schema and for internal failures inside a detector.
pub fn interpret(dataset: &mut DataSet, query: &str, options: &InterpreterOptions) -> QueryResult<QueryResponse> {
    let started = Instant::now();
    check_row_shape(dataset)?;

    options.emit(QueryEvent::Started {
        query: query.to_string(),
        rows: dataset.row_count(),
        columns: dataset.schema.fields.len(),
    });

    let classes = ColumnClasses::classify(&dataset.schema);
    for (idx, cells) in coerce_numeric_columns(dataset, &classes) {
        options.emit(QueryEvent::CoercedToNull {
            column: dataset.schema.fields[idx].name.clone(),
            cells,
        });
    }

    let text = QueryText::new(query);
    let ctx = Ctx {
        text: &text,
        dataset,
        classes: &classes,
        options,
    };

    for detector in DETECTORS {
        if !(detector.applies)(&text) {
            continue;
        }
        match (detector.run)(&ctx) {
            Ok(Some(resp)) => return Ok(finish(resp, query, detector.name, started, options)),
            Ok(None) => {}
            Err(e) => {
                options.emit(QueryEvent::failed(detector.name, &e));
                return Err(e);
            }
        }
    }

    Ok(finish(help(&ctx), query, HELP, started, options))
}

fn finish(
    mut resp: QueryResponse,
    query: &str,
    detector: &'static str,
    started: Instant,
    options: &InterpreterOptions,
) -> QueryResponse {
    resp.query = query.to_string();
    options.emit(QueryEvent::Answered {
        detector,
        kind: resp.kind,
        count: resp.count,
        elapsed: started.elapsed(),
    });
    resp
}

fn check_row_shape(dataset: &DataSet) -> QueryResult<()> {
    let expected = dataset.schema.fields.len();
    match dataset.rows.iter().position(|row| row.len() != expected) {
        Some(pos) => Err(QueryError::RowShape {
            row: pos + 1,
            expected,
            actual: dataset.rows[pos].len(),
        }),
        None => Ok(()),
    }
}
