//! `sheet-query` answers plain-English questions about an uploaded spreadsheet.
//!
//! A CSV (or, with the `excel` feature, a workbook) is loaded into an in-memory
//! [`types::DataSet`] with inferred column types. [`query::interpret`] then matches the
//! question against a fixed, ordered cascade of detectors (row count, filters, sum,
//! average, max/min, value counts) and returns a structured [`query::QueryResponse`].
//! Questions no detector understands get a help answer listing the columns.
//!
//! ## Supported uploads
//!
//! - **CSV**: `.csv`
//! - **Excel/workbooks** (requires the Cargo feature `excel`): `.xlsx`, `.xls`, `.xlsm`,
//!   `.xlsb`, `.ods`
//!
//! Blank cells and common placeholders (`NA`, `N/A`, `null`, `NaN`) load as
//! [`types::Value::Null`].
//!
//! ## Quick example: ask a question
//!
//! ```rust
//! use sheet_query::query::{interpret, InterpreterOptions, ResultKind};
//! use sheet_query::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("fullName", DataType::Utf8),
//!     Field::new("codolio", DataType::Int64),
//! ]);
//! let mut ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("A".to_string()), Value::Int64(900)],
//!         vec![Value::Utf8("B".to_string()), Value::Int64(700)],
//!         vec![Value::Utf8("C".to_string()), Value::Int64(850)],
//!     ],
//! );
//!
//! let resp = interpret(
//!     &mut ds,
//!     "give me fullName where codolio greater than 800",
//!     &InterpreterOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(resp.kind, ResultKind::ConditionalFilter);
//! assert_eq!(resp.count, Some(2));
//! println!("{}", resp.to_json());
//! ```
//!
//! ## Upload, then ask
//!
//! ```no_run
//! use sheet_query::session::QuerySession;
//! use sheet_query::store::{StoreOptions, UploadStore};
//!
//! # fn main() -> Result<(), sheet_query::Error> {
//! let session = QuerySession::new(UploadStore::open("uploads", StoreOptions::default())?);
//! let summary = session.upload("sales.csv", b"region,amount\nnorth,10\nsouth,5\n")?;
//! println!("{} rows, columns {:?}", summary.rows, summary.columns);
//!
//! let resp = session.ask("what is the total amount?")?;
//! println!("{}", resp.answer);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: file loading with type inference or an explicit schema
//! - [`query`]: the detector cascade and response types
//! - [`processing`]: filter/reduce primitives the detectors are built on
//! - [`store`] and [`session`]: upload directory and the upload-then-ask workflow
//! - [`observability`]: observer hooks for ingestion and query events
//! - [`types`] and [`error`]

pub mod error;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod query;
pub mod session;
pub mod store;
pub mod types;

pub use error::{Error, IngestionError, IngestionResult, QueryError, QueryResult, Result};
