//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - infers column types unless a [`crate::types::Schema`] is supplied
//! - optionally reports success/failure/alerts to a [`crate::observability::Observer`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (Cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod infer;
pub mod unified;

pub use infer::infer_column_types;
pub use unified::{ingest_from_path, ExcelSheetSelection, IngestionFormat, IngestionOptions};
