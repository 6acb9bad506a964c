//! In-memory dataset computations used by the query detectors.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! Filters return row indexes instead of copies so callers can count the full match set and
//! preview only a prefix of it.
//!
//! - [`filter`]: numeric comparisons and case-insensitive text matching
//! - [`reduce()`]: count/sum/mean/min/max, plus [`arg_extreme`] for tied extremes
//!
//! ## Example
//!
//! ```rust
//! use sheet_query::processing::{compare, reduce, Comparison, ReduceOp};
//! use sheet_query::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("score", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("Ada".into()), Value::Float64(10.0)],
//!         vec![Value::Utf8("Grace".into()), Value::Float64(20.0)],
//!         vec![Value::Utf8("Linus".into()), Value::Null],
//!     ],
//! );
//!
//! assert_eq!(compare(&ds, 1, Comparison::Greater, 15.0), vec![1]);
//! assert_eq!(reduce(&ds, "score", ReduceOp::Sum), Some(Value::Float64(30.0)));
//! ```

pub mod filter;
pub mod reduce;

pub use filter::{compare, contains, equals, starts_with, Comparison};
pub use reduce::{arg_extreme, reduce, reduce_at, ReduceOp};
