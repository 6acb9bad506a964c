use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = std::result::Result<T, IngestionError>;

/// Convenience result type for query interpretation.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Convenience result type for session-level calls that may ingest and interpret.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV and (optional) spreadsheet ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal error while scanning the upload store.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The input does not conform to the expected shape (missing columns, no header, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Internal failure while evaluating a query.
///
/// Expected outcomes (no numeric column, unmatched query) are answers, not errors.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A row does not have one value per schema field.
    #[error("row {row} has {actual} values but the schema has {expected} fields")]
    RowShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A number captured from the query text could not be parsed.
    #[error("invalid number '{raw}' in query: {message}")]
    InvalidNumber { raw: String, message: String },
}

/// Top-level error for [`crate::session::QuerySession`].
#[derive(Debug, Error)]
pub enum Error {
    /// No dataset has been uploaded yet.
    #[error("no dataset uploaded")]
    NoActiveDataset,

    /// Loading the active dataset failed.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Query evaluation failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

#[cfg(test)]
mod tests {
    use super::{Error, IngestionError, IngestionResult, QueryError, QueryResult, Result};

    fn missing_column() -> IngestionResult<()> {
        Err(IngestionError::SchemaMismatch {
            message: "missing required column 'id'".to_string(),
        })
    }

    fn bad_threshold() -> QueryResult<f64> {
        Err(QueryError::InvalidNumber {
            raw: "1.2.3".to_string(),
            message: "invalid float literal".to_string(),
        })
    }

    fn session_call(fail_ingest: bool) -> Result<f64> {
        if fail_ingest {
            missing_column()?;
        }
        Ok(bad_threshold()?)
    }

    #[test]
    fn aliases_convert_into_session_error() {
        assert!(matches!(session_call(true), Err(Error::Ingestion(_))));
        let err = session_call(false).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::InvalidNumber { .. })));
        assert_eq!(err.to_string(), "invalid number '1.2.3' in query: invalid float literal");
    }
}
