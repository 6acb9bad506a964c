//! Upload-then-ask workflow over an [`UploadStore`].

use crate::error::{Error, IngestionResult, Result};
use crate::ingestion::IngestionOptions;
use crate::query::{interpret, InterpreterOptions, QueryResponse};
use crate::store::{DatasetSummary, UploadStore};

/// Answers questions about whichever upload is currently active.
///
/// The dataset is reloaded from the store for every question, so a new upload takes
/// effect immediately and numeric coercion never leaks from one question to the next.
#[derive(Debug, Clone)]
pub struct QuerySession {
    pub store: UploadStore,
    pub ingestion: IngestionOptions,
    pub interpreter: InterpreterOptions,
}

impl QuerySession {
    pub fn new(store: UploadStore) -> Self {
        Self {
            store,
            ingestion: IngestionOptions::default(),
            interpreter: InterpreterOptions::default(),
        }
    }

    /// Save an upload; it becomes the active dataset.
    pub fn upload(&self, file_name: &str, bytes: &[u8]) -> IngestionResult<DatasetSummary> {
        self.store.save(file_name, bytes, &self.ingestion)
    }

    /// Answer `query` against the active dataset.
    ///
    /// # Errors
    ///
    /// [`Error::NoActiveDataset`] before the first upload; ingestion or query errors
    /// otherwise.
    pub fn ask(&self, query: &str) -> Result<QueryResponse> {
        let mut dataset = self
            .store
            .load_latest(&self.ingestion)?
            .ok_or(Error::NoActiveDataset)?;
        Ok(interpret(&mut dataset, query, &self.interpreter)?)
    }
}
