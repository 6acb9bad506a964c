//! Upload directory that holds the datasets a session can query.
//!
//! Uploads are written into a single directory. The "active" dataset is whichever
//! supported file was modified most recently, so a new upload replaces the previous one
//! for subsequent questions without deleting it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
use crate::types::DataSet;

/// Options for [`UploadStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Lower-case file extensions accepted by [`UploadStore::save`] and considered by
    /// [`UploadStore::latest`].
    pub allowed_extensions: Vec<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            allowed_extensions: ["csv", "xlsx", "xls"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StoreOptions {
    fn allows(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|a| *a == ext) && IngestionFormat::from_extension(&ext).is_some()
    }
}

/// What an upload contained, reported back to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

/// A directory of uploaded datasets.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    options: StoreOptions,
}

impl UploadStore {
    /// Open (creating if needed) an upload directory.
    pub fn open(root: impl Into<PathBuf>, options: StoreOptions) -> IngestionResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, options })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an upload and parse it once to summarize it.
    ///
    /// Only the final path component of `file_name` is used. A file that cannot be
    /// parsed is removed again and the parse error returned.
    pub fn save(
        &self,
        file_name: &str,
        bytes: &[u8],
        ingestion: &IngestionOptions,
    ) -> IngestionResult<DatasetSummary> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("invalid upload file name '{file_name}'"),
            })?;

        let path = self.root.join(name);
        if !self.options.allows(&path) {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "unsupported file type '{name}' (allowed: {})",
                    self.options.allowed_extensions.join(", ")
                ),
            });
        }

        fs::write(&path, bytes)?;
        match ingest_from_path(&path, ingestion) {
            Ok(ds) => Ok(DatasetSummary {
                file_name: name.to_string(),
                columns: ds.column_names(),
                rows: ds.row_count(),
            }),
            Err(e) => {
                let _ = fs::remove_file(&path);
                Err(e)
            }
        }
    }

    /// The most recently modified supported file, if any.
    ///
    /// Only the top level of the directory is scanned. Ties on modification time go to the
    /// lexicographically greatest path.
    pub fn latest(&self) -> IngestionResult<Option<PathBuf>> {
        let mut best: Option<(SystemTime, PathBuf)> = None;
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.options.allows(entry.path()) {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            let candidate = (modified, entry.into_path());
            if best.as_ref().is_none_or(|b| candidate > *b) {
                best = Some(candidate);
            }
        }
        Ok(best.map(|(_, path)| path))
    }

    /// Ingest the latest upload, or `None` when the store is empty.
    pub fn load_latest(&self, ingestion: &IngestionOptions) -> IngestionResult<Option<DataSet>> {
        match self.latest()? {
            Some(path) => ingest_from_path(path, ingestion).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{StoreOptions, UploadStore};
    use crate::error::IngestionError;
    use crate::ingestion::IngestionOptions;

    fn tmp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("sheet_query_store_{tag}_{nanos}"))
    }

    fn store(tag: &str) -> UploadStore {
        UploadStore::open(tmp_dir(tag), StoreOptions::default()).unwrap()
    }

    #[test]
    fn save_summarizes_upload() {
        let store = store("save");
        let summary = store
            .save("people.csv", b"name,age\nAnn,30\nBob,41\n", &IngestionOptions::default())
            .unwrap();
        assert_eq!(summary.file_name, "people.csv");
        assert_eq!(summary.columns, vec!["name", "age"]);
        assert_eq!(summary.rows, 2);
        assert!(store.root().join("people.csv").exists());
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn save_strips_directories_from_name() {
        let store = store("strip");
        let summary = store
            .save("../../evil.csv", b"a\n1\n", &IngestionOptions::default())
            .unwrap();
        assert_eq!(summary.file_name, "evil.csv");
        assert!(store.root().join("evil.csv").exists());
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn save_rejects_unsupported_extension() {
        let store = store("ext");
        let err = store
            .save("notes.txt", b"hello", &IngestionOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestionError::SchemaMismatch { .. }));
        assert!(!store.root().join("notes.txt").exists());
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn unparsable_upload_is_removed() {
        let store = store("bad");
        let err = store.save("empty.csv", b"", &IngestionOptions::default());
        assert!(err.is_err());
        assert!(!store.root().join("empty.csv").exists());
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn latest_picks_most_recent_supported_file() {
        let store = store("latest");
        assert_eq!(store.latest().unwrap(), None);
        assert!(store.load_latest(&IngestionOptions::default()).unwrap().is_none());

        store.save("old.csv", b"a\n1\n", &IngestionOptions::default()).unwrap();
        fs::write(store.root().join("readme.txt"), b"ignored").unwrap();
        std::thread::sleep(Duration::from_millis(20));
        store.save("new.csv", b"b\n2\n3\n", &IngestionOptions::default()).unwrap();

        assert_eq!(store.latest().unwrap(), Some(store.root().join("new.csv")));
        let ds = store.load_latest(&IngestionOptions::default()).unwrap().unwrap();
        assert_eq!(ds.column_names(), vec!["b"]);
        assert_eq!(ds.row_count(), 2);
        let _ = fs::remove_dir_all(store.root());
    }
}
