//! Observer hooks for ingestion outcomes and query evaluation events.
//!
//! Nothing in this crate logs on its own. Attach an [`Observer`] through
//! [`crate::ingestion::IngestionOptions::observer`] or
//! [`crate::query::InterpreterOptions::observer`] to record what happened.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{IngestionError, QueryError};
use crate::ingestion::IngestionFormat;
use crate::query::ResultKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path used for ingestion.
    pub path: PathBuf,
    /// Format used for ingestion.
    pub format: IngestionFormat,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of ingested rows.
    pub rows: usize,
    /// Number of columns in the resulting schema.
    pub columns: usize,
}

/// Events emitted while a query is evaluated.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    /// Evaluation began against a dataset snapshot.
    Started {
        query: String,
        rows: usize,
        columns: usize,
    },
    /// Numeric coercion replaced unparsable cells of a column with nulls.
    CoercedToNull { column: String, cells: usize },
    /// A detector produced the answer.
    Answered {
        detector: &'static str,
        kind: ResultKind,
        count: Option<usize>,
        elapsed: Duration,
    },
    /// Evaluation failed with an internal error.
    Failed { detector: &'static str, message: String },
}

/// Observer interface for ingestion outcomes and query events.
///
/// Every method has a no-op default; implement only what you need.
pub trait Observer: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: Severity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called for each query evaluation event.
    fn on_query_event(&self, _event: &QueryEvent) {}
}

impl QueryEvent {
    pub(crate) fn failed(detector: &'static str, error: &QueryError) -> Self {
        Self::Failed {
            detector,
            message: error.to_string(),
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn Observer>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn Observer>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl Observer for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_query_event(&self, event: &QueryEvent) {
        for o in &self.observers {
            o.on_query_event(event);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl Observer for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!("[ingest][ok] {}", describe_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        eprintln!("[ingest][{severity:?}] {}", describe_failure(ctx, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        eprintln!("[ALERT][ingest][{severity:?}] {}", describe_failure(ctx, error));
    }

    fn on_query_event(&self, event: &QueryEvent) {
        eprintln!("[query] {}", describe_query_event(event));
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl Observer for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&format!("ingest ok {}", describe_success(ctx, stats)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        self.append_line(&format!(
            "ingest fail severity={severity:?} {}",
            describe_failure(ctx, error)
        ));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: Severity, error: &IngestionError) {
        self.append_line(&format!(
            "ingest ALERT severity={severity:?} {}",
            describe_failure(ctx, error)
        ));
    }

    fn on_query_event(&self, event: &QueryEvent) {
        self.append_line(&format!("query {}", describe_query_event(event)));
    }
}

fn describe_success(ctx: &IngestionContext, stats: IngestionStats) -> String {
    format!(
        "format={:?} path={} rows={} columns={}",
        ctx.format,
        ctx.path.display(),
        stats.rows,
        stats.columns
    )
}

fn describe_failure(ctx: &IngestionContext, error: &IngestionError) -> String {
    format!(
        "format={:?} path={} err={}",
        ctx.format,
        ctx.path.display(),
        error
    )
}

fn describe_query_event(event: &QueryEvent) -> String {
    match event {
        QueryEvent::Started { query, rows, columns } => {
            format!("started query={query:?} rows={rows} columns={columns}")
        }
        QueryEvent::CoercedToNull { column, cells } => {
            format!("coerced column={column:?} nulled={cells}")
        }
        QueryEvent::Answered {
            detector,
            kind,
            count,
            elapsed,
        } => match count {
            Some(n) => format!("answered detector={detector} type={kind} count={n} elapsed={elapsed:?}"),
            None => format!("answered detector={detector} type={kind} elapsed={elapsed:?}"),
        },
        QueryEvent::Failed { detector, message } => {
            format!("failed detector={detector} err={message}")
        }
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
