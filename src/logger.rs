//! In-memory error log for the findash CLI and SDK
//!
//! Every failed request is recorded here unconditionally before it reaches a
//! caller. Records are append-only, live in memory for the lifetime of the
//! process, and can be forwarded to an external sink in production
//! deployments.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{AppError, ErrorKind, ErrorSeverity};

/// One structured entry in the error log
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub status_code: Option<u16>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub details: Option<serde_json::Value>,
}

/// Aggregate counts over the current log contents
#[derive(Debug, Clone)]
pub struct ErrorStats {
    pub total: usize,
    pub by_severity: HashMap<ErrorSeverity, usize>,
    pub by_kind: HashMap<ErrorKind, usize>,
}

/// External forwarding target for error records
///
/// Implementations must swallow their own failures; logging must never break
/// the application.
pub trait RemoteSink: Send + Sync {
    fn forward(&self, record: &ErrorRecord);
}

/// Append-only error log
///
/// Records are never mutated or removed except by an explicit [`clear`].
/// Console emission goes through `tracing`, levelled by severity, and is
/// gated so release builds stay quiet unless verbose mode is on.
///
/// [`clear`]: ErrorLog::clear
pub struct ErrorLog {
    records: Mutex<Vec<ErrorRecord>>,
    console: bool,
    sink: Option<Arc<dyn RemoteSink>>,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorLog {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            console: cfg!(debug_assertions),
            sink: None,
        }
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn RemoteSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Record an error with no request context
    pub fn record(&self, err: &AppError) {
        self.push(ErrorRecord {
            message: err.message.clone(),
            kind: err.kind,
            severity: err.severity,
            status_code: err.status_code,
            url: None,
            method: None,
            timestamp: err.timestamp,
            details: err.details.clone(),
        });
    }

    /// Record an error raised by an API call
    pub fn record_api(&self, err: &AppError, url: &str, method: &str) {
        self.push(ErrorRecord {
            message: err.message.clone(),
            kind: err.kind,
            severity: err.severity,
            status_code: err.status_code,
            url: Some(url.to_string()),
            method: Some(method.to_string()),
            timestamp: err.timestamp,
            details: err.details.clone(),
        });
    }

    fn push(&self, record: ErrorRecord) {
        if self.console {
            self.emit(&record);
        }
        if let Some(sink) = &self.sink {
            sink.forward(&record);
        }
        self.records.lock().unwrap().push(record);
    }

    fn emit(&self, record: &ErrorRecord) {
        let url = record.url.as_deref().unwrap_or("-");
        let method = record.method.as_deref().unwrap_or("-");
        match record.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => error!(
                kind = record.kind.as_str(),
                status = record.status_code,
                %method,
                %url,
                "{}",
                record.message
            ),
            ErrorSeverity::Medium => warn!(
                kind = record.kind.as_str(),
                status = record.status_code,
                %method,
                %url,
                "{}",
                record.message
            ),
            ErrorSeverity::Low => info!(
                kind = record.kind.as_str(),
                status = record.status_code,
                %method,
                %url,
                "{}",
                record.message
            ),
        }
    }

    /// Copy of all records in insertion order
    pub fn snapshot(&self) -> Vec<ErrorRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bulk clear, the only way records are removed
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Counts by severity and kind; every variant is present as a key
    pub fn stats(&self) -> ErrorStats {
        let records = self.records.lock().unwrap();

        let mut by_severity: HashMap<ErrorSeverity, usize> =
            ErrorSeverity::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_kind: HashMap<ErrorKind, usize> =
            ErrorKind::ALL.iter().map(|k| (*k, 0)).collect();

        for record in records.iter() {
            *by_severity.entry(record.severity).or_default() += 1;
            *by_kind.entry(record.kind).or_default() += 1;
        }

        ErrorStats {
            total: records.len(),
            by_severity,
            by_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_record_appends() {
        let log = ErrorLog::new().with_console(false);
        assert!(log.is_empty());

        log.record(&AppError::from_status(500, "boom"));
        log.record_api(&AppError::from_status(404, "missing"), "/financial/wallet", "GET");

        let records = log.snapshot();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ErrorKind::Server);
        assert_eq!(records[0].url, None);
        assert_eq!(records[1].url.as_deref(), Some("/financial/wallet"));
        assert_eq!(records[1].method.as_deref(), Some("GET"));
    }

    #[test]
    fn test_stats_counts_by_kind_and_severity() {
        let log = ErrorLog::new().with_console(false);
        log.record(&AppError::from_status(500, "a"));
        log.record(&AppError::from_status(502, "b"));
        log.record(&AppError::from_status(401, "c"));
        log.record(&AppError::network("d"));

        let stats = log.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_kind[&ErrorKind::Server], 2);
        assert_eq!(stats.by_kind[&ErrorKind::Authentication], 1);
        assert_eq!(stats.by_kind[&ErrorKind::Network], 1);
        assert_eq!(stats.by_kind[&ErrorKind::Validation], 0);
        assert_eq!(stats.by_severity[&ErrorSeverity::Critical], 2);
        assert_eq!(stats.by_severity[&ErrorSeverity::High], 1);
        assert_eq!(stats.by_severity[&ErrorSeverity::Low], 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let log = ErrorLog::new().with_console(false);
        log.record(&AppError::from_status(500, "a"));
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.stats().total, 0);
    }

    #[test]
    fn test_sink_receives_every_record() {
        struct CountingSink(AtomicUsize);
        impl RemoteSink for CountingSink {
            fn forward(&self, _record: &ErrorRecord) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let sink = Arc::new(CountingSink(AtomicUsize::new(0)));
        let log = ErrorLog::new().with_console(false).with_sink(sink.clone());
        log.record(&AppError::from_status(500, "a"));
        log.record(&AppError::network("b"));

        assert_eq!(sink.0.load(Ordering::SeqCst), 2);
    }
}
