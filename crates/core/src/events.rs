//! Structured event logging
//!
//! Every step of an upload brackets itself with lifecycle events keyed by an
//! action name (`find-bucket`, `upload`, ...). Logging an error never ends
//! the process; the caller returns the error and the binary decides.

use crate::error::Error;

/// Lifecycle marker: an action is about to run
pub const STARTING: &str = "starting";

/// Lifecycle marker: an action completed
pub const DONE: &str = "done";

/// Existence check outcome: bucket present
pub const FOUND: &str = "found";

/// Existence check outcome: bucket absent
pub const NOT_FOUND: &str = "not-found";

/// Sink for upload lifecycle events
pub trait EventSink: Send + Sync {
    /// Record a lifecycle event for an action
    fn event(&self, action: &str, event: &str);

    /// Record a failed action
    fn error(&self, action: &str, err: &Error);
}

/// Event sink backed by `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn event(&self, action: &str, event: &str) {
        tracing::info!(action, event, "{action}");
    }

    fn error(&self, action: &str, err: &Error) {
        tracing::error!(action, error = %err, "{action}");
    }
}

/// Log an error under `action` before handing it back
pub(crate) trait LogErr<T> {
    fn log_err(self, sink: &dyn EventSink, action: &str) -> crate::Result<T>;
}

impl<T> LogErr<T> for crate::Result<T> {
    fn log_err(self, sink: &dyn EventSink, action: &str) -> crate::Result<T> {
        self.inspect_err(|e| sink.error(action, e))
    }
}

/// Event sink that keeps every event in memory, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    /// Recorded entries as `action:event`, errors as `action:error`
    pub(crate) fn entries(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn event(&self, action: &str, event: &str) {
        self.events.lock().unwrap().push(format!("{action}:{event}"));
    }

    fn error(&self, action: &str, _err: &Error) {
        self.events.lock().unwrap().push(format!("{action}:error"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_err_records_failure() {
        let sink = RecordingSink::default();
        let result: crate::Result<()> = Err(Error::Network("boom".into()));
        let err = result.log_err(&sink, "upload").unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(sink.entries(), vec!["upload:error"]);
    }

    #[test]
    fn test_log_err_passes_success_through() {
        let sink = RecordingSink::default();
        let result: crate::Result<i32> = Ok(7);
        let value = result.log_err(&sink, "upload").unwrap();
        assert_eq!(value, 7);
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        let sink = TracingSink;
        sink.event("upload", STARTING);
        sink.error("upload", &Error::General("boom".into()));
    }
}
