//! System log sinks
//!
//! The structured system log is owned by the host. This module only defines the
//! boundary (`SystemLogSink`) plus two implementations: one that forwards to
//! `tracing` and one that keeps entries in memory.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A leveled structured logger supplied by the host
///
/// Thread safety of the underlying log is the implementor's contract.
pub trait SystemLogSink: Send + Sync {
    /// Record a message, optionally with the error that caused it
    fn log(&self, level: LogLevel, message: &str, cause: Option<&(dyn Error + 'static)>);
}

/// Factory creating a named system log sink
pub type SystemLogFactory = Arc<dyn Fn(&str) -> Arc<dyn SystemLogSink> + Send + Sync>;

/// Factory used when the host did not supply one
pub fn default_system_log_factory() -> SystemLogFactory {
    Arc::new(|name: &str| Arc::new(TracingSystemLog::new(name)) as Arc<dyn SystemLogSink>)
}

/// System log backed by the `tracing` crate
///
/// Events are emitted under the `packlog` target with the logger name and the
/// cause (if any) as fields. Installing a subscriber is up to the host.
#[derive(Debug, Clone)]
pub struct TracingSystemLog {
    name: String,
}

impl TracingSystemLog {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SystemLogSink for TracingSystemLog {
    fn log(&self, level: LogLevel, message: &str, cause: Option<&(dyn Error + 'static)>) {
        let name = self.name.as_str();
        macro_rules! event {
            ($lvl:expr) => {
                match cause {
                    Some(cause) => tracing::event!(
                        target: "packlog",
                        $lvl,
                        logger = %name,
                        cause = %cause,
                        "{}",
                        message
                    ),
                    None => tracing::event!(target: "packlog", $lvl, logger = %name, "{}", message),
                }
            };
        }

        match level {
            LogLevel::Trace => event!(tracing::Level::TRACE),
            LogLevel::Debug => event!(tracing::Level::DEBUG),
            LogLevel::Info => event!(tracing::Level::INFO),
            LogLevel::Warn => event!(tracing::Level::WARN),
            LogLevel::Error => event!(tracing::Level::ERROR),
        }
    }
}

/// One recorded system log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Display form of the attached cause
    pub cause: Option<String>,
}

/// In-memory system log for testing and embedding
///
/// # Example
///
/// ```
/// use packlog_core::sink::{LogLevel, MemorySystemLog, SystemLogSink};
///
/// let log = MemorySystemLog::new("packlog.test");
/// log.log(LogLevel::Info, "hello", None);
/// assert_eq!(log.entries()[0].message, "hello");
/// ```
#[derive(Debug, Default)]
pub struct MemorySystemLog {
    name: String,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySystemLog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Entries at exactly `level`
    pub fn at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl SystemLogSink for MemorySystemLog {
    fn log(&self, level: LogLevel, message: &str, cause: Option<&(dyn Error + 'static)>) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
            cause: cause.map(|c| c.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Sink;

    #[test]
    fn test_log_levels() {
        assert!(LogLevel::Debug > LogLevel::Trace);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
        assert_eq!(LogLevel::Warn.to_string(), "WARNING");
    }

    #[test]
    fn test_memory_system_log_records_cause() {
        let log = MemorySystemLog::new("packlog.error");
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "broken");
        log.log(LogLevel::Error, "failed", Some(&cause));

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(entries[0].cause.as_deref(), Some("broken"));
        assert_eq!(log.name(), "packlog.error");
    }

    #[test]
    fn test_system_sink_uses_fixed_level() {
        let log = Arc::new(MemorySystemLog::new("packlog.progress"));
        let sink = Sink::system(log.clone(), LogLevel::Warn);
        sink.emit("low disk");
        assert_eq!(log.at(LogLevel::Warn).len(), 1);
        assert!(log.at(LogLevel::Info).is_empty());
    }

    #[test]
    fn test_tracing_system_log() {
        // No subscriber installed; this only checks every level dispatches
        let log = TracingSystemLog::new("packlog.test");
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let levels = [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ];
        for level in levels {
            log.log(level, "message", None);
            log.log(level, "message", Some(&cause));
        }
        assert_eq!(log.name(), "packlog.test");
    }

    #[test]
    fn test_default_factory() {
        let factory = default_system_log_factory();
        let sink = factory("packlog.command");
        sink.log(LogLevel::Info, "hello", None);
    }
}
