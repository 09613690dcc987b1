//! Sink primitives
//!
//! A `Sink` is where a single rendered message ends up:
//! - the discarding sink drops everything
//! - a writer-backed sink hands the message to a host function (stdout, a buffer, a system log)
//! - a timestamped sink prefixes `[HH:MM:SS.mmm] ` at emission time and forwards to a writer
//!
//! Sinks are immutable and cheap to clone. Deriving a timestamped sink is idempotent.

mod clock;
mod console;
mod system;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

pub use clock::{timestamp_prefix, Clock, FixedClock, SystemClock};
pub use console::ConsoleLogger;
pub use system::{
    default_system_log_factory, LogEntry, LogLevel, MemorySystemLog, SystemLogFactory,
    SystemLogSink, TracingSystemLog,
};

/// Host-supplied string consumer
pub type Writer = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone)]
enum SinkKind {
    Discard,
    Write(Writer),
    Timestamped { writer: Writer, clock: Arc<dyn Clock> },
}

/// A destination for rendered messages
#[derive(Clone)]
pub struct Sink {
    kind: SinkKind,
}

impl Default for Sink {
    fn default() -> Self {
        Self::discard()
    }
}

impl Sink {
    /// The sink that accepts and drops every message
    pub fn discard() -> Self {
        Self { kind: SinkKind::Discard }
    }

    /// Wrap a host writer
    pub fn from_fn<F>(writer: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self::from_writer(Arc::new(writer))
    }

    /// Wrap an already shared host writer
    pub fn from_writer(writer: Writer) -> Self {
        Self { kind: SinkKind::Write(writer) }
    }

    /// Line-oriented standard output
    ///
    /// Panics like `println!` if stdout is gone; a broken console is not hidden.
    pub fn stdout() -> Self {
        Self::from_fn(|msg| println!("{}", msg))
    }

    /// Line-oriented standard error
    pub fn stderr() -> Self {
        Self::from_fn(|msg| eprintln!("{}", msg))
    }

    /// Forward every message to a system log at a fixed severity
    pub fn system(logger: Arc<dyn SystemLogSink>, level: LogLevel) -> Self {
        Self::from_fn(move |msg| logger.log(level, msg, None))
    }

    /// Hand one message to the sink
    pub fn emit(&self, message: &str) {
        match &self.kind {
            SinkKind::Discard => {}
            SinkKind::Write(writer) => writer(message),
            SinkKind::Timestamped { writer, clock } => {
                let mut line = timestamp_prefix(clock.now());
                line.push_str(message);
                writer(&line);
            }
        }
    }

    pub fn is_discard(&self) -> bool {
        matches!(self.kind, SinkKind::Discard)
    }

    pub fn is_timestamped(&self) -> bool {
        matches!(self.kind, SinkKind::Timestamped { .. })
    }

    /// Derive a sink that prefixes each message with the clock's time
    ///
    /// The discarding sink and sinks that already carry timestamps are returned unchanged,
    /// so a sink passed through several constructors never gets a second prefix.
    pub fn with_timestamps(&self, clock: &Arc<dyn Clock>) -> Self {
        match &self.kind {
            SinkKind::Discard | SinkKind::Timestamped { .. } => self.clone(),
            SinkKind::Write(writer) => Self {
                kind: SinkKind::Timestamped {
                    writer: Arc::clone(writer),
                    clock: Arc::clone(clock),
                },
            },
        }
    }

    /// Whether both handles denote the same sink
    pub fn same_as(&self, other: &Sink) -> bool {
        match (&self.kind, &other.kind) {
            (SinkKind::Discard, SinkKind::Discard) => true,
            (SinkKind::Write(a), SinkKind::Write(b)) => Arc::ptr_eq(a, b),
            (
                SinkKind::Timestamped { writer: a, clock: ca },
                SinkKind::Timestamped { writer: b, clock: cb },
            ) => Arc::ptr_eq(a, b) && Arc::ptr_eq(ca, cb),
            _ => false,
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SinkKind::Discard => "discard",
            SinkKind::Write(_) => "write",
            SinkKind::Timestamped { .. } => "timestamped",
        };
        f.debug_struct("Sink").field("kind", &kind).finish()
    }
}

/// In-memory capture of emitted messages
///
/// # Example
///
/// ```
/// use packlog_core::sink::Recorder;
///
/// let recorder = Recorder::new();
/// let sink = recorder.sink();
/// sink.emit("hello");
/// assert_eq!(recorder.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer-backed sink appending to this recorder
    pub fn sink(&self) -> Sink {
        let lines = Arc::clone(&self.lines);
        Sink::from_fn(move |msg| lines.lock().push(msg.to_string()))
    }

    /// Snapshot of everything emitted so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::hms_milli(13, 4, 5, 6))
    }

    #[test]
    fn test_discard_sink_drops() {
        let sink = Sink::discard();
        assert!(sink.is_discard());
        sink.emit("ignored");
        assert!(Sink::default().is_discard());
    }

    #[test]
    fn test_recorder_sink() {
        let recorder = Recorder::new();
        let sink = recorder.sink();
        sink.emit("one");
        sink.emit("two");
        assert_eq!(recorder.lines(), vec!["one", "two"]);
        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_timestamped_sink_prefixes() {
        let recorder = Recorder::new();
        let sink = recorder.sink().with_timestamps(&fixed_clock());
        assert!(sink.is_timestamped());
        sink.emit("building");
        assert_eq!(recorder.lines(), vec!["[13:04:05.006] building"]);
    }

    #[test]
    fn test_timestamps_idempotent() {
        let recorder = Recorder::new();
        let clock = fixed_clock();
        let once = recorder.sink().with_timestamps(&clock);
        let twice = once.with_timestamps(&clock);
        assert!(twice.same_as(&once));

        twice.emit("x");
        assert_eq!(recorder.lines(), vec!["[13:04:05.006] x"]);
    }

    #[test]
    fn test_timestamps_on_discard_is_discard() {
        let sink = Sink::discard().with_timestamps(&fixed_clock());
        assert!(sink.is_discard());
        assert!(sink.same_as(&Sink::discard()));
    }

    #[test]
    fn test_timestamp_taken_at_emission() {
        use std::sync::atomic::{AtomicU32, Ordering};

        struct Ticking(AtomicU32);
        impl Clock for Ticking {
            fn now(&self) -> chrono::NaiveTime {
                let sec = self.0.fetch_add(1, Ordering::SeqCst);
                chrono::NaiveTime::from_hms_opt(0, 0, sec).unwrap()
            }
        }

        let recorder = Recorder::new();
        let clock: Arc<dyn Clock> = Arc::new(Ticking(AtomicU32::new(0)));
        let sink = recorder.sink().with_timestamps(&clock);
        sink.emit("a");
        sink.emit("b");
        assert_eq!(recorder.lines(), vec!["[00:00:00.000] a", "[00:00:01.000] b"]);
    }

    #[test]
    fn test_same_as_distinguishes_writers() {
        let a = Recorder::new().sink();
        let b = Recorder::new().sink();
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
        assert!(!a.same_as(&Sink::discard()));
    }
}
