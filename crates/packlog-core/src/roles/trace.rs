//! Low-level trace output

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::capability;
use crate::compose::Capability;
use crate::format::{render_stack_trace, strip_trailing_line_separator};
use crate::sink::{ConsoleLogger, LogLevel, Sink, SystemLogSink};

use super::TraitSet;

capability! {
    /// Verbose diagnostics
    pub trait TraceLogger {
        fn trace(&self, msg: &str);

        /// A message followed by the full report of `cause`
        fn trace_with_cause(&self, cause: &(dyn Error + 'static), msg: &str);

        /// The full report of `cause`
        fn trace_cause(&self, cause: &(dyn Error + 'static));
    }
}

/// Formatting helpers for trace output
///
/// Formatting costs even when the result would be dropped, so these check
/// `enabled()` before rendering the arguments.
pub trait TraceLoggerExt: TraceLogger {
    fn trace_fmt(&self, args: fmt::Arguments<'_>) {
        if self.enabled() {
            self.trace(&args.to_string());
        }
    }

    fn trace_cause_fmt(&self, cause: &(dyn Error + 'static), args: fmt::Arguments<'_>) {
        if self.enabled() {
            self.trace_with_cause(cause, &args.to_string());
        }
    }
}

impl<T: TraceLogger + ?Sized> TraceLoggerExt for T {}

/// Trace with format arguments, skipping formatting when tracing is off
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::roles::TraceLoggerExt as _;
        $logger.trace_fmt(::std::format_args!($($arg)*))
    }};
}

/// The trace role has no console switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceTrait {}

/// Build the console trace logger writing timestamped lines to out
pub fn from_console(
    console: &ConsoleLogger,
    _traits: &TraitSet<TraceTrait>,
) -> Arc<dyn TraceLogger> {
    Arc::new(ConsoleTraceLogger {
        out: console.add_timestamps_to_out().out().clone(),
    })
}

/// Build the system-log trace logger (TRACE level, causes attached)
pub fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn TraceLogger> {
    Arc::new(SystemTraceLogger { sink })
}

#[derive(Debug)]
struct ConsoleTraceLogger {
    out: Sink,
}

impl Capability for ConsoleTraceLogger {
    fn enabled(&self) -> bool {
        !self.out.is_discard()
    }
}

impl TraceLogger for ConsoleTraceLogger {
    fn trace(&self, msg: &str) {
        self.out.emit(msg);
    }

    fn trace_with_cause(&self, cause: &(dyn Error + 'static), msg: &str) {
        self.out.emit(msg);
        self.trace_cause(cause);
    }

    fn trace_cause(&self, cause: &(dyn Error + 'static)) {
        let report = render_stack_trace(cause);
        self.out.emit(strip_trailing_line_separator(&report));
    }
}

struct SystemTraceLogger {
    sink: Arc<dyn SystemLogSink>,
}

impl Capability for SystemTraceLogger {
    fn enabled(&self) -> bool {
        true
    }
}

impl TraceLogger for SystemTraceLogger {
    fn trace(&self, msg: &str) {
        self.sink.log(LogLevel::Trace, msg, None);
    }

    fn trace_with_cause(&self, cause: &(dyn Error + 'static), msg: &str) {
        self.sink.log(LogLevel::Trace, msg, Some(cause));
    }

    fn trace_cause(&self, cause: &(dyn Error + 'static)) {
        self.sink.log(LogLevel::Trace, &cause.to_string(), Some(cause));
    }
}
