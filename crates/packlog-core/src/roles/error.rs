//! Error reporting

use std::error::Error;
use std::sync::Arc;

use crate::capability;
use crate::compose::Capability;
use crate::format::render_report;
use crate::sink::{ConsoleLogger, LogLevel, Sink, SystemLogSink};

use super::TraitSet;

capability! {
    /// Reports errors that end the current operation
    pub trait ErrorLogger {
        fn report_error(&self, cause: &(dyn Error + 'static));
    }
}

/// Console switches for the error role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorTrait {
    /// Print the full report even for self-contained errors
    AlwaysPrintStackTrace,
}

/// Build the console error logger writing to the err channel
pub fn from_console(
    console: &ConsoleLogger,
    traits: &TraitSet<ErrorTrait>,
) -> Arc<dyn ErrorLogger> {
    Arc::new(ConsoleErrorLogger {
        err: console.err().clone(),
        full: traits.contains(&ErrorTrait::AlwaysPrintStackTrace),
    })
}

/// Build the system-log error logger (ERROR level, cause attached)
pub fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn ErrorLogger> {
    Arc::new(SystemErrorLogger { sink })
}

#[derive(Debug)]
struct ConsoleErrorLogger {
    err: Sink,
    full: bool,
}

impl Capability for ConsoleErrorLogger {
    fn enabled(&self) -> bool {
        !self.err.is_discard()
    }
}

impl ErrorLogger for ConsoleErrorLogger {
    fn report_error(&self, cause: &(dyn Error + 'static)) {
        self.err.emit(&render_report(cause, self.full));
    }
}

struct SystemErrorLogger {
    sink: Arc<dyn SystemLogSink>,
}

impl Capability for SystemErrorLogger {
    fn enabled(&self) -> bool {
        true
    }
}

impl ErrorLogger for SystemErrorLogger {
    fn report_error(&self, cause: &(dyn Error + 'static)) {
        self.sink.log(LogLevel::Error, &cause.to_string(), Some(cause));
    }
}
