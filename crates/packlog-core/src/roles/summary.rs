//! End-of-run summary

use std::sync::Arc;

use crate::capability;
use crate::compose::Capability;
use crate::sink::{ConsoleLogger, LogLevel, Sink, SystemLogSink};

use super::TraitSet;

/// A report that knows how to print itself
///
/// `info` receives regular lines, `warn` receives warnings. Either may be the
/// discarding sink.
pub trait Summary {
    fn print(&self, info: &Sink, warn: &Sink);
}

capability! {
    /// Prints the summary of a packaging run
    pub trait SummaryLogger {
        fn summary(&self, payload: &dyn Summary);
    }
}

/// Console switches for the summary role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryTrait {
    PrintInfo,
    PrintWarnings,
}

/// Build the console summary logger
///
/// Info lines go to out, warnings to err; a channel whose trait is absent is
/// discarded before the logger is built.
pub fn from_console(
    console: &ConsoleLogger,
    traits: &TraitSet<SummaryTrait>,
) -> Arc<dyn SummaryLogger> {
    let info = if traits.contains(&SummaryTrait::PrintInfo) {
        console.out().clone()
    } else {
        Sink::discard()
    };
    let warn = if traits.contains(&SummaryTrait::PrintWarnings) {
        console.err().clone()
    } else {
        Sink::discard()
    };
    Arc::new(SinkSummaryLogger { info, warn })
}

pub fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn SummaryLogger> {
    Arc::new(SinkSummaryLogger {
        info: Sink::system(Arc::clone(&sink), LogLevel::Info),
        warn: Sink::system(sink, LogLevel::Warn),
    })
}

#[derive(Debug)]
struct SinkSummaryLogger {
    info: Sink,
    warn: Sink,
}

impl Capability for SinkSummaryLogger {
    fn enabled(&self) -> bool {
        !(self.info.is_discard() && self.warn.is_discard())
    }
}

impl SummaryLogger for SinkSummaryLogger {
    fn summary(&self, payload: &dyn Summary) {
        payload.print(&self.info, &self.warn);
    }
}
