//! Progress messages and warnings

use std::error::Error;
use std::sync::Arc;

use crate::capability;
use crate::compose::Capability;
use crate::format::render_error;
use crate::sink::{ConsoleLogger, LogLevel, Sink, SystemLogSink};

use super::TraitSet;

capability! {
    /// Reports what the packager is doing and anything worth a warning
    pub trait ProgressLogger {
        fn progress(&self, msg: &str);

        /// Warning built from an error alone
        fn progress_warning(&self, cause: &(dyn Error + 'static));

        /// Warning with a message only
        fn progress_warning_msg(&self, msg: &str);

        /// Warning with a message and the error behind it
        fn progress_warning_with(&self, msg: &str, cause: &(dyn Error + 'static));
    }
}

/// Console switches for the progress role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressTrait {
    /// Print progress messages
    PrintInfo,
    /// Print warnings
    PrintWarnings,
}

/// Build the console progress logger
///
/// Progress goes to out, warnings to err, both timestamped. A channel whose
/// trait is absent is replaced by the discarding sink.
pub fn from_console(
    console: &ConsoleLogger,
    traits: &TraitSet<ProgressTrait>,
) -> Arc<dyn ProgressLogger> {
    let mut console = console.clone();
    if !traits.contains(&ProgressTrait::PrintInfo) {
        console = console.discard_out();
    }
    if !traits.contains(&ProgressTrait::PrintWarnings) {
        console = console.discard_err();
    }
    let console = console.add_timestamps_to_out().add_timestamps_to_err();
    Arc::new(SinkProgressLogger {
        info: console.out().clone(),
        warn: console.err().clone(),
    })
}

/// Build the system-log progress logger (INFO progress, WARNING warnings)
pub fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn ProgressLogger> {
    Arc::new(SinkProgressLogger {
        info: Sink::system(Arc::clone(&sink), LogLevel::Info),
        warn: Sink::system(sink, LogLevel::Warn),
    })
}

/// `Warning: <msg>`
pub fn warning_header(msg: &str) -> String {
    format!("Warning: {}", msg)
}

/// `Warning: <msg>: <rendered error>`
pub fn warning_with_message(msg: &str, cause: &(dyn Error + 'static)) -> String {
    format!("Warning: {}: {}", msg, render_error(cause))
}

#[derive(Debug)]
struct SinkProgressLogger {
    info: Sink,
    warn: Sink,
}

impl Capability for SinkProgressLogger {
    fn enabled(&self) -> bool {
        !(self.info.is_discard() && self.warn.is_discard())
    }
}

impl ProgressLogger for SinkProgressLogger {
    fn progress(&self, msg: &str) {
        self.info.emit(msg);
    }

    fn progress_warning(&self, cause: &(dyn Error + 'static)) {
        if self.warn.is_discard() {
            return;
        }
        self.warn.emit(&warning_header(&render_error(cause)));
    }

    fn progress_warning_msg(&self, msg: &str) {
        self.warn.emit(&warning_header(msg));
    }

    fn progress_warning_with(&self, msg: &str, cause: &(dyn Error + 'static)) {
        if self.warn.is_discard() {
            return;
        }
        self.warn.emit(&warning_with_message(msg, cause));
    }
}
