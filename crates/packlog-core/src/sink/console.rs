//! Console logger value: an out channel, an err channel and a clock

use std::fmt;
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::Sink;

/// The two console channels a role may write to
///
/// Immutable; every derivation returns a new value.
#[derive(Clone)]
pub struct ConsoleLogger {
    out: Sink,
    err: Sink,
    clock: Arc<dyn Clock>,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(Sink::discard(), Sink::discard())
    }
}

impl ConsoleLogger {
    /// Create a console logger on the system clock
    pub fn new(out: Sink, err: Sink) -> Self {
        Self {
            out,
            err,
            clock: Arc::new(SystemClock),
        }
    }

    /// stdout / stderr
    pub fn stdio() -> Self {
        Self::new(Sink::stdout(), Sink::stderr())
    }

    /// Replace the clock used by later timestamp derivations
    pub fn with_clock(&self, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ..self.clone()
        }
    }

    pub fn out(&self) -> &Sink {
        &self.out
    }

    pub fn err(&self) -> &Sink {
        &self.err
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Silence the out channel, keep err
    pub fn discard_out(&self) -> Self {
        Self {
            out: Sink::discard(),
            ..self.clone()
        }
    }

    /// Silence the err channel, keep out
    pub fn discard_err(&self) -> Self {
        Self {
            err: Sink::discard(),
            ..self.clone()
        }
    }

    pub fn add_timestamps_to_out(&self) -> Self {
        Self {
            out: self.out.with_timestamps(&self.clock),
            ..self.clone()
        }
    }

    pub fn add_timestamps_to_err(&self) -> Self {
        Self {
            err: self.err.with_timestamps(&self.clock),
            ..self.clone()
        }
    }

    /// True when both channels discard
    pub fn is_silent(&self) -> bool {
        self.out.is_discard() && self.err.is_discard()
    }
}

impl fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("out", &self.out)
            .field("err", &self.err)
            .finish()
    }
}
