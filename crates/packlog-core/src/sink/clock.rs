//! Clock abstraction used for console timestamps

use chrono::{Local, NaiveTime};

/// Source of the wall-clock time stamped onto console lines
///
/// Implementations:
/// - `SystemClock`: Local wall clock (default)
/// - `FixedClock`: Always returns the same time, for tests
pub trait Clock: Send + Sync {
    /// Current time of day
    fn now(&self) -> NaiveTime;
}

/// The local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveTime);

impl FixedClock {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Build from hours, minutes, seconds and milliseconds
    ///
    /// Out-of-range components fall back to midnight.
    pub fn hms_milli(hour: u32, min: u32, sec: u32, milli: u32) -> Self {
        Self(NaiveTime::from_hms_milli_opt(hour, min, sec, milli).unwrap_or(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Render the `[HH:MM:SS.mmm] ` prefix for a time of day
pub fn timestamp_prefix(time: NaiveTime) -> String {
    format!("[{}] ", time.format("%H:%M:%S%.3f"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_prefix() {
        let clock = FixedClock::hms_milli(9, 5, 7, 42);
        assert_eq!(timestamp_prefix(clock.now()), "[09:05:07.042] ");
    }

    #[test]
    fn test_fixed_clock_invalid_falls_back() {
        let clock = FixedClock::hms_milli(25, 0, 0, 0);
        assert_eq!(clock.now(), NaiveTime::MIN);
    }
}
