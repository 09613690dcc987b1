//! Command execution logging

use std::sync::Arc;

use crate::capability;
use crate::compose::Capability;
use crate::format::LINE_SEPARATOR;
use crate::sink::{ConsoleLogger, LogLevel, Sink, SystemLogSink};

use super::TraitSet;

capability! {
    /// Reports external commands run by the packager
    pub trait CommandLogger {
        /// A command is about to run
        ///
        /// `quiet` commands go to the quiet channel, which is usually silent.
        fn before_executed(&self, quiet: bool, cmdline: &str);

        /// A command finished (`exit_code` set) or was aborted on timeout (`exit_code` unset)
        fn after_executed(
            &self,
            quiet: bool,
            cmdline: &str,
            pid: Option<u32>,
            exit_code: Option<i32>,
            output: &[String]
        );
    }
}

/// Console switches for the command role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTrait {
    /// Report how each command ended, with its output
    PrintCommandResult,
    /// Also report commands flagged quiet
    PrintQuietCommands,
}

/// Build the console command logger
///
/// Output goes to the out channel with timestamps.
pub fn from_console(
    console: &ConsoleLogger,
    traits: &TraitSet<CommandTrait>,
) -> Arc<dyn CommandLogger> {
    let out = console.add_timestamps_to_out().out().clone();
    let quiet = if traits.contains(&CommandTrait::PrintQuietCommands) {
        out.clone()
    } else {
        Sink::discard()
    };
    Arc::new(SinkCommandLogger {
        sink: out,
        quiet_sink: quiet,
        print_result: traits.contains(&CommandTrait::PrintCommandResult),
    })
}

/// Build the system-log command logger
///
/// Regular commands log at INFO, quiet ones at DEBUG; results are always logged.
pub fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn CommandLogger> {
    Arc::new(SinkCommandLogger {
        sink: Sink::system(Arc::clone(&sink), LogLevel::Info),
        quiet_sink: Sink::system(sink, LogLevel::Debug),
        print_result: true,
    })
}

#[derive(Debug)]
struct SinkCommandLogger {
    sink: Sink,
    quiet_sink: Sink,
    print_result: bool,
}

impl SinkCommandLogger {
    fn target(&self, quiet: bool) -> &Sink {
        if quiet {
            &self.quiet_sink
        } else {
            &self.sink
        }
    }
}

impl Capability for SinkCommandLogger {
    fn enabled(&self) -> bool {
        !(self.sink.is_discard() && self.quiet_sink.is_discard())
    }
}

impl CommandLogger for SinkCommandLogger {
    fn before_executed(&self, quiet: bool, cmdline: &str) {
        self.target(quiet).emit(&format!("Running {}", cmdline));
    }

    fn after_executed(
        &self,
        quiet: bool,
        cmdline: &str,
        pid: Option<u32>,
        exit_code: Option<i32>,
        output: &[String],
    ) {
        if !self.print_result {
            return;
        }
        self.target(quiet)
            .emit(&format_result(cmdline, pid, exit_code, output));
    }
}

/// Render the report of a finished command
pub fn format_result(
    cmdline: &str,
    pid: Option<u32>,
    exit_code: Option<i32>,
    output: &[String],
) -> String {
    let mut lines = Vec::with_capacity(output.len() + 4);
    lines.push(match pid {
        Some(pid) => format!("Command [PID: {}]:", pid),
        None => "Command:".to_string(),
    });
    lines.push(format!("    {}", cmdline));
    if !output.is_empty() {
        lines.push("Output:".to_string());
        lines.extend(output.iter().map(|line| format!("    {}", line)));
    }
    lines.push(match exit_code {
        Some(code) => format!("Returned: {}", code),
        None => "Aborted: timed-out".to_string(),
    });
    lines.join(LINE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{FixedClock, MemorySystemLog, Recorder};

    fn console(out: &Recorder) -> ConsoleLogger {
        ConsoleLogger::new(out.sink(), Sink::discard())
            .with_clock(Arc::new(FixedClock::hms_milli(10, 0, 0, 0)))
    }

    #[test]
    fn test_quiet_command_hidden_without_trait() {
        let out = Recorder::new();
        let traits = TraitSet::new().with(CommandTrait::PrintCommandResult);
        let logger = from_console(&console(&out), &traits);

        logger.before_executed(true, "rm -rf x");
        assert!(out.is_empty());

        logger.after_executed(false, "ls", None, Some(0), &[]);
        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let report = &lines[0];
        assert!(report.starts_with("[10:00:00.000] Command:"));
        assert!(report.contains("    ls"));
        assert!(report.ends_with("Returned: 0"));
        assert!(!report.contains("Output:"));
    }

    #[test]
    fn test_quiet_command_shown_with_trait() {
        let out = Recorder::new();
        let traits = TraitSet::new().with(CommandTrait::PrintQuietCommands);
        let logger = from_console(&console(&out), &traits);

        logger.before_executed(true, "codesign --verify app");
        assert_eq!(out.lines(), vec!["[10:00:00.000] Running codesign --verify app"]);
    }

    #[test]
    fn test_after_executed_noop_without_result_trait() {
        let out = Recorder::new();
        let logger = from_console(&console(&out), &TraitSet::new());
        logger.after_executed(false, "ls", Some(1), Some(0), &["a".to_string()]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_format_result_full() {
        let output = vec!["line one".to_string(), "line two".to_string()];
        let report = format_result("make", Some(42), None, &output);
        let lines: Vec<&str> = report.split(LINE_SEPARATOR).collect();
        assert_eq!(
            lines,
            vec![
                "Command [PID: 42]:",
                "    make",
                "Output:",
                "    line one",
                "    line two",
                "Aborted: timed-out",
            ]
        );
    }

    #[test]
    fn test_console_disabled_when_out_discarded() {
        let logger = from_console(&ConsoleLogger::default(), &TraitSet::new());
        assert!(!logger.enabled());
    }

    #[test]
    fn test_system_levels() {
        let log = Arc::new(MemorySystemLog::new("packlog.command"));
        let logger = from_system_sink(log.clone());
        assert!(logger.enabled());

        logger.before_executed(false, "ls");
        logger.before_executed(true, "id -u");
        logger.after_executed(false, "ls", None, Some(0), &[]);

        assert_eq!(log.at(LogLevel::Info).len(), 2);
        assert_eq!(log.at(LogLevel::Debug)[0].message, "Running id -u");
    }
}
