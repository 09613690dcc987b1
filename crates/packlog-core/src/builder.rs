//! Fluent assembly of the per-role loggers

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::{compose, Capability};
use crate::registry::{
    CommandRole, ErrorRole, Loggers, ProgressRole, ResourceRole, Role, RoleSpec, SummaryRole,
    TraceRole,
};
use crate::sink::{
    default_system_log_factory, Clock, ConsoleLogger, Sink, SystemClock, SystemLogFactory,
    SystemLogSink,
};

/// Shared boolean switches; each role picks the ones it understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    PrintInfo,
    PrintWarnings,
    PrintCommandResult,
    PrintQuietCommands,
    AlwaysPrintStackTrace,
}

/// Physical destinations a role can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Human-readable out/err streams
    Console,
    /// The host's structured system log
    System,
}

/// Builder for [`Loggers`]
///
/// # Example
///
/// ```
/// use packlog_core::{Flag, LoggingBuilder, ResourceLogger, Role};
/// use packlog_core::sink::Recorder;
///
/// let out = Recorder::new();
/// let loggers = LoggingBuilder::new()
///     .out(out.sink())
///     .flag(Flag::PrintInfo)
///     .console(Role::Resource)
///     .create();
///
/// loggers.resource().use_resource("Using default icon");
/// assert_eq!(out.lines(), vec!["Using default icon"]);
/// ```
#[derive(Clone, Default)]
pub struct LoggingBuilder {
    out: Option<Sink>,
    err: Option<Sink>,
    clock: Option<Arc<dyn Clock>>,
    system_log_factory: Option<SystemLogFactory>,
    flags: HashSet<Flag>,
    sinks: HashMap<Role, BTreeSet<SinkKind>>,
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console out channel
    pub fn out(mut self, sink: Sink) -> Self {
        self.out = Some(sink);
        self
    }

    /// Console err channel
    pub fn err(mut self, sink: Sink) -> Self {
        self.err = Some(sink);
        self
    }

    /// stdout and stderr
    pub fn stdio(self) -> Self {
        self.out(Sink::stdout()).err(Sink::stderr())
    }

    /// Clock used for console timestamps
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Factory creating the system log for each role, keyed by logger name
    pub fn system_log_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Arc<dyn SystemLogSink> + Send + Sync + 'static,
    {
        self.system_log_factory = Some(Arc::new(factory));
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn flags(mut self, flags: impl IntoIterator<Item = Flag>) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Route `role` to `kind`
    pub fn enable(mut self, role: Role, kind: SinkKind) -> Self {
        self.sinks.entry(role).or_default().insert(kind);
        self
    }

    /// Route `role` to the console
    pub fn console(self, role: Role) -> Self {
        self.enable(role, SinkKind::Console)
    }

    /// Route `role` to the system log
    pub fn system(self, role: Role) -> Self {
        self.enable(role, SinkKind::System)
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_enabled(&self, role: Role, kind: SinkKind) -> bool {
        self.sinks.get(&role).is_some_and(|kinds| kinds.contains(&kind))
    }

    pub fn has_any_sink(&self, role: Role) -> bool {
        self.sinks.get(&role).is_some_and(|kinds| !kinds.is_empty())
    }

    /// The console channels handed to every console constructor
    ///
    /// Channels never set default to the discarding sink.
    pub fn console_logger(&self) -> ConsoleLogger {
        let console = ConsoleLogger::new(
            self.out.clone().unwrap_or_default(),
            self.err.clone().unwrap_or_default(),
        );
        match &self.clock {
            Some(clock) => console.with_clock(Arc::clone(clock)),
            None => console.with_clock(Arc::new(SystemClock)),
        }
    }

    /// Assemble the logger of one role
    ///
    /// Console comes before system, so a fan-out writes to the console first.
    pub fn assemble<R: RoleSpec>(&self) -> Arc<R::Logger> {
        let role = R::ROLE;
        let traits = R::traits(self);
        let console = self.is_enabled(role, SinkKind::Console);
        let system = self.is_enabled(role, SinkKind::System);

        let mut candidates = Vec::with_capacity(2);
        if console {
            candidates.push(R::from_console(&self.console_logger(), &traits));
        }
        if system {
            let factory = self
                .system_log_factory
                .clone()
                .unwrap_or_else(default_system_log_factory);
            candidates.push(R::from_system_sink(factory(&role.logger_name())));
        }

        let logger = compose(candidates);
        debug!(
            role = %role,
            console,
            system,
            traits = ?traits,
            enabled = logger.enabled(),
            "assembled logger"
        );
        logger
    }

    /// Build every role
    pub fn create(&self) -> Loggers {
        Loggers {
            command: self.assemble::<CommandRole>(),
            error: self.assemble::<ErrorRole>(),
            progress: self.assemble::<ProgressRole>(),
            resource: self.assemble::<ResourceRole>(),
            summary: self.assemble::<SummaryRole>(),
            trace: self.assemble::<TraceRole>(),
        }
    }
}

impl fmt::Debug for LoggingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingBuilder")
            .field("out", &self.out)
            .field("err", &self.err)
            .field("flags", &self.flags)
            .field("sinks", &self.sinks)
            .field("system_log_factory", &self.system_log_factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Composable;
    use crate::format::SelfContainedError;
    use crate::roles::{CommandLogger, ErrorLogger, ProgressLogger, ResourceLogger, TraceLogger};
    use crate::sink::{FixedClock, LogLevel, MemorySystemLog, Recorder};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::hms_milli(14, 15, 16, 17))
    }

    #[test]
    fn test_no_sinks_yields_discarding_loggers() {
        let out = Recorder::new();
        let loggers = LoggingBuilder::new()
            .out(out.sink())
            .err(out.sink())
            .flags([Flag::PrintInfo, Flag::PrintWarnings])
            .create();

        assert!(Arc::ptr_eq(loggers.progress(), &<dyn ProgressLogger>::discarding()));
        assert!(Arc::ptr_eq(loggers.command(), &<dyn CommandLogger>::discarding()));
        assert!(loggers.enabled_roles().is_empty());

        loggers.progress().progress("starting");
        loggers.progress().progress_warning_msg("disk low");
        loggers.error().report_error(&SelfContainedError::new("disk full"));
        loggers.trace().trace("x");
        assert!(out.is_empty());
    }

    #[test]
    fn test_console_without_writers_is_discarding() {
        let loggers = LoggingBuilder::new()
            .flag(Flag::PrintInfo)
            .console(Role::Progress)
            .create();
        assert!(!loggers.progress().enabled());
    }

    #[test]
    fn test_command_scenario() {
        let out = Recorder::new();
        let loggers = LoggingBuilder::new()
            .out(out.sink())
            .clock(clock())
            .flag(Flag::PrintCommandResult)
            .console(Role::Command)
            .create();

        loggers.command().before_executed(true, "rm -rf x");
        assert!(out.is_empty());

        loggers.command().after_executed(false, "ls", None, Some(0), &[]);
        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Command:"));
        assert!(lines[0].contains("    ls"));
        assert!(lines[0].ends_with("Returned: 0"));
        assert!(!lines[0].contains("Output:"));
    }

    #[test]
    fn test_progress_scenario() {
        let (out, err) = (Recorder::new(), Recorder::new());
        let loggers = LoggingBuilder::new()
            .out(out.sink())
            .err(err.sink())
            .clock(clock())
            .flag(Flag::PrintWarnings)
            .console(Role::Progress)
            .create();

        loggers.progress().progress("starting");
        loggers.progress().progress_warning_msg("disk low");
        assert!(out.is_empty());
        assert_eq!(err.lines(), vec!["[14:15:16.017] Warning: disk low"]);
    }

    #[test]
    fn test_silent_console_leaves_system_as_only_sink() {
        let log = Arc::new(MemorySystemLog::new("shared"));
        let shared = Arc::clone(&log);
        let loggers = LoggingBuilder::new()
            .system_log_factory(move |_| shared.clone())
            .console(Role::Resource)
            .system(Role::Resource)
            .create();

        assert!(loggers.resource().enabled());
        assert!(!Arc::ptr_eq(loggers.resource(), &<dyn ResourceLogger>::discarding()));

        loggers.resource().use_resource("icon.png");
        assert_eq!(log.len(), 1);
        assert_eq!(log.at(LogLevel::Info)[0].message, "icon.png");
        assert_eq!(loggers.enabled_roles(), vec![Role::Resource]);
    }

    #[test]
    fn test_console_and_system_fan_out_in_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let console_order = Arc::clone(&order);
        let system_order = Arc::clone(&order);

        struct OrderedLog(Arc<parking_lot::Mutex<Vec<String>>>);
        impl SystemLogSink for OrderedLog {
            fn log(
                &self,
                _: LogLevel,
                message: &str,
                _: Option<&(dyn std::error::Error + 'static)>,
            ) {
                self.0.lock().push(format!("system:{}", message));
            }
        }

        let loggers = LoggingBuilder::new()
            .out(Sink::from_fn(move |msg| console_order.lock().push(format!("console:{}", msg))))
            .system_log_factory(move |_| Arc::new(OrderedLog(Arc::clone(&system_order))))
            .console(Role::Resource)
            .system(Role::Resource)
            .create();

        loggers.resource().use_resource("a");
        loggers.resource().use_resource("b");
        assert_eq!(
            *order.lock(),
            vec!["console:a", "system:a", "console:b", "system:b"]
        );
    }

    #[test]
    fn test_system_factory_receives_role_names() {
        let names = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen = Arc::clone(&names);
        LoggingBuilder::new()
            .system_log_factory(move |name| {
                seen.lock().push(name.to_string());
                Arc::new(MemorySystemLog::new(name))
            })
            .system(Role::Error)
            .system(Role::Trace)
            .create();
        assert_eq!(*names.lock(), vec!["packlog.error", "packlog.trace"]);
    }

    #[test]
    fn test_tracing_enables_full_error_reports() {
        let err = Recorder::new();
        let loggers = LoggingBuilder::new()
            .err(err.sink())
            .console(Role::Error)
            .console(Role::Trace)
            .create();

        loggers.error().report_error(&SelfContainedError::new("disk full"));
        let report = &err.lines()[0];
        assert!(report.starts_with("disk full"));
        assert!(report.contains("SelfContainedError {"));
        // No out channel, so tracing itself stays silent
        assert!(!loggers.trace().enabled());
    }

    #[test]
    fn test_is_enabled_queries() {
        let builder = LoggingBuilder::new()
            .console(Role::Summary)
            .enable(Role::Summary, SinkKind::System);
        assert!(builder.is_enabled(Role::Summary, SinkKind::Console));
        assert!(builder.is_enabled(Role::Summary, SinkKind::System));
        assert!(!builder.has_any_sink(Role::Trace));
        assert!(format!("{:?}", builder).contains("Summary"));
    }
}
