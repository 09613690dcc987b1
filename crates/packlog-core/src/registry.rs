//! Role registry
//!
//! Binds each role to its contract, its trait vocabulary, its default
//! (discarding) instance and its two constructors. The set of roles is closed.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::builder::{Flag, LoggingBuilder};
use crate::compose::{Capability, Composable};
use crate::roles::{
    command, error, progress, resource, summary, trace, CommandLogger, CommandTrait, ErrorLogger,
    ErrorTrait, ProgressLogger, ProgressTrait, ResourceLogger, ResourceTrait, SummaryLogger,
    SummaryTrait, TraceLogger, TraceTrait, TraitSet,
};
use crate::sink::{ConsoleLogger, SystemLogSink};

/// The logger roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Command,
    Error,
    Progress,
    Resource,
    Summary,
    Trace,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Command,
        Role::Error,
        Role::Progress,
        Role::Resource,
        Role::Summary,
        Role::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Command => "command",
            Role::Error => "error",
            Role::Progress => "progress",
            Role::Resource => "resource",
            Role::Summary => "summary",
            Role::Trace => "trace",
        }
    }

    /// Name handed to the system log factory
    pub fn logger_name(&self) -> String {
        format!("packlog.{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown logger role: {}", s))
    }
}

/// Static description of one role
pub trait RoleSpec {
    const ROLE: Role;

    /// The role's capability contract
    type Logger: ?Sized + Composable;

    /// The role's console switches
    type Trait: Copy + Eq + Hash + fmt::Debug;

    /// Pick this role's switches out of the builder's shared flags
    fn traits(builder: &LoggingBuilder) -> TraitSet<Self::Trait>;

    fn from_console(console: &ConsoleLogger, traits: &TraitSet<Self::Trait>) -> Arc<Self::Logger>;

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<Self::Logger>;

    /// Instance used before configuration
    fn default_instance() -> Arc<Self::Logger> {
        <Self::Logger as Composable>::discarding()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommandRole;

impl RoleSpec for CommandRole {
    const ROLE: Role = Role::Command;
    type Logger = dyn CommandLogger;
    type Trait = CommandTrait;

    fn traits(builder: &LoggingBuilder) -> TraitSet<CommandTrait> {
        TraitSet::new()
            .with_if(CommandTrait::PrintCommandResult, builder.has_flag(Flag::PrintCommandResult))
            .with_if(CommandTrait::PrintQuietCommands, builder.has_flag(Flag::PrintQuietCommands))
    }

    fn from_console(
        console: &ConsoleLogger,
        traits: &TraitSet<CommandTrait>,
    ) -> Arc<dyn CommandLogger> {
        command::from_console(console, traits)
    }

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn CommandLogger> {
        command::from_system_sink(sink)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ErrorRole;

impl RoleSpec for ErrorRole {
    const ROLE: Role = Role::Error;
    type Logger = dyn ErrorLogger;
    type Trait = ErrorTrait;

    /// Full reports are forced by the flag, or whenever tracing has a sink
    fn traits(builder: &LoggingBuilder) -> TraitSet<ErrorTrait> {
        let full =
            builder.has_flag(Flag::AlwaysPrintStackTrace) || builder.has_any_sink(Role::Trace);
        TraitSet::new().with_if(ErrorTrait::AlwaysPrintStackTrace, full)
    }

    fn from_console(
        console: &ConsoleLogger,
        traits: &TraitSet<ErrorTrait>,
    ) -> Arc<dyn ErrorLogger> {
        error::from_console(console, traits)
    }

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn ErrorLogger> {
        error::from_system_sink(sink)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressRole;

impl RoleSpec for ProgressRole {
    const ROLE: Role = Role::Progress;
    type Logger = dyn ProgressLogger;
    type Trait = ProgressTrait;

    fn traits(builder: &LoggingBuilder) -> TraitSet<ProgressTrait> {
        TraitSet::new()
            .with_if(ProgressTrait::PrintInfo, builder.has_flag(Flag::PrintInfo))
            .with_if(ProgressTrait::PrintWarnings, builder.has_flag(Flag::PrintWarnings))
    }

    fn from_console(
        console: &ConsoleLogger,
        traits: &TraitSet<ProgressTrait>,
    ) -> Arc<dyn ProgressLogger> {
        progress::from_console(console, traits)
    }

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn ProgressLogger> {
        progress::from_system_sink(sink)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceRole;

impl RoleSpec for ResourceRole {
    const ROLE: Role = Role::Resource;
    type Logger = dyn ResourceLogger;
    type Trait = ResourceTrait;

    fn traits(_builder: &LoggingBuilder) -> TraitSet<ResourceTrait> {
        TraitSet::new()
    }

    fn from_console(
        console: &ConsoleLogger,
        traits: &TraitSet<ResourceTrait>,
    ) -> Arc<dyn ResourceLogger> {
        resource::from_console(console, traits)
    }

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn ResourceLogger> {
        resource::from_system_sink(sink)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SummaryRole;

impl RoleSpec for SummaryRole {
    const ROLE: Role = Role::Summary;
    type Logger = dyn SummaryLogger;
    type Trait = SummaryTrait;

    fn traits(builder: &LoggingBuilder) -> TraitSet<SummaryTrait> {
        TraitSet::new()
            .with_if(SummaryTrait::PrintInfo, builder.has_flag(Flag::PrintInfo))
            .with_if(SummaryTrait::PrintWarnings, builder.has_flag(Flag::PrintWarnings))
    }

    fn from_console(
        console: &ConsoleLogger,
        traits: &TraitSet<SummaryTrait>,
    ) -> Arc<dyn SummaryLogger> {
        summary::from_console(console, traits)
    }

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn SummaryLogger> {
        summary::from_system_sink(sink)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TraceRole;

impl RoleSpec for TraceRole {
    const ROLE: Role = Role::Trace;
    type Logger = dyn TraceLogger;
    type Trait = TraceTrait;

    fn traits(_builder: &LoggingBuilder) -> TraitSet<TraceTrait> {
        TraitSet::new()
    }

    fn from_console(
        console: &ConsoleLogger,
        traits: &TraitSet<TraceTrait>,
    ) -> Arc<dyn TraceLogger> {
        trace::from_console(console, traits)
    }

    fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn TraceLogger> {
        trace::from_system_sink(sink)
    }
}

/// A finished logger of any role
#[derive(Clone)]
pub enum RoleLogger {
    Command(Arc<dyn CommandLogger>),
    Error(Arc<dyn ErrorLogger>),
    Progress(Arc<dyn ProgressLogger>),
    Resource(Arc<dyn ResourceLogger>),
    Summary(Arc<dyn SummaryLogger>),
    Trace(Arc<dyn TraceLogger>),
}

impl RoleLogger {
    pub fn role(&self) -> Role {
        match self {
            RoleLogger::Command(_) => Role::Command,
            RoleLogger::Error(_) => Role::Error,
            RoleLogger::Progress(_) => Role::Progress,
            RoleLogger::Resource(_) => Role::Resource,
            RoleLogger::Summary(_) => Role::Summary,
            RoleLogger::Trace(_) => Role::Trace,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            RoleLogger::Command(l) => l.enabled(),
            RoleLogger::Error(l) => l.enabled(),
            RoleLogger::Progress(l) => l.enabled(),
            RoleLogger::Resource(l) => l.enabled(),
            RoleLogger::Summary(l) => l.enabled(),
            RoleLogger::Trace(l) => l.enabled(),
        }
    }
}

impl fmt::Debug for RoleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleLogger")
            .field("role", &self.role())
            .field("enabled", &self.enabled())
            .finish()
    }
}

/// One finished logger per role
///
/// Produced by [`LoggingBuilder::create`]; the default holds every role's
/// discarding instance.
#[derive(Clone)]
pub struct Loggers {
    pub(crate) command: Arc<dyn CommandLogger>,
    pub(crate) error: Arc<dyn ErrorLogger>,
    pub(crate) progress: Arc<dyn ProgressLogger>,
    pub(crate) resource: Arc<dyn ResourceLogger>,
    pub(crate) summary: Arc<dyn SummaryLogger>,
    pub(crate) trace: Arc<dyn TraceLogger>,
}

impl Default for Loggers {
    fn default() -> Self {
        Self {
            command: CommandRole::default_instance(),
            error: ErrorRole::default_instance(),
            progress: ProgressRole::default_instance(),
            resource: ResourceRole::default_instance(),
            summary: SummaryRole::default_instance(),
            trace: TraceRole::default_instance(),
        }
    }
}

impl Loggers {
    pub fn command(&self) -> &Arc<dyn CommandLogger> {
        &self.command
    }

    pub fn error(&self) -> &Arc<dyn ErrorLogger> {
        &self.error
    }

    pub fn progress(&self) -> &Arc<dyn ProgressLogger> {
        &self.progress
    }

    pub fn resource(&self) -> &Arc<dyn ResourceLogger> {
        &self.resource
    }

    pub fn summary(&self) -> &Arc<dyn SummaryLogger> {
        &self.summary
    }

    pub fn trace(&self) -> &Arc<dyn TraceLogger> {
        &self.trace
    }

    /// Look up a logger by role
    pub fn get(&self, role: Role) -> RoleLogger {
        match role {
            Role::Command => RoleLogger::Command(Arc::clone(&self.command)),
            Role::Error => RoleLogger::Error(Arc::clone(&self.error)),
            Role::Progress => RoleLogger::Progress(Arc::clone(&self.progress)),
            Role::Resource => RoleLogger::Resource(Arc::clone(&self.resource)),
            Role::Summary => RoleLogger::Summary(Arc::clone(&self.summary)),
            Role::Trace => RoleLogger::Trace(Arc::clone(&self.trace)),
        }
    }

    /// All loggers in role order
    pub fn iter(&self) -> impl Iterator<Item = RoleLogger> + '_ {
        Role::ALL.into_iter().map(move |role| self.get(role))
    }

    /// Roles whose logger does something
    pub fn enabled_roles(&self) -> Vec<Role> {
        self.iter().filter(|l| l.enabled()).map(|l| l.role()).collect()
    }
}

impl fmt::Debug for Loggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loggers")
            .field("enabled", &self.enabled_roles())
            .finish()
    }
}
