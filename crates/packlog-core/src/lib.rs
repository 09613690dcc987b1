//! Packlog Core
//!
//! Role-based logging for packaging CLIs.
//! Each logger role (commands, errors, progress, resources, summary, trace) is an
//! independent capability contract that can be routed to the console, the system
//! log, both, or neither. Calling code never checks which: an unrouted role is a
//! free no-op and a doubly routed one fans out transparently.
//!
//! ## Assembling loggers
//!
//! ```rust
//! use packlog_core::{Flag, LoggingBuilder, ProgressLogger, Role};
//! use packlog_core::sink::{MemorySystemLog, Recorder};
//! use std::sync::Arc;
//!
//! let err = Recorder::new();
//! let system = Arc::new(MemorySystemLog::new("packlog"));
//! let shared = system.clone();
//!
//! let loggers = LoggingBuilder::new()
//!     .err(err.sink())
//!     .system_log_factory(move |_| shared.clone())
//!     .flag(Flag::PrintWarnings)
//!     .console(Role::Progress)
//!     .system(Role::Progress)
//!     .create();
//!
//! loggers.progress().progress_warning_msg("icon missing, using default");
//! assert_eq!(err.len(), 1);
//! assert_eq!(system.len(), 1);
//! ```

pub mod builder;
pub mod compose;
pub mod config;
pub mod format;
pub mod registry;
pub mod roles;
pub mod sink;

// Re-export commonly used types
pub use builder::{Flag, LoggingBuilder, SinkKind};

pub use compose::{compose, Capability, Composable, Discard, Fanout};

pub use config::{ConfigError, ConfigResult, LoggingConfig};

pub use format::{is_self_contained, register_self_contained, SelfContained, SelfContainedError};

pub use registry::{Loggers, Role, RoleLogger, RoleSpec};

pub use roles::{
    CommandLogger, ErrorLogger, ProgressLogger, ResourceLogger, Summary, SummaryLogger,
    TraceLogger, TraceLoggerExt, TraitSet,
};

pub use sink::{Clock, ConsoleLogger, LogLevel, Sink, SystemLogSink};
