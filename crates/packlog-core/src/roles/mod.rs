//! Logger roles
//!
//! Each role is an independent capability contract with two constructors:
//! - `from_console`: writes human-readable text to a `ConsoleLogger`, shaped by the role's traits
//! - `from_system_sink`: forwards to a `SystemLogSink` at fixed severities
//!
//! Roles:
//! - `CommandLogger`: external commands run by the packager
//! - `ErrorLogger`: fatal errors
//! - `ProgressLogger`: progress messages and warnings
//! - `ResourceLogger`: resources used while packaging
//! - `SummaryLogger`: the end-of-run summary
//! - `TraceLogger`: low-level diagnostics

pub mod command;
pub mod error;
pub mod progress;
pub mod resource;
pub mod summary;
pub mod trace;

use std::collections::HashSet;
use std::hash::Hash;

pub use command::{CommandLogger, CommandTrait};
pub use error::{ErrorLogger, ErrorTrait};
pub use progress::{ProgressLogger, ProgressTrait};
pub use resource::{ResourceLogger, ResourceTrait};
pub use summary::{Summary, SummaryLogger, SummaryTrait};
pub use trace::{TraceLogger, TraceLoggerExt, TraceTrait};

/// Unordered set of a role's trait tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitSet<T: Eq + Hash> {
    tags: HashSet<T>,
}

impl<T: Eq + Hash> Default for TraitSet<T> {
    fn default() -> Self {
        Self { tags: HashSet::new() }
    }
}

impl<T: Eq + Hash> TraitSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, builder style
    pub fn with(mut self, tag: T) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Add `tag` only when `condition` holds
    pub fn with_if(self, tag: T, condition: bool) -> Self {
        if condition {
            self.with(tag)
        } else {
            self
        }
    }

    pub fn insert(&mut self, tag: T) {
        self.tags.insert(tag);
    }

    pub fn contains(&self, tag: &T) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tags.iter()
    }
}

impl<T: Eq + Hash> FromIterator<T> for TraitSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}
