//! Resource usage logging

use std::sync::Arc;

use crate::capability;
use crate::compose::Capability;
use crate::sink::{ConsoleLogger, LogLevel, Sink, SystemLogSink};

use super::TraitSet;

capability! {
    /// Reports resources (icons, templates, scripts) picked up while packaging
    pub trait ResourceLogger {
        fn use_resource(&self, msg: &str);
    }
}

/// The resource role has no console switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTrait {}

pub fn from_console(
    console: &ConsoleLogger,
    _traits: &TraitSet<ResourceTrait>,
) -> Arc<dyn ResourceLogger> {
    Arc::new(SinkResourceLogger {
        out: console.out().clone(),
    })
}

pub fn from_system_sink(sink: Arc<dyn SystemLogSink>) -> Arc<dyn ResourceLogger> {
    Arc::new(SinkResourceLogger {
        out: Sink::system(sink, LogLevel::Info),
    })
}

#[derive(Debug)]
struct SinkResourceLogger {
    out: Sink,
}

impl Capability for SinkResourceLogger {
    fn enabled(&self) -> bool {
        !self.out.is_discard()
    }
}

impl ResourceLogger for SinkResourceLogger {
    fn use_resource(&self, msg: &str) {
        self.out.emit(msg);
    }
}
