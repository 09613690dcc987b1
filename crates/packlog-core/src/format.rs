//! Error rendering helpers

use std::any::TypeId;
use std::collections::HashMap;
use std::error::Error;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Platform line separator
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Marker for error types whose message fully explains the problem
///
/// Warnings and error reports show only the message for these, no type or
/// structure. Implement it on a domain error and call
/// [`register_self_contained`] once at startup.
///
/// # Example
///
/// ```
/// use packlog_core::format::{register_self_contained, render_error, SelfContained};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("no signing identity for {0}")]
/// struct MissingIdentity(String);
///
/// impl SelfContained for MissingIdentity {}
///
/// register_self_contained::<MissingIdentity>();
/// let err = MissingIdentity("Developer ID".into());
/// assert_eq!(render_error(&err), "no signing identity for Developer ID");
/// ```
pub trait SelfContained: Error + 'static {}

type Matcher = fn(&(dyn Error + 'static)) -> bool;

fn matches<E: SelfContained>(err: &(dyn Error + 'static)) -> bool {
    err.is::<E>()
}

/// Error types registered as self-contained
static SELF_CONTAINED: Lazy<RwLock<HashMap<TypeId, Matcher>>> = Lazy::new(|| {
    let mut map: HashMap<TypeId, Matcher> = HashMap::new();
    map.insert(TypeId::of::<SelfContainedError>(), matches::<SelfContainedError>);
    RwLock::new(map)
});

/// Register `E` as self-contained; registering twice is harmless
pub fn register_self_contained<E: SelfContained>() {
    SELF_CONTAINED
        .write()
        .insert(TypeId::of::<E>(), matches::<E>);
}

/// Ready-made self-contained error for ad-hoc messages
///
/// # Example
///
/// ```
/// use packlog_core::format::{render_error, SelfContainedError};
///
/// let err = SelfContainedError::new("disk full");
/// assert_eq!(render_error(&err), "disk full");
/// ```
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct SelfContainedError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl SelfContained for SelfContainedError {}

impl SelfContainedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the lower-level error that led to this one
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Whether `err` is of a type marked self-contained
pub fn is_self_contained(err: &(dyn Error + 'static)) -> bool {
    SELF_CONTAINED.read().values().any(|matcher| matcher(err))
}

/// One-line form of an error
///
/// Self-contained errors render as their message. Anything else renders as
/// `<debug>: <message>` so the error type stays visible next to its text.
pub fn render_error(err: &(dyn Error + 'static)) -> String {
    if is_self_contained(err) {
        err.to_string()
    } else {
        format!("{:?}: {}", err, err)
    }
}

/// Multi-line report of an error and its source chain
///
/// The message comes first, then the indented structure of the error, then a
/// numbered `Caused by:` list. The returned buffer always ends with
/// [`LINE_SEPARATOR`].
pub fn render_stack_trace(err: &(dyn Error + 'static)) -> String {
    let mut buf = err.to_string();
    buf.push_str(LINE_SEPARATOR);
    for line in format!("{:#?}", err).lines() {
        buf.push_str("    ");
        buf.push_str(line);
        buf.push_str(LINE_SEPARATOR);
    }

    let mut source = err.source();
    if source.is_some() {
        buf.push_str("Caused by:");
        buf.push_str(LINE_SEPARATOR);
    }
    let mut depth = 0;
    while let Some(cause) = source {
        buf.push_str(&format!("    {}: {}{}", depth, cause, LINE_SEPARATOR));
        depth += 1;
        source = cause.source();
    }
    buf
}

/// Report used by error and trace output
///
/// Self-contained errors collapse to their message unless `full` is set.
pub fn render_report(err: &(dyn Error + 'static), full: bool) -> String {
    if !full && is_self_contained(err) {
        return err.to_string();
    }
    strip_trailing_line_separator(&render_stack_trace(err)).to_string()
}

/// Remove exactly one trailing line separator, if present
pub fn strip_trailing_line_separator(text: &str) -> &str {
    text.strip_suffix(LINE_SEPARATOR).unwrap_or(text)
}
