//! Composition of capability contracts
//!
//! A capability contract is a trait whose methods are all unit-returning actions,
//! plus the `enabled()` query inherited from [`Capability`]. Contracts are declared
//! with [`capability!`](crate::capability), which also generates:
//! - a no-op implementation on [`Discard`]
//! - a fan-out implementation on [`Fanout`] that forwards every call to each target in order
//! - a [`Composable`] implementation on the contract's trait object
//!
//! [`compose`] then turns any number of candidate implementations into a single one.
//!
//! ```rust
//! use std::sync::Arc;
//! use packlog_core::capability;
//! use packlog_core::compose::{compose, Capability};
//!
//! capability! {
//!     pub trait Beeper {
//!         fn beep(&self, times: u32);
//!     }
//! }
//!
//! struct Loud;
//! impl Capability for Loud {
//!     fn enabled(&self) -> bool { true }
//! }
//! impl Beeper for Loud {
//!     fn beep(&self, _times: u32) {}
//! }
//!
//! let none: Arc<dyn Beeper> = compose(Vec::new());
//! assert!(!none.enabled());
//!
//! let one: Arc<dyn Beeper> = Arc::new(Loud);
//! assert!(Arc::ptr_eq(&compose(vec![one.clone()]), &one));
//! ```
//!
//! Only unit-returning methods are accepted, so a contract that would need a
//! composed return value does not compile:
//!
//! ```compile_fail
//! use packlog_core::capability;
//!
//! capability! {
//!     pub trait Counter {
//!         fn count(&self) -> usize;
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

#[doc(hidden)]
pub use once_cell::sync::Lazy as __Lazy;

/// The query every capability contract shares
pub trait Capability: Send + Sync {
    /// Whether calls on this instance can have any effect
    fn enabled(&self) -> bool;
}

/// Implemented by `dyn Contract` for every contract declared with `capability!`
pub trait Composable: Capability {
    /// Process-wide discarding instance of the contract
    fn discarding() -> Arc<Self>;

    /// An instance forwarding every action to `targets`, in order
    fn fan_out(targets: Vec<Arc<Self>>) -> Arc<Self>;
}

/// Implements every contract with no-op actions
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Capability for Discard {
    fn enabled(&self) -> bool {
        false
    }
}

/// Forwards every action to an ordered list of targets
pub struct Fanout<T: ?Sized> {
    targets: Vec<Arc<T>>,
}

impl<T: ?Sized> Fanout<T> {
    pub fn new(targets: Vec<Arc<T>>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[Arc<T>] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<T: ?Sized + Send + Sync> Capability for Fanout<T> {
    fn enabled(&self) -> bool {
        true
    }
}

impl<T: ?Sized> fmt::Debug for Fanout<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fanout")
            .field("targets", &format!("[{} targets]", self.targets.len()))
            .finish()
    }
}

/// Combine candidate implementations of one contract
///
/// Disabled candidates are dropped. No survivor yields the contract's discarding
/// instance, a single survivor is returned as-is, and several survivors are wrapped
/// in a fan-out that keeps their order.
pub fn compose<T>(candidates: impl IntoIterator<Item = Arc<T>>) -> Arc<T>
where
    T: Composable + ?Sized,
{
    let mut enabled: Vec<Arc<T>> = candidates.into_iter().filter(|c| c.enabled()).collect();
    if enabled.len() > 1 {
        return T::fan_out(enabled);
    }
    enabled.pop().unwrap_or_else(T::discarding)
}

/// Declare a capability contract
///
/// Methods must take `&self` and return nothing; arguments must be `Copy`
/// (references, integers, options of those) so a fan-out can hand them to each target.
#[macro_export]
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$fn_meta:meta])*
                fn $method:ident(&self $(, $arg:ident: $ty:ty)*);
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name: $crate::compose::Capability {
            $(
                $(#[$fn_meta])*
                fn $method(&self $(, $arg: $ty)*);
            )*
        }

        impl $name for $crate::compose::Discard {
            $(
                #[inline]
                fn $method(&self $(, _: $ty)*) {}
            )*
        }

        impl $name for $crate::compose::Fanout<dyn $name> {
            $(
                fn $method(&self $(, $arg: $ty)*) {
                    for target in self.targets() {
                        target.$method($($arg),*);
                    }
                }
            )*
        }

        impl $crate::compose::Composable for dyn $name {
            fn discarding() -> ::std::sync::Arc<Self> {
                static DISCARD: $crate::compose::__Lazy<::std::sync::Arc<dyn $name>> =
                    $crate::compose::__Lazy::new(|| {
                        ::std::sync::Arc::new($crate::compose::Discard)
                    });
                ::std::sync::Arc::clone(&DISCARD)
            }

            fn fan_out(targets: ::std::vec::Vec<::std::sync::Arc<Self>>) -> ::std::sync::Arc<Self> {
                ::std::sync::Arc::new($crate::compose::Fanout::new(targets))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    crate::capability! {
        trait Probe {
            fn hit(&self, tag: &str);
            fn hit_with(&self, tag: &str, count: Option<u32>);
        }
    }

    type Calls = Arc<Mutex<Vec<String>>>;

    struct Spy {
        id: &'static str,
        enabled: bool,
        calls: Calls,
    }

    impl Spy {
        fn new(id: &'static str, enabled: bool, calls: &Calls) -> Arc<dyn Probe> {
            Arc::new(Self {
                id,
                enabled,
                calls: Arc::clone(calls),
            })
        }
    }

    impl Capability for Spy {
        fn enabled(&self) -> bool {
            self.enabled
        }
    }

    impl Probe for Spy {
        fn hit(&self, tag: &str) {
            self.calls.lock().push(format!("{}:{}", self.id, tag));
        }

        fn hit_with(&self, tag: &str, count: Option<u32>) {
            self.calls.lock().push(format!("{}:{}:{:?}", self.id, tag, count));
        }
    }

    #[test]
    fn test_compose_empty_is_discarding() {
        let composed: Arc<dyn Probe> = compose(Vec::new());
        assert!(!composed.enabled());
        assert!(Arc::ptr_eq(&composed, &<dyn Probe>::discarding()));
    }

    #[test]
    fn test_compose_all_disabled_is_noop() {
        let calls = Calls::default();
        let composed = compose(vec![Spy::new("a", false, &calls), Spy::new("b", false, &calls)]);
        assert!(!composed.enabled());

        composed.hit("x");
        composed.hit_with("y", Some(1));
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_compose_single_is_identity() {
        let calls = Calls::default();
        let only = Spy::new("a", true, &calls);
        let composed = compose(vec![Spy::new("off", false, &calls), only.clone()]);
        assert!(Arc::ptr_eq(&composed, &only));
    }

    #[test]
    fn test_compose_many_fans_out_in_order() {
        let calls = Calls::default();
        let composed = compose(vec![
            Spy::new("a", true, &calls),
            Spy::new("off", false, &calls),
            Spy::new("b", true, &calls),
            Spy::new("c", true, &calls),
        ]);
        assert!(composed.enabled());

        composed.hit("1");
        composed.hit_with("2", None);
        assert_eq!(
            *calls.lock(),
            vec!["a:1", "b:1", "c:1", "a:2:None", "b:2:None", "c:2:None"]
        );
    }

    #[test]
    fn test_discarding_is_singleton() {
        let first = <dyn Probe>::discarding();
        let second = <dyn Probe>::discarding();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_fanout_debug() {
        let calls = Calls::default();
        let fanout = Fanout::new(vec![Spy::new("a", true, &calls)]);
        assert_eq!(fanout.len(), 1);
        assert!(format!("{:?}", fanout).contains("1 targets"));
    }
}
