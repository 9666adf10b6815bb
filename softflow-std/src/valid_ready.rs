//! Utilities for valid-ready channels.

use softflow_macro::Signal;

use crate::*;

channel! {
    /// Valid-ready channel.
    ///
    /// A transfer commits on cycles where both `valid` and `ready` are asserted.
    VrChannel<V: Signal>, Valid<V>, Ready
}

/// Valid/ready channel's forward signals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Signal)]
pub struct Valid<V: Signal> {
    /// Inner data
    #[member(name = "")]
    pub inner: V,

    /// Valid bit
    pub valid: bool,
}

impl<V: Signal> Valid<V> {
    /// Creates a new value.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner, valid } }

    /// Creates a valid value.
    pub fn valid(inner: V) -> Self { Self::new(true, inner) }

    /// Creates an invalid value.
    pub fn invalid() -> Self
    where V: Default {
        Self::new(false, V::default())
    }

    /// Maps the inner value.
    pub fn map_inner<W: Signal>(self, f: impl FnOnce(V) -> W) -> Valid<W> { Valid { inner: f(self.inner), valid: self.valid } }

    /// Returns the inner value if valid.
    pub fn into_option(self) -> Option<V> { if self.valid { Some(self.inner) } else { None } }

    /// Returns `true` if the transfer commits with the given backward signal.
    pub fn transfer(&self, bwd: &Ready) -> bool { self.valid && bwd.ready }
}

/// Ready signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl Ready {
    /// Creates a new value.
    pub const fn new(ready: bool) -> Self { Self { ready } }
}
