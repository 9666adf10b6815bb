use std::fmt::Debug;

use crate::{PortDecls, Signal};

/// Channel's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTyp {
    /// Forward value.
    pub fwd: PortDecls,

    /// Backward value.
    pub bwd: PortDecls,
}

impl ChannelTyp {
    /// Creates a new channel type.
    pub const fn new(fwd: PortDecls, bwd: PortDecls) -> Self { Self { fwd, bwd } }
}

/// Interface of channels.
///
/// An interface is a type-level description of the wires between two modules: the forward signals
/// driven by the producer and the backward signals driven by the consumer.
pub trait Interface: 'static + Sized + Debug {
    /// Forward signals.
    type Fwd: Signal;

    /// Backward signals.
    type Bwd: Signal;

    /// Returns the interface type.
    fn interface_typ() -> ChannelTyp { ChannelTyp::new(Self::Fwd::port_decls(), Self::Bwd::port_decls()) }
}

/// Forward signals of an interface.
pub type Fwd<I: Interface> = <I as Interface>::Fwd;

/// Backward signals of an interface.
pub type Bwd<I: Interface> = <I as Interface>::Bwd;

impl Interface for () {
    type Bwd = ();
    type Fwd = ();
}

macro_rules! impl_interface_tuple {
    ($($a:ident)+) => {
        impl<$($a: Interface,)+> Interface for ($($a,)+) {
            type Bwd = ($($a::Bwd,)+);
            type Fwd = ($($a::Fwd,)+);
        }
    };
}

impl_interface_tuple! { I1 }
impl_interface_tuple! { I1 I2 }
impl_interface_tuple! { I1 I2 I3 }
impl_interface_tuple! { I1 I2 I3 I4 }
impl_interface_tuple! { I1 I2 I3 I4 I5 }
impl_interface_tuple! { I1 I2 I3 I4 I5 I6 }

impl<I: Interface, const N: usize> Interface for [I; N] {
    type Bwd = [I::Bwd; N];
    type Fwd = [I::Fwd; N];
}

/// Macro for declaring a custom channel.
///
/// ```ignore
/// channel!(UniChannel<V: Signal>, V, ());
/// ```
#[macro_export]
macro_rules! channel {
    (
        $(#[$meta:meta])*
        $channel_name: ident,
        $fwd: ty,
        $bwd: ty
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $channel_name;

        impl $crate::Interface for $channel_name {
            type Bwd = $bwd;
            type Fwd = $fwd;
        }
    };
    (
        $(#[$meta:meta])*
        $channel_name: ident <$value_generic:ident: Signal>,
        $fwd: ty,
        $bwd: ty
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $channel_name<$value_generic: $crate::Signal> {
            _marker: ::std::marker::PhantomData<$value_generic>,
        }

        impl<$value_generic: $crate::Signal> $crate::Interface for $channel_name<$value_generic> {
            type Bwd = $bwd;
            type Fwd = $fwd;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    channel!(
        /// Test channel.
        TestChannel<V: Signal>, (V, bool), bool
    );

    #[test]
    fn channel_typ() {
        let typ = <[TestChannel<u8>; 2]>::interface_typ();
        assert_eq!(typ.fwd.width(), 18);
        assert_eq!(typ.bwd.width(), 2);
        assert_eq!(<(TestChannel<u8>, ())>::interface_typ().fwd.width(), 9);
    }
}
