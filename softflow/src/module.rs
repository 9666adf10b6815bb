use std::fmt::Debug;

use crate::{Bwd, Fwd, Interface};

/// Synchronous module with ingress interface `I` and egress interface `O`.
///
/// Every module is clocked by the same global clock. In a cycle, the outputs are a function of the
/// current state and the current inputs; the next state is committed at the clock edge.
pub trait Module<I: Interface, O: Interface>: Debug {
    /// Module name.
    fn module_name(&self) -> &str;

    /// Evaluates the combinational outputs of the current cycle without advancing the clock.
    fn comb(&self, ingress: &Fwd<I>, egress: &Bwd<O>) -> (Fwd<O>, Bwd<I>);

    /// Evaluates the combinational outputs of the current cycle and advances one clock edge.
    fn step(&mut self, ingress: &Fwd<I>, egress: &Bwd<O>) -> (Fwd<O>, Bwd<I>);

    /// Asynchronous reset to the initial state.
    fn reset(&mut self);
}
