//! Finite state machine (Mealy machine).

use std::fmt;
use std::marker::PhantomData;

use crate::*;

/// Finite state machine (Mealy machine).
#[derive(Clone)]
pub struct Fsm<I: Interface, O: Interface, S: Signal, F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)> {
    /// Module name.
    module_name: String,
    /// FSM function.
    f: F,
    /// Initial value of registers in the FSM.
    init: S,
    /// Current value of registers in the FSM.
    state: S,
    _marker: PhantomData<(I, O)>,
}

impl<I: Interface, O: Interface, S: Signal, F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)> Fsm<I, O, S, F> {
    /// Creates a new FSM.
    ///
    /// The FSM is described by `f`, which computes (1) the current-cycle egress forward signals, (2) the
    /// current-cycle ingress backward signals, and (3) the next-cycle state.
    pub fn new(module_name: &str, f: F, init: S) -> Self {
        Self { module_name: module_name.to_string(), f, state: init.clone(), init, _marker: PhantomData }
    }

    /// Current value of the registers.
    pub fn state(&self) -> &S { &self.state }

    /// Initial value of the registers.
    pub fn init(&self) -> &S { &self.init }
}

impl<I: Interface, O: Interface, S: Signal, F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)> fmt::Debug
    for Fsm<I, O, S, F>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm").field("module_name", &self.module_name).field("state", &self.state).finish()
    }
}

impl<I: Interface, O: Interface, S: Signal, F: Fn(I::Fwd, O::Bwd, S) -> (O::Fwd, I::Bwd, S)> Module<I, O>
    for Fsm<I, O, S, F>
{
    fn module_name(&self) -> &str { &self.module_name }

    fn comb(&self, ingress: &Fwd<I>, egress: &Bwd<O>) -> (Fwd<O>, Bwd<I>) {
        let (egress_fwd, ingress_bwd, _) = (self.f)(ingress.clone(), egress.clone(), self.state.clone());
        (egress_fwd, ingress_bwd)
    }

    fn step(&mut self, ingress: &Fwd<I>, egress: &Bwd<O>) -> (Fwd<O>, Bwd<I>) {
        let (egress_fwd, ingress_bwd, state_next) = (self.f)(ingress.clone(), egress.clone(), self.state.clone());
        self.state = state_next;
        (egress_fwd, ingress_bwd)
    }

    fn reset(&mut self) { self.state = self.init.clone(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    channel!(Wire<V: Signal>, V, ());

    type Counter = Fsm<Wire<bool>, Wire<u8>, u8, fn(bool, (), u8) -> (u8, (), u8)>;

    fn counter() -> Counter {
        Counter::new("counter", |inc, (), count| (count, (), if inc { count.wrapping_add(1) } else { count }), 0)
    }

    #[test]
    fn step_commits_state_comb_does_not() {
        let mut fsm = counter();
        assert_eq!(fsm.step(&true, &()).0, 0);
        assert_eq!(fsm.step(&true, &()).0, 1);
        assert_eq!(fsm.comb(&true, &()).0, 2);
        assert_eq!(*fsm.state(), 2);

        fsm.reset();
        assert_eq!(*fsm.state(), 0);
        assert_eq!(fsm.module_name(), "counter");
    }
}
