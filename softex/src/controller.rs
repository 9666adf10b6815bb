//! Lane controller.
//!
//! Sequences the accumulate and normalize passes of a softmax over the lane array. The controller is
//! not on the data path: it starts the address-generation streamers, drives the per-lane control
//! signals, watches the per-lane status flags, and keeps the state slots in sync.

use softflow::*;
use softflow_std::*;

use crate::types::*;

/// Ingress of the controller.
pub type ControllerI<const N: usize> = UniChannel<CtrlInput<N>>;

/// Egress of the controller.
pub type ControllerO<const N: usize> = UniChannel<CtrlOutput<N>>;

/// Transition function of the controller.
pub type ControllerF<const N: usize> = fn(CtrlInput<N>, (), CtrlState<N>) -> (CtrlOutput<N>, (), CtrlState<N>);

/// Lane controller of `N` lanes.
pub type Controller<const N: usize> = Fsm<ControllerI<N>, ControllerO<N>, CtrlState<N>, ControllerF<N>>;

/// Starts the streamers of a pass and preloads the lanes from `preload`. Returns the next state.
fn begin_pass<const N: usize>(out: &mut CtrlOutput<N>, s: &CtrlState<N>, preload: Option<&SlotReadback<N>>) -> State {
    out.in_stream = StreamCtrl::start(s.regs.in_addr, s.regs.tot_len);
    if s.cmd.div_only {
        out.out_stream = StreamCtrl::start(s.regs.out_addr, s.regs.tot_len);
    }

    if let Some(slot) = preload {
        for (lane, ctrl) in out.lanes.iter_mut().enumerate() {
            ctrl.load_max = true;
            ctrl.max = slot.max[lane];
            ctrl.den = slot.den[lane];
            // A divide-only pass continues from the reciprocal.
            ctrl.load_den = s.cmd.acc_only;
            ctrl.load_recip = s.cmd.div_only;
        }
    }

    if s.cmd.div_only {
        State::Dividing
    } else {
        State::Accumulation
    }
}

/// Lane control common to every cycle of a state.
fn lane_ctrl(state: State, cmd: &Command) -> LaneCtrl {
    LaneCtrl {
        acc_only: cmd.acc_only,
        acc_finished: state == State::WaitAccumulation,
        dividing: matches!(state, State::WaitInversion | State::Dividing),
        disable_max: matches!(state, State::WaitAccumulation | State::WaitInversion),
        clear_regs: state == State::Finished,
        ..LaneCtrl::default()
    }
}

fn controller_fsm<const N: usize>(input: CtrlInput<N>, _: (), s: CtrlState<N>) -> (CtrlOutput<N>, (), CtrlState<N>) {
    let mut out = CtrlOutput::<N> {
        busy: !matches!(s.state, State::Idle | State::Finished),
        cast: s.cast,
        cache_base: s.cache_base,
        ..CtrlOutput::default()
    };
    out.lanes.fill(lane_ctrl(s.state, &s.cmd));

    if input.clear {
        return (out, (), CtrlState::default());
    }

    let mut s_next = s;
    let state_next = match s.state {
        State::Idle if input.start => {
            let cmd = Command::decode(input.regs.command);
            let s = CtrlState { cmd, regs: input.regs, cast: CastCfg::decode(input.regs.cast_ctrl, &cmd), ..s };
            s_next = s;

            if cmd.no_op {
                out.evt = true;
                State::Idle
            } else if cmd.set_cache_addr {
                s_next.cache_base = input.regs.in_addr;
                out.evt = true;
                State::Idle
            } else if cmd.is_slot_pass() {
                if cmd.acquire_slot {
                    out.slot_req = Valid::valid(SlotReq { addr: cmd.slot, op: SlotOp::Alloc });
                    begin_pass(&mut out, &s, None)
                } else {
                    out.slot_req = Valid::valid(SlotReq { addr: cmd.slot, op: SlotOp::Load });
                    if input.slot.valid {
                        begin_pass(&mut out, &s, Some(&input.slot))
                    } else {
                        State::WaitSlotValid
                    }
                }
            } else {
                begin_pass(&mut out, &s, None)
            }
        }
        State::Idle => State::Idle,
        State::WaitSlotValid => {
            if input.slot.valid {
                begin_pass(&mut out, &s, Some(&input.slot))
            } else {
                State::WaitSlotValid
            }
        }
        State::Accumulation => {
            if input.in_done {
                State::WaitDatapathEmpty
            } else {
                State::Accumulation
            }
        }
        State::WaitDatapathEmpty => {
            if input.lanes.iter().all(|lane| !lane.busy) {
                State::WaitAccumulation
            } else {
                State::WaitDatapathEmpty
            }
        }
        State::WaitAccumulation => {
            let acc_done = s.acc_done.merge(input.lanes.iter().map(|lane| lane.acc_done));
            if acc_done.all() {
                log::debug!("controller: accumulation barrier passed");
                s_next.acc_done = acc_done.clear();
                match (s.cmd.acc_only, s.cmd.last) {
                    (true, false) => State::Finished,
                    // The denominator is inverted in place.
                    (true, true) => State::WaitInversion,
                    (false, _) => {
                        out.in_stream = StreamCtrl::start(s.regs.in_addr, s.regs.tot_len);
                        out.out_stream = StreamCtrl::start(s.regs.out_addr, s.regs.tot_len);
                        State::WaitInversion
                    }
                }
            } else {
                s_next.acc_done = acc_done;
                State::WaitAccumulation
            }
        }
        State::WaitInversion => {
            let inv_done = s.inv_done.merge(input.lanes.iter().map(|lane| lane.inv_done));
            if inv_done.all() {
                log::debug!("controller: inversion barrier passed");
                s_next.inv_done = inv_done.clear();
                if s.cmd.acc_only {
                    State::Finished
                } else {
                    State::Dividing
                }
            } else {
                s_next.inv_done = inv_done;
                State::WaitInversion
            }
        }
        State::Dividing => {
            if input.out_done {
                State::Finished
            } else {
                State::Dividing
            }
        }
        State::Finished => {
            out.evt = true;
            if s.cmd.acc_only {
                out.slot_upd = Valid::valid(SlotUpdate {
                    addr: s.cmd.slot,
                    op: SlotUpdOp::Update,
                    max: input.lanes.map(|lane| lane.max),
                    den: input.lanes.map(|lane| lane.den),
                });
            } else if s.cmd.div_only && s.cmd.last {
                out.slot_upd = Valid::valid(SlotUpdate { addr: s.cmd.slot, op: SlotUpdOp::Free, ..SlotUpdate::default() });
            }
            State::Idle
        }
    };
    s_next.state = state_next;

    if s_next.state != s.state {
        log::debug!("controller: {:?} -> {:?}", s.state, s_next.state);
    }

    (out, (), s_next)
}

/// Creates a controller of `N` lanes.
pub fn controller<const N: usize>() -> Controller<N> {
    Controller::new("softex_ctrl", controller_fsm::<N>, CtrlState::default())
}
