//! Controller interface and state.

use std::array;

use softflow::*;
use softflow_std::*;

use super::*;

/// Controller inputs.
#[derive(Debug, Clone, PartialEq, Eq, Signal)]
pub struct CtrlInput<const N: usize> {
    /// Starts the command in `regs` (pulse).
    pub start: bool,
    /// Synchronous clear.
    pub clear: bool,
    /// Register file snapshot.
    pub regs: Regs,
    /// Inbound streamer finished (pulse).
    pub in_done: bool,
    /// Outbound streamer finished (pulse).
    pub out_done: bool,
    /// Status flags of each lane.
    pub lanes: [LaneFlags; N],
    /// Read-back of the slot addressed by the command.
    pub slot: SlotReadback<N>,
}

impl<const N: usize> Default for CtrlInput<N> {
    fn default() -> Self {
        Self {
            start: false,
            clear: false,
            regs: Regs::default(),
            in_done: false,
            out_done: false,
            lanes: [LaneFlags::default(); N],
            slot: SlotReadback::default(),
        }
    }
}

/// Controller outputs.
#[derive(Debug, Clone, PartialEq, Eq, Signal)]
pub struct CtrlOutput<const N: usize> {
    /// A command is in progress.
    pub busy: bool,
    /// Command done event (pulse).
    pub evt: bool,
    /// Inbound streamer control.
    pub in_stream: StreamCtrl,
    /// Outbound streamer control.
    pub out_stream: StreamCtrl,
    /// Cast configuration of the current pass.
    pub cast: CastCfg,
    /// Control of each lane.
    pub lanes: [LaneCtrl; N],
    /// Slot allocate or load request.
    pub slot_req: Valid<SlotReq>,
    /// Slot update or free request.
    pub slot_upd: Valid<SlotUpdate<N>>,
    /// Base address of the slot cache.
    pub cache_base: u32,
}

impl<const N: usize> Default for CtrlOutput<N> {
    fn default() -> Self {
        Self {
            busy: false,
            evt: false,
            in_stream: StreamCtrl::default(),
            out_stream: StreamCtrl::default(),
            cast: CastCfg::default(),
            lanes: array::from_fn(|_| LaneCtrl::default()),
            slot_req: Valid::invalid(),
            slot_upd: Valid::invalid(),
            cache_base: 0,
        }
    }
}

/// Controller states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub enum State {
    #[default]
    Idle,
    WaitSlotValid,
    Accumulation,
    WaitDatapathEmpty,
    WaitAccumulation,
    WaitInversion,
    Dividing,
    Finished,
}

/// Registers of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
pub struct CtrlState<const N: usize> {
    /// Current state.
    pub state: State,
    /// Command of the current pass.
    pub cmd: Command,
    /// Register snapshot of the current pass.
    pub regs: Regs,
    /// Cast configuration of the current pass.
    pub cast: CastCfg,
    /// Lanes whose accumulator finished.
    pub acc_done: DoneBitmap<N>,
    /// Lanes whose inverter finished.
    pub inv_done: DoneBitmap<N>,
    /// Base address of the slot cache.
    pub cache_base: u32,
}

impl<const N: usize> Default for CtrlState<N> {
    fn default() -> Self {
        Self {
            state: State::Idle,
            cmd: Command::default(),
            regs: Regs::default(),
            cast: CastCfg::default(),
            acc_done: DoneBitmap::new(),
            inv_done: DoneBitmap::new(),
            cache_base: 0,
        }
    }
}
