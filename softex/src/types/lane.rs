//! Per-lane control and status.

use softflow::*;

/// Status reported by a lane datapath.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct LaneFlags {
    /// Items are in flight in the lane pipeline.
    pub busy: bool,
    /// The accumulator finished (pulse).
    pub acc_done: bool,
    /// The inverter finished (pulse).
    pub inv_done: bool,
    /// Running maximum.
    pub max: u32,
    /// Denominator, or its reciprocal once inverted.
    pub den: u32,
}

/// Control driven into a lane datapath.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct LaneCtrl {
    /// The input stream ended: start the accumulator reduction.
    pub acc_finished: bool,
    /// The pass only accumulates.
    pub acc_only: bool,
    /// Load `den` as the reciprocal.
    pub load_recip: bool,
    /// Incoming words are normalized and sent to the merger.
    pub dividing: bool,
    /// Freeze the running maximum.
    pub disable_max: bool,
    /// Clear the per-pass registers.
    pub clear_regs: bool,
    /// Load `max`.
    pub load_max: bool,
    /// Load `den` as the denominator.
    pub load_den: bool,
    /// Value loaded with `load_max`.
    pub max: u32,
    /// Value loaded with `load_den` or `load_recip`.
    pub den: u32,
}

/// Start command of an address-generation streamer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct StreamCtrl {
    /// Start pulse.
    pub start: bool,
    /// Byte address.
    pub addr: u32,
    /// Length in bytes.
    pub len: u32,
}

impl StreamCtrl {
    /// Start pulse.
    pub fn start(addr: u32, len: u32) -> Self { Self { start: true, addr, len } }
}
