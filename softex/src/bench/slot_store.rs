//! State slot store stand-in.

use std::fmt;

use softflow_std::*;

use crate::constants::fabric::LANES;
use crate::constants::slot::NUM_SLOTS;
use crate::types::{SlotOp, SlotReadback, SlotReq, SlotUpdOp, SlotUpdate};

/// Slot traffic counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlotStats {
    pub allocs: usize,
    pub loads: usize,
    pub updates: usize,
    pub frees: usize,
}

impl fmt::Display for SlotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} alloc, {} load, {} update, {} free", self.allocs, self.loads, self.updates, self.frees)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Slot {
    allocated: bool,
    /// Holds values written by an update.
    valid: bool,
    max: [u32; LANES],
    den: [u32; LANES],
}

#[derive(Debug, Default)]
pub(super) struct SlotStore {
    slots: [Slot; NUM_SLOTS],
    stats: SlotStats,
}

impl SlotStore {
    pub(super) fn readback(&self, slot: usize) -> SlotReadback<LANES> {
        let slot = &self.slots[slot];
        SlotReadback { valid: slot.valid, max: slot.max, den: slot.den }
    }

    pub(super) fn apply(&mut self, req: &Valid<SlotReq>, upd: &Valid<SlotUpdate<LANES>>) {
        if req.valid {
            let slot = &mut self.slots[req.inner.addr.to_u64() as usize];
            match req.inner.op {
                SlotOp::Alloc => {
                    if slot.allocated {
                        log::warn!("slot {} allocated twice", req.inner.addr.to_u64());
                    }
                    *slot = Slot { allocated: true, ..Slot::default() };
                    self.stats.allocs += 1;
                }
                SlotOp::Load => self.stats.loads += 1,
            }
        }

        if upd.valid {
            let slot = &mut self.slots[upd.inner.addr.to_u64() as usize];
            match upd.inner.op {
                SlotUpdOp::Update => {
                    *slot = Slot { allocated: true, valid: true, max: upd.inner.max, den: upd.inner.den };
                    self.stats.updates += 1;
                }
                SlotUpdOp::Free => {
                    *slot = Slot::default();
                    self.stats.frees += 1;
                }
            }
        }
    }

    pub(super) fn stats(&self) -> SlotStats { self.stats }
}
