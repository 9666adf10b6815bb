//! Lane datapath stand-in.
//!
//! A fixed-latency pipeline with no numeric fidelity: accumulation keeps an integer running maximum and
//! sum of the elements, inversion replaces the sum with a fixed-point reciprocal, and division passes
//! the words through unchanged.

use arrayvec::ArrayVec;
use softflow_std::*;

use super::Narrow;
use crate::constants::bench::LANE_DEPTH;
use crate::constants::fabric::{ELEMS_PER_LANE, ELEM_WIDTH};
use crate::types::{LaneCtrl, LaneFlags};

#[derive(Debug)]
struct Item {
    word: Narrow,
    remaining: u32,
    /// Entered while dividing: leaves through the merger instead of the accumulator.
    dividing: bool,
}

/// Countdown to a done pulse.
#[derive(Debug, Default)]
struct Timer {
    remaining: Option<u32>,
    reported: bool,
}

impl Timer {
    /// Advances the timer. Returns `true` on the cycle it expires.
    fn tick(&mut self, trigger: bool, delay: u32) -> bool {
        match self.remaining {
            Some(0) => {
                self.remaining = None;
                self.reported = true;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - 1);
                false
            }
            None => {
                if trigger && !self.reported {
                    self.remaining = Some(delay);
                }
                false
            }
        }
    }
}

/// Fixed-point reciprocal of the denominator.
pub(crate) fn reciprocal(den: u32) -> u32 { u32::MAX / den.max(1) }

#[derive(Debug)]
pub(super) struct LaneModel {
    index: usize,
    latency: u32,
    acc_delay: u32,
    inv_delay: u32,
    stall_period: u32,
    pipeline: ArrayVec<Item, LANE_DEPTH>,
    max: u32,
    den: u32,
    acc: Timer,
    inv: Timer,
    acc_done: bool,
    inv_done: bool,
    /// The reciprocal is available: division may proceed.
    recip: bool,
}

impl LaneModel {
    pub(super) fn new(index: usize, latency: u32, acc_delay: u32, inv_delay: u32, stall_period: u32) -> Self {
        Self {
            index,
            latency,
            acc_delay: acc_delay + index as u32,
            inv_delay: inv_delay + index as u32,
            stall_period,
            pipeline: ArrayVec::new(),
            max: 0,
            den: 0,
            acc: Timer::default(),
            inv: Timer::default(),
            acc_done: false,
            inv_done: false,
            recip: false,
        }
    }

    /// Normalized word offered to the merger. Held until the reciprocal is loaded or inverted.
    pub(super) fn fwd(&self) -> Valid<Narrow> {
        match self.pipeline.first() {
            Some(item) if self.recip && item.dividing && item.remaining == 0 => Valid::valid(item.word.clone()),
            _ => Valid::invalid(),
        }
    }

    /// Readiness towards the splitter.
    pub(super) fn bwd(&self, cycle: u64) -> Ready {
        let stalled =
            self.stall_period != 0 && (cycle + self.index as u64) % u64::from(self.stall_period) == 0;
        Ready::new(!self.pipeline.is_full() && !stalled)
    }

    pub(super) fn flags(&self) -> LaneFlags {
        LaneFlags {
            busy: !self.pipeline.is_empty(),
            acc_done: self.acc_done,
            inv_done: self.inv_done,
            max: self.max,
            den: self.den,
        }
    }

    fn accumulate(&mut self, word: &Narrow) {
        for k in 0..ELEMS_PER_LANE {
            let (data, strb) = word.elem(k, ELEM_WIDTH);
            if !strb.iter().all(|b| *b) {
                continue;
            }
            let elem = data.iter().rev().fold(0_u32, |acc, bit| (acc << 1) | u32::from(*bit));
            self.max = self.max.max(elem);
            self.den = self.den.wrapping_add(elem);
        }
    }

    /// Advances one cycle with this cycle's accepted word, merger commit and control.
    pub(super) fn update(&mut self, ingress: Option<Narrow>, egress_transfer: bool, ctrl: &LaneCtrl) {
        if egress_transfer {
            let _ = self.pipeline.remove(0);
        }
        for item in self.pipeline.iter_mut() {
            item.remaining = item.remaining.saturating_sub(1);
        }
        while let Some(item) = self.pipeline.first() {
            if item.dividing || item.remaining > 0 {
                break;
            }
            let item = self.pipeline.remove(0);
            self.accumulate(&item.word);
        }
        if let Some(word) = ingress {
            self.pipeline.push(Item { word, remaining: self.latency, dividing: ctrl.dividing });
        }

        self.acc_done = self.acc.tick(ctrl.acc_finished, self.acc_delay);
        self.inv_done = self.inv.tick(ctrl.dividing && ctrl.disable_max, self.inv_delay);
        if self.inv_done {
            self.den = reciprocal(self.den);
            self.recip = true;
        }

        if ctrl.load_max {
            self.max = ctrl.max;
        }
        if ctrl.load_den || ctrl.load_recip {
            self.den = ctrl.den;
            self.recip = ctrl.load_recip;
        }
        if ctrl.clear_regs {
            log::trace!("lane {}: clear", self.index);
            self.max = 0;
            self.den = 0;
            self.recip = false;
            self.acc = Timer::default();
            self.inv = Timer::default();
        }
    }
}
