//! Address-generation streamer stand-ins.

use softflow_std::*;

use super::Wide;
use crate::constants::bench::WORD_BYTES;
use crate::types::StreamCtrl;

/// Number of wide words of a `len`-byte stream.
pub(super) fn words(len: u32) -> u32 { (len as usize).div_ceil(WORD_BYTES) as u32 }

/// Payload of the `index`-th word read from `addr`.
pub fn pattern(addr: u32, index: u32) -> Wide {
    let bytes = (0..WORD_BYTES)
        .map(|i| (addr as usize + index as usize * WORD_BYTES + i).wrapping_mul(0x9e) as u8 ^ (index as u8))
        .collect::<Vec<_>>();
    Wide::from_bytes(&bytes)
}

/// Inbound streamer: reads `len` bytes from `addr` and pushes them as wide words.
#[derive(Debug, Default)]
pub(super) struct InStreamer {
    addr: u32,
    sent: u32,
    total: u32,
    done: bool,
}

impl InStreamer {
    /// Word offered this cycle.
    pub(super) fn fwd(&self) -> Valid<Wide> {
        if self.sent < self.total {
            Valid::valid(pattern(self.addr, self.sent))
        } else {
            Valid::invalid()
        }
    }

    /// Memory request: asserted while words remain to be read.
    pub(super) fn req(&self) -> bool { self.sent < self.total }

    /// Done pulse, one cycle after the last word is accepted.
    pub(super) fn done(&self) -> bool { self.done }

    pub(super) fn update(&mut self, ctrl: &StreamCtrl, transfer: bool) {
        self.done = false;
        if transfer {
            self.sent += 1;
            self.done = self.sent == self.total;
        }
        if ctrl.start {
            log::trace!("in streamer: {} bytes from {:#x}", ctrl.len, ctrl.addr);
            *self = Self { addr: ctrl.addr, sent: 0, total: words(ctrl.len), done: false };
        }
    }
}

/// Outbound streamer: accepts merged words and writes them to `addr`.
#[derive(Debug, Default)]
pub(super) struct OutStreamer {
    received: u32,
    total: u32,
    stall_period: u32,
    done: bool,
    words: Vec<Wide>,
}

impl OutStreamer {
    pub(super) fn new(stall_period: u32) -> Self { Self { stall_period, ..Self::default() } }

    pub(super) fn bwd(&self, cycle: u64) -> Ready {
        let stalled = self.stall_period != 0 && cycle % u64::from(self.stall_period) == 0;
        Ready::new(self.received < self.total && !stalled)
    }

    pub(super) fn done(&self) -> bool { self.done }

    pub(super) fn update(&mut self, ctrl: &StreamCtrl, transfer: Option<Wide>) {
        self.done = false;
        if let Some(word) = transfer {
            self.words.push(word);
            self.received += 1;
            self.done = self.received == self.total;
        }
        if ctrl.start {
            log::trace!("out streamer: {} bytes to {:#x}", ctrl.len, ctrl.addr);
            self.received = 0;
            self.total = words(ctrl.len);
            self.words.clear();
        }
    }

    /// Words written since the last start.
    pub(super) fn take_words(&mut self) -> Vec<Wide> { std::mem::take(&mut self.words) }
}
