//! Host registers and their decoded forms.

use softflow::*;

use crate::constants::{cast_ctrl, command, slot::SLOT_ID_WIDTH};

/// Register snapshot read by the controller when a command starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct Regs {
    /// Total length of the pass in bytes.
    pub tot_len: u32,
    /// Source address.
    pub in_addr: u32,
    /// Destination address.
    pub out_addr: u32,
    /// Command word.
    pub command: u32,
    /// Cast control word.
    pub cast_ctrl: u32,
}

/// Decoded command word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct Command {
    /// Accumulate-only pass.
    pub acc_only: bool,
    /// Divide-only pass.
    pub div_only: bool,
    /// Last pass of a sequence.
    pub last: bool,
    /// Allocate the slot instead of loading it.
    pub acquire_slot: bool,
    /// Latch `in_addr` as the slot cache base address.
    pub set_cache_addr: bool,
    /// Do nothing but signal completion.
    pub no_op: bool,
    /// Cast the input stream.
    pub cast_in: bool,
    /// Cast the output stream.
    pub cast_out: bool,
    /// State slot of the pass.
    pub slot: Bits<SLOT_ID_WIDTH>,
}

fn bit(word: u32, pos: usize) -> bool { (word >> pos) & 1 == 1 }

fn field(word: u32, pos: usize, width: usize) -> u32 { (word >> pos) & ((1 << width) - 1) }

impl Command {
    /// Decodes a command word.
    pub fn decode(word: u32) -> Self {
        Self {
            acc_only: bit(word, command::ACC_ONLY),
            div_only: bit(word, command::DIV_ONLY),
            last: bit(word, command::LAST),
            acquire_slot: bit(word, command::ACQUIRE_SLOT),
            set_cache_addr: bit(word, command::SET_CACHE_ADDR),
            no_op: bit(word, command::NO_OP),
            cast_in: bit(word, command::CAST_IN),
            cast_out: bit(word, command::CAST_OUT),
            slot: Bits::from_u64(u64::from(field(word, command::SLOT_ID, SLOT_ID_WIDTH))),
        }
    }

    /// Encodes the command word.
    pub fn encode(&self) -> u32 {
        [
            (self.acc_only, command::ACC_ONLY),
            (self.div_only, command::DIV_ONLY),
            (self.last, command::LAST),
            (self.acquire_slot, command::ACQUIRE_SLOT),
            (self.set_cache_addr, command::SET_CACHE_ADDR),
            (self.no_op, command::NO_OP),
            (self.cast_in, command::CAST_IN),
            (self.cast_out, command::CAST_OUT),
        ]
        .iter()
        .fold((self.slot.to_u64() as u32) << command::SLOT_ID, |acc, (flag, pos)| acc | (u32::from(*flag) << pos))
    }

    /// Returns `true` if the pass keeps its state in a slot.
    pub fn is_slot_pass(&self) -> bool { self.acc_only || self.div_only }

    /// Slot index.
    pub fn slot_id(&self) -> usize { self.slot.to_u64() as usize }

    /// Accumulate-only pass command.
    pub fn acc(slot: usize, acquire_slot: bool, last: bool) -> Self {
        Self { acc_only: true, acquire_slot, last, slot: Bits::from_u64(slot as u64), ..Self::default() }
    }

    /// Divide-only pass command.
    pub fn div(slot: usize, last: bool) -> Self {
        Self { div_only: true, last, slot: Bits::from_u64(slot as u64), ..Self::default() }
    }
}

/// Cast configuration forwarded to the datapath.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct CastCfg {
    /// Cast the input stream.
    pub cast_in: bool,
    /// Integer width of the input.
    pub in_width: u8,
    /// The input is signed.
    pub in_signed: bool,
    /// Cast the output stream.
    pub cast_out: bool,
    /// Integer width of the output.
    pub out_width: u8,
    /// The output is signed.
    pub out_signed: bool,
}

impl CastCfg {
    /// Decodes the cast control word under the command's cast enables.
    pub fn decode(word: u32, cmd: &Command) -> Self {
        Self {
            cast_in: cmd.cast_in,
            in_width: field(word, cast_ctrl::IN_WIDTH, 8) as u8,
            in_signed: bit(word, cast_ctrl::IN_SIGNED),
            cast_out: cmd.cast_out,
            out_width: field(word, cast_ctrl::OUT_WIDTH, 8) as u8,
            out_signed: bit(word, cast_ctrl::OUT_SIGNED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_word() {
        let cmd = Command::decode(0b101_0000_1101);
        assert!(cmd.acc_only && cmd.last && cmd.acquire_slot);
        assert!(!cmd.div_only && !cmd.no_op && !cmd.set_cache_addr);
        assert_eq!(cmd.slot_id(), 5);
        assert_eq!(cmd.encode(), 0b101_0000_1101);
        assert_eq!(Command::acc(5, true, true), cmd);
        assert!(Command::div(0, false).is_slot_pass());
        assert!(!Command::default().is_slot_pass());
    }

    #[test]
    fn cast_ctrl_word() {
        let cmd = Command { cast_in: true, ..Command::default() };
        let cast = CastCfg::decode(0x0108_0110, &cmd);
        assert_eq!(cast, CastCfg { cast_in: true, in_width: 16, in_signed: true, cast_out: false, out_width: 8, out_signed: true });
    }
}
