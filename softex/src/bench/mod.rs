//! Behavioral bench.
//!
//! Composes the controller, the splitter, the lane datapaths and the merger with stand-ins of the
//! streamers and the slot store, and runs them cycle by cycle:
//!
//! 1. every stand-in presents the outputs of its current state;
//! 2. the controller, the splitter and the merger are stepped;
//! 3. every stand-in commits the transfers of the cycle.

mod lane;
mod slot_store;
mod streamer;

use std::array;
use std::fmt;
use std::io::Write;

use itertools::Itertools;
use softflow::*;
use softflow_std::lane::{merger, splitter, Merger, SplitState, Splitter};
use softflow_std::*;

use self::lane::LaneModel;
pub use self::slot_store::SlotStats;
use self::slot_store::SlotStore;
use self::streamer::{InStreamer, OutStreamer};
pub use self::streamer::pattern;
use crate::config::{BenchConfig, ConfigError};
use crate::constants::fabric::*;
use crate::constants::slot::NUM_SLOTS;
use crate::controller::{controller, Controller};
use crate::types::*;
use crate::Error;

/// Wide word.
pub type Wide = Strobed<DATA_WIDTH, STRB_WIDTH>;

/// Lane word.
pub type Narrow = Strobed<LANE_WIDTH, LANE_STRB_WIDTH>;

/// Splitter of the Softex fabric.
pub type SoftexSplitter = Splitter<LANES, DATA_WIDTH, STRB_WIDTH, LANE_WIDTH, LANE_STRB_WIDTH>;

/// Merger of the Softex fabric.
pub type SoftexMerger = Merger<LANES, DATA_WIDTH, STRB_WIDTH, LANE_WIDTH, LANE_STRB_WIDTH>;

/// Base address of the slot cache used by [`Bench::softmax`].
pub const CACHE_BASE: u32 = 0x8000_0000;
/// Source base address used by [`Bench::softmax`].
pub const IN_BASE: u32 = 0x1000_0000;
/// Destination base address used by [`Bench::softmax`].
pub const OUT_BASE: u32 = 0x2000_0000;

/// Waveform probes.
#[derive(Debug)]
struct Trace {
    vcd: Vcdgen<Box<dyn Write>>,
    req: Probe,
    state: Probe,
    busy: Probe,
    evt: Probe,
    split_in: (Probe, Probe),
    split_pending: Probe,
    merge_out: (Probe, Probe),
}

impl Trace {
    fn new(writer: Box<dyn Write>) -> Result<Self, VcdError> {
        let mut vcd = Vcdgen::new(writer, "1ns");
        // The memory request is registered first.
        let req = vcd.probe::<bool>("softex", "req")?;
        let state = vcd.probe::<State>("softex", "state")?;
        let busy = vcd.probe::<bool>("softex", "busy")?;
        let evt = vcd.probe::<bool>("softex", "evt")?;
        let split_in = vcd.probe_interface::<VrChannel<Wide>>("splitter", "in")?;
        let split_pending = vcd.probe::<bool>("splitter", "pending")?;
        let merge_out = vcd.probe_interface::<VrChannel<Wide>>("merger", "out")?;
        Ok(Self { vcd, req, state, busy, evt, split_in, split_pending, merge_out })
    }
}

/// Result of one command.
#[derive(Debug, Clone)]
pub struct PassStats {
    pub cmd: Command,
    /// Cycles from the start pulse to the done event, inclusive.
    pub cycles: u64,
    /// Words written by the outbound streamer.
    pub output: Vec<Wide>,
}

/// Short description of a command.
pub fn describe(cmd: &Command) -> String {
    let kind = if cmd.no_op {
        "no_op"
    } else if cmd.set_cache_addr {
        "set_cache_addr"
    } else if cmd.acc_only {
        "acc"
    } else if cmd.div_only {
        "div"
    } else {
        "full"
    };
    let flags = [(cmd.acquire_slot, "acquire"), (cmd.last, "last")].into_iter().filter(|(flag, _)| *flag).map(|(_, name)| name);
    std::iter::once(kind).chain(flags).join("+")
}

/// Result of a softmax sequence.
#[derive(Debug, Clone)]
pub struct SoftmaxStats {
    pub passes: Vec<PassStats>,
    pub slots: SlotStats,
}

impl SoftmaxStats {
    /// Total cycles.
    pub fn cycles(&self) -> u64 { self.passes.iter().map(|pass| pass.cycles).sum() }
}

impl fmt::Display for SoftmaxStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pass) in self.passes.iter().enumerate() {
            writeln!(f, "pass {:>2}  {:<20} {:>8} cycles  {:>4} words out", i, describe(&pass.cmd), pass.cycles, pass.output.len())?;
        }
        writeln!(f, "slot traffic: {}", self.slots)?;
        write!(f, "total: {} cycles", self.cycles())
    }
}

/// Behavioral bench.
#[derive(Debug)]
pub struct Bench {
    config: BenchConfig,
    cycle: u64,
    regs: Regs,
    controller: Controller<LANES>,
    splitter: SoftexSplitter,
    merger: SoftexMerger,
    lanes: [LaneModel; LANES],
    in_streamer: InStreamer,
    out_streamer: OutStreamer,
    slots: SlotStore,
    trace: Option<Trace>,
}

impl Bench {
    /// Creates a bench.
    pub fn new(config: BenchConfig) -> Self {
        let lanes = array::from_fn(|index| {
            LaneModel::new(index, config.lane_latency, config.acc_delay, config.inv_delay, config.lane_stall_period)
        });
        Self {
            cycle: 0,
            regs: Regs::default(),
            controller: controller(),
            splitter: splitter::<LANES, DATA_WIDTH, STRB_WIDTH, LANE_WIDTH, LANE_STRB_WIDTH, ELEM_WIDTH>(),
            merger: merger::<LANES, DATA_WIDTH, STRB_WIDTH, LANE_WIDTH, LANE_STRB_WIDTH, ELEM_WIDTH>(),
            lanes,
            in_streamer: InStreamer::default(),
            out_streamer: OutStreamer::new(config.out_stall_period),
            slots: SlotStore::default(),
            trace: None,
            config,
        }
    }

    /// Creates a bench that writes a waveform trace to `writer`.
    pub fn with_trace(config: BenchConfig, writer: Box<dyn Write>) -> Result<Self, Error> {
        let mut bench = Self::new(config);
        bench.trace = Some(Trace::new(writer)?);
        Ok(bench)
    }

    /// Current cycle.
    pub fn cycle(&self) -> u64 { self.cycle }

    /// Current controller state.
    pub fn state(&self) -> State { self.controller.state().state }

    /// Current splitter state.
    pub fn splitter_state(&self) -> &SplitState<LANES, DATA_WIDTH, STRB_WIDTH> { self.splitter.state() }

    /// Slot traffic so far.
    pub fn slot_stats(&self) -> SlotStats { self.slots.stats() }

    /// Advances one cycle. Returns the controller outputs of the cycle.
    pub fn step(&mut self, start: bool, clear: bool) -> Result<CtrlOutput<LANES>, Error> {
        // Outputs of the current state.
        let split_state = self.splitter.state().clone();
        let ctrl_state = self.controller.state().state;
        let lanes: [LaneFlags; LANES] = array::from_fn(|lane| {
            let flags = self.lanes[lane].flags();
            // A slice still held by the splitter is in flight too.
            LaneFlags { busy: flags.busy || (split_state.pending && !split_state.served.get(lane)), ..flags }
        });
        let ctrl_in = CtrlInput {
            start,
            clear,
            regs: self.regs,
            in_done: self.in_streamer.done(),
            out_done: self.out_streamer.done(),
            lanes,
            slot: self.slots.readback(Command::decode(self.regs.command).slot_id()),
        };
        let req = self.in_streamer.req();
        let in_fwd = self.in_streamer.fwd();
        let split_bwd: [Ready; LANES] = array::from_fn(|lane| self.lanes[lane].bwd(self.cycle));
        let merge_fwd: [Valid<Narrow>; LANES] = array::from_fn(|lane| self.lanes[lane].fwd());
        let out_bwd = self.out_streamer.bwd(self.cycle);

        // Modules.
        let (ctrl_out, ()) = self.controller.step(&ctrl_in, &());
        let (split_fwd, (in_bwd, ())) = self.splitter.step(&(in_fwd.clone(), clear), &split_bwd);
        let (out_fwd, merge_bwd) = self.merger.step(&merge_fwd, &out_bwd);

        if let Some(trace) = &mut self.trace {
            trace.vcd.sample(&trace.req, &req)?;
            trace.vcd.sample(&trace.state, &ctrl_state)?;
            trace.vcd.sample(&trace.busy, &ctrl_out.busy)?;
            trace.vcd.sample(&trace.evt, &ctrl_out.evt)?;
            trace.vcd.sample(&trace.split_in.0, &in_fwd)?;
            trace.vcd.sample(&trace.split_in.1, &in_bwd)?;
            trace.vcd.sample(&trace.split_pending, &split_state.pending)?;
            trace.vcd.sample(&trace.merge_out.0, &out_fwd)?;
            trace.vcd.sample(&trace.merge_out.1, &out_bwd)?;
            trace.vcd.tick()?;
        }

        // Transfers of the cycle.
        self.in_streamer.update(&ctrl_out.in_stream, in_fwd.transfer(&in_bwd));
        for (lane, model) in self.lanes.iter_mut().enumerate() {
            let ingress = split_fwd[lane].transfer(&split_bwd[lane]).then(|| split_fwd[lane].inner.clone());
            model.update(ingress, merge_fwd[lane].transfer(&merge_bwd[lane]), &ctrl_out.lanes[lane]);
        }
        self.out_streamer.update(&ctrl_out.out_stream, out_fwd.transfer(&out_bwd).then(|| out_fwd.inner.clone()));
        self.slots.apply(&ctrl_out.slot_req, &ctrl_out.slot_upd);

        if ctrl_out.evt {
            log::debug!("cycle {}: done", self.cycle);
        }
        self.cycle += 1;
        Ok(ctrl_out)
    }

    /// Clears the controller and the splitter.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.step(false, true)?;
        Ok(())
    }

    /// Writes the registers of `cmd`. The command starts on the next start pulse.
    pub fn program(&mut self, cmd: Command, in_addr: u32, out_addr: u32) {
        self.regs = Regs { tot_len: self.config.tot_len, in_addr, out_addr, command: cmd.encode(), ..self.regs };
    }

    /// Runs `cmd` until its done event.
    pub fn run(&mut self, cmd: Command, in_addr: u32, out_addr: u32) -> Result<PassStats, Error> {
        self.program(cmd, in_addr, out_addr);

        let begin = self.cycle;
        let mut start = true;
        while !self.step(start, false)?.evt {
            start = false;
            if self.cycle - begin >= self.config.cycle_limit {
                return Err(Error::CycleLimit { limit: self.config.cycle_limit, state: format!("{:?}", self.state()) });
            }
        }

        log::info!("{} finished in {} cycles", describe(&cmd), self.cycle - begin);
        Ok(PassStats { cmd, cycles: self.cycle - begin, output: self.out_streamer.take_words() })
    }

    /// Runs a softmax over `passes` chunks of `tot_len` bytes, keeping its state in `slot`.
    ///
    /// The chunks are accumulated first (the first pass acquires the slot, the last one inverts the
    /// denominator), then normalized (the last pass frees the slot).
    pub fn softmax(&mut self, passes: usize, slot: usize) -> Result<SoftmaxStats, Error> {
        if passes == 0 {
            return Err(ConfigError::Invalid("a softmax needs at least one pass".to_string()).into());
        }
        if slot >= NUM_SLOTS {
            return Err(ConfigError::Invalid(format!("slot {slot} out of range (0..{NUM_SLOTS})")).into());
        }
        let chunk = self.config.tot_len;
        let addr = |base: u32, pass: usize| base.wrapping_add(chunk.wrapping_mul(pass as u32));

        let mut stats = vec![self.run(Command { set_cache_addr: true, ..Command::default() }, CACHE_BASE, 0)?];
        for pass in 0..passes {
            stats.push(self.run(Command::acc(slot, pass == 0, pass + 1 == passes), addr(IN_BASE, pass), 0)?);
        }
        for pass in 0..passes {
            stats.push(self.run(Command::div(slot, pass + 1 == passes), addr(IN_BASE, pass), addr(OUT_BASE, pass))?);
        }

        Ok(SoftmaxStats { passes: stats, slots: self.slots.stats() })
    }

    /// Flushes the waveform trace.
    pub fn finish(self) -> Result<(), Error> {
        if let Some(trace) = self.trace {
            trace.vcd.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names() {
        assert_eq!(describe(&Command::acc(0, true, true)), "acc+acquire+last");
        assert_eq!(describe(&Command::div(3, false)), "div");
        assert_eq!(describe(&Command { no_op: true, ..Command::default() }), "no_op");
        assert_eq!(describe(&Command { acquire_slot: true, ..Command::default() }), "full+acquire");
    }
}
