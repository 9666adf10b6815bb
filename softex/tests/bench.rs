//! Controller, lane fabric and lane stand-ins composed on the behavioral bench.

use softex::bench::{pattern, Bench, IN_BASE, OUT_BASE};
use softex::config::BenchConfig;
use softex::types::{Command, SlotUpdOp, State};
use softex::Error;

fn stalling() -> BenchConfig {
    BenchConfig { lane_stall_period: 3, out_stall_period: 5, ..BenchConfig::default() }
}

fn expected(addr: u32, config: &BenchConfig) -> Vec<softex::bench::Wide> {
    (0..config.tot_len / 32).map(|index| pattern(addr, index)).collect()
}

#[test]
fn full_operation_returns_to_idle() {
    let config = BenchConfig::default();
    let mut bench = Bench::new(config.clone());
    let cmd = Command { acquire_slot: true, ..Command::default() };
    let stats = bench.run(cmd, IN_BASE, OUT_BASE).unwrap();

    assert_eq!(bench.state(), State::Idle);
    assert_eq!(stats.output, expected(IN_BASE, &config));
    // Not a slot pass.
    assert_eq!(bench.slot_stats().allocs, 0);

    let out = bench.step(false, false).unwrap();
    assert!(!out.busy && !out.evt);
}

#[test]
fn full_operation_on_short_streams() {
    for tot_len in [32, 64, 128, 256] {
        for config in [BenchConfig { tot_len, ..BenchConfig::default() }, BenchConfig { tot_len, ..stalling() }] {
            let mut bench = Bench::new(BenchConfig { cycle_limit: 2000, ..config.clone() });
            let cmd = Command { acquire_slot: true, ..Command::default() };
            let stats = bench.run(cmd, IN_BASE, OUT_BASE).unwrap();
            assert_eq!(stats.output, expected(IN_BASE, &config), "tot_len = {tot_len}");
            assert_eq!(bench.state(), State::Idle);
        }
    }
}

#[test]
fn divide_pass_keeps_word_order() {
    for config in [BenchConfig::default(), stalling()] {
        let mut bench = Bench::new(config.clone());
        let _ = bench.run(Command::acc(2, true, true), IN_BASE, 0).unwrap();
        let stats = bench.run(Command::div(2, true), IN_BASE, OUT_BASE).unwrap();
        assert_eq!(stats.output, expected(IN_BASE, &config));
    }
}

#[test]
fn softmax_slot_lifecycle() {
    let mut bench = Bench::new(stalling());
    let stats = bench.softmax(3, 5).unwrap();

    // set_cache_addr, then three accumulate and three divide passes.
    assert_eq!(stats.passes.len(), 7);
    assert!(stats.passes[1..4].iter().all(|pass| pass.output.is_empty()));
    assert!(stats.passes[4..].iter().all(|pass| pass.output.len() == 32));

    assert_eq!(stats.slots.allocs, 1);
    assert_eq!(stats.slots.loads, 5);
    assert_eq!(stats.slots.updates, 3);
    assert_eq!(stats.slots.frees, 1);
    assert_eq!(stats.cycles(), bench.cycle());
}

#[test]
fn slot_traffic_per_pass() {
    let mut bench = Bench::new(BenchConfig::default());

    for (cmd, out_addr) in [(Command::acc(0, true, true), 0), (Command::div(0, true), OUT_BASE)] {
        bench.program(cmd, IN_BASE, out_addr);
        let mut start = true;
        let mut reqs = 0;
        let mut upds = Vec::new();
        loop {
            let out = bench.step(start, false).unwrap();
            start = false;
            reqs += usize::from(out.slot_req.valid);
            if out.slot_upd.valid {
                upds.push(out.slot_upd.inner.op);
            }
            if out.evt {
                break;
            }
        }

        assert_eq!(reqs, 1);
        let expected = if cmd.div_only { SlotUpdOp::Free } else { SlotUpdOp::Update };
        assert_eq!(upds, vec![expected]);
    }

    let slots = bench.slot_stats();
    assert_eq!((slots.allocs, slots.loads, slots.updates, slots.frees), (1, 1, 1, 1));
}

#[test]
fn cycle_limit() {
    let mut bench = Bench::new(BenchConfig { cycle_limit: 10, ..BenchConfig::default() });
    let err = bench.run(Command::default(), IN_BASE, OUT_BASE).unwrap_err();
    assert!(matches!(err, Error::CycleLimit { limit: 10, ref state } if state == "Accumulation"));
}

#[test]
fn clear_aborts_a_pass() {
    let mut bench = Bench::new(BenchConfig::default());
    bench.program(Command::default(), IN_BASE, OUT_BASE);
    let _ = bench.step(true, false).unwrap();
    for _ in 0..5 {
        let _ = bench.step(false, false).unwrap();
    }
    assert_eq!(bench.state(), State::Accumulation);

    bench.clear().unwrap();
    assert_eq!(bench.state(), State::Idle);
    assert!(!bench.splitter_state().pending);
}
