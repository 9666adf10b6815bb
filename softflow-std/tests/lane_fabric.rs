//! Splitter, per-lane identity pipelines and merger composed into a round trip.

use std::array;
use std::collections::VecDeque;

use softflow::Module;
use softflow_std::lane::{merger, splitter};
use softflow_std::{Ready, Strobed, Valid};

const LANES: usize = 4;
const DEPTH: usize = 2;

type Wide = Strobed<256, 32>;
type Narrow = Strobed<64, 8>;

fn word(seed: usize) -> Wide {
    let mut word = Wide::from_bytes(&(0..32).map(|i| (seed * 31 + i * 7) as u8).collect::<Vec<_>>());
    // Sparse strobes must survive the round trip too.
    if seed % 3 == 0 {
        word.strb.set(seed % 32, false);
    }
    word
}

fn round_trip(lane_stall: impl Fn(usize, usize) -> bool, downstream_ready: impl Fn(usize) -> bool) {
    let mut splitter = splitter::<LANES, 256, 32, 64, 8, 16>();
    let merger = merger::<LANES, 256, 32, 64, 8, 16>();

    let input = (0..20).map(word).collect::<Vec<_>>();
    let mut next = 0;
    let mut output = Vec::new();
    let mut queues: [VecDeque<Narrow>; LANES] = array::from_fn(|_| VecDeque::new());

    for cycle in 0..2000 {
        let ingress = match input.get(next) {
            Some(word) => Valid::valid(word.clone()),
            None => Valid::invalid(),
        };
        let split_bwd: [Ready; LANES] =
            array::from_fn(|lane| Ready::new(queues[lane].len() < DEPTH && !lane_stall(cycle, lane)));
        let (split_fwd, (ingress_bwd, ())) = splitter.step(&(ingress.clone(), false), &split_bwd);

        let merge_fwd: [Valid<Narrow>; LANES] = array::from_fn(|lane| match queues[lane].front() {
            Some(slice) => Valid::valid(slice.clone()),
            None => Valid::invalid(),
        });
        let egress_bwd = Ready::new(downstream_ready(cycle));
        let (egress_fwd, merge_bwd) = merger.comb(&merge_fwd, &egress_bwd);

        // Merge atomicity.
        let commits = merge_fwd.iter().zip(merge_bwd.iter()).filter(|(fwd, bwd)| fwd.transfer(bwd)).count();
        assert!(commits == 0 || commits == LANES);
        assert_eq!(egress_fwd.transfer(&egress_bwd), commits == LANES);

        if egress_fwd.transfer(&egress_bwd) {
            output.push(egress_fwd.inner);
            queues.iter_mut().for_each(|queue| {
                let _ = queue.pop_front();
            });
        }
        for (lane, (fwd, bwd)) in split_fwd.into_iter().zip(split_bwd.iter()).enumerate() {
            if fwd.transfer(bwd) {
                queues[lane].push_back(fwd.inner);
            }
        }
        if ingress.transfer(&ingress_bwd) {
            next += 1;
        }
        if output.len() == input.len() {
            break;
        }
    }

    assert_eq!(output, input);
}

#[test]
fn round_trip_full_service() { round_trip(|_, _| false, |_| true); }

#[test]
fn round_trip_uneven_lanes() { round_trip(|cycle, lane| (cycle + lane) % (lane + 2) != 0, |cycle| cycle % 3 != 1); }

#[test]
fn round_trip_slow_downstream() { round_trip(|cycle, lane| lane == 1 && cycle % 2 == 0, |cycle| cycle % 5 == 0); }
