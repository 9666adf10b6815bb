//! Stream fan-out with partial acceptance.
//!
//! The splitter latches one wide word at a time and offers each lane its slice. Lanes accept
//! independently; the next word is admitted only after every lane has committed its slice exactly once.

use std::array;

use softflow_macro::Signal;

use super::*;

/// State of the splitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Signal)]
pub struct SplitState<const N: usize, const DW: usize, const SW: usize> {
    /// Is a latched word waiting to be served?
    pub pending: bool,

    /// Lanes that already committed their slice of the latched word.
    pub served: DoneBitmap<N>,

    /// Latched word.
    pub buf: Strobed<DW, SW>,
}

/// Ingress of the splitter: the wide stream and the synchronous clear.
pub type SplitterI<const DW: usize, const SW: usize> = (VrChannel<Strobed<DW, SW>>, UniChannel<bool>);

/// Egress of the splitter: one stream per lane.
pub type SplitterO<const N: usize, const LW: usize, const LSW: usize> = [VrChannel<Strobed<LW, LSW>>; N];

/// Transition function of the splitter.
pub type SplitterF<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize> =
    fn(
        (Valid<Strobed<DW, SW>>, bool),
        [Ready; N],
        SplitState<N, DW, SW>,
    ) -> ([Valid<Strobed<LW, LSW>>; N], (Ready, ()), SplitState<N, DW, SW>);

/// Splitter of a `DW`-bit stream into `N` lanes of `LW` bits.
pub type Splitter<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize> =
    Fsm<SplitterI<DW, SW>, SplitterO<N, LW, LSW>, SplitState<N, DW, SW>, SplitterF<N, DW, SW, LW, LSW>>;

fn split_fsm<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize, const EW: usize>(
    ingress_fwd: (Valid<Strobed<DW, SW>>, bool), egress_bwd: [Ready; N], s: SplitState<N, DW, SW>,
) -> ([Valid<Strobed<LW, LSW>>; N], (Ready, ()), SplitState<N, DW, SW>) {
    let (ingress_fwd, clear) = ingress_fwd;

    // Upstream readiness never depends on the lanes. Nothing is accepted in a clear cycle.
    let ingress_ready = Ready::new(!s.pending && !clear);
    let egress_fwd: [Valid<Strobed<LW, LSW>>; N] = array::from_fn(|lane| {
        Valid::new(s.pending && !s.served.get(lane), lane_slice::<N, DW, SW, LW, LSW>(&s.buf, lane, EW))
    });
    let egress_transfer = egress_fwd.iter().zip(egress_bwd.iter()).map(|(fwd, bwd)| fwd.transfer(bwd));

    let s_next = if clear {
        if s.pending {
            log::trace!("splitter: clear drops a pending word");
        }
        // Latched data is retained, but invisible while not pending.
        SplitState { pending: false, served: s.served.clear(), buf: s.buf }
    } else if !s.pending {
        if ingress_fwd.valid {
            SplitState { pending: true, served: DoneBitmap::new(), buf: ingress_fwd.inner }
        } else {
            s
        }
    } else {
        let served = s.served.merge(egress_transfer);
        if served.all() {
            SplitState { pending: false, served: served.clear(), buf: s.buf }
        } else {
            SplitState { served, ..s }
        }
    };

    (egress_fwd, (ingress_ready, ()), s_next)
}

/// Creates a splitter with `EW`-bit elements.
///
/// # Panics
///
/// Panics if the widths are inconsistent (see [`check_lane_params`]).
pub fn splitter<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize, const EW: usize>(
) -> Splitter<N, DW, SW, LW, LSW> {
    check_lane_params(N, DW, SW, LW, LSW, EW);
    Splitter::new("splitter", split_fsm::<N, DW, SW, LW, LSW, EW>, SplitState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    type Wide = Strobed<256, 32>;
    type Narrow = Strobed<64, 8>;
    type Dut = Splitter<4, 256, 32, 64, 8>;

    fn dut() -> Dut { splitter::<4, 256, 32, 64, 8, 16>() }

    fn word(seed: u8) -> Wide { Wide::from_bytes(&(0..32).map(|i| seed.wrapping_mul(32).wrapping_add(i)).collect::<Vec<_>>()) }

    fn elem(payload: &Narrow, k: usize) -> u64 { u64::from(payload.bytes()[2 * k]) | (u64::from(payload.bytes()[2 * k + 1]) << 8) }

    #[test]
    fn lane_zero_always_ready() {
        let mut dut = dut();
        let input = word(0);

        // Cycle 0: the word is latched.
        let (_, (ready, ())) = dut.step(&(Valid::valid(input.clone()), false), &[Ready::new(true); 4]);
        assert!(ready.ready);
        assert!(dut.state().pending);

        for cycle in 1..=5 {
            let lanes_ready = cycle == 5;
            let egress_bwd = [Ready::new(true), Ready::new(lanes_ready), Ready::new(lanes_ready), Ready::new(lanes_ready)];
            let (egress_fwd, (ready, ())) = dut.step(&(Valid::valid(word(1)), false), &egress_bwd);

            assert!(!ready.ready, "upstream must stay closed on cycle {}", cycle);
            assert_eq!(egress_fwd[0].valid, cycle == 1, "lane 0 commits on the first pending cycle");
            assert!(egress_fwd[1..].iter().all(|fwd| fwd.valid));

            if cycle == 1 {
                // Lane 0 owns elements 0, 4, 8 and 12.
                let lane0 = &egress_fwd[0].inner;
                assert_eq!((0..4).map(|k| elem(lane0, k)).collect::<Vec<_>>(), vec![0x0100, 0x0908, 0x1110, 0x1918]);
                assert!(lane0.strb.all());
            }
        }

        // Cycle 6: upstream re-opens.
        let (egress_fwd, (ready, ())) = dut.step(&(Valid::invalid(), false), &[Ready::new(true); 4]);
        assert!(ready.ready);
        assert!(egress_fwd.iter().all(|fwd| !fwd.valid));
        assert_eq!(dut.state().served, DoneBitmap::new());
    }

    #[test]
    fn each_lane_served_once() {
        let mut dut = dut();
        let mut received = [0_usize; 4];
        let mut admitted = 0;

        for cycle in 0..64_usize {
            let egress_bwd: [Ready; 4] = array::from_fn(|lane| Ready::new((cycle * 7 + lane * 3) % (lane + 2) == 0));
            let (egress_fwd, (ready, ())) = dut.step(&(Valid::valid(word(cycle as u8)), false), &egress_bwd);

            if ready.ready {
                // Every lane observed the previous word exactly once.
                assert!(received.iter().all(|count| *count == admitted));
                admitted += 1;
            }
            for (lane, (fwd, bwd)) in egress_fwd.iter().zip(egress_bwd.iter()).enumerate() {
                if fwd.transfer(bwd) {
                    received[lane] += 1;
                    assert!(received[lane] <= admitted);
                }
            }
        }
        assert!(admitted > 1);
    }

    #[test]
    fn never_ready_lane_stalls() {
        let mut dut = dut();
        let egress_bwd = [Ready::new(true), Ready::new(true), Ready::new(false), Ready::new(true)];

        let _ = dut.step(&(Valid::valid(word(3)), false), &egress_bwd);
        for _ in 0..16 {
            let (egress_fwd, (ready, ())) = dut.step(&(Valid::valid(word(4)), false), &egress_bwd);
            assert!(!ready.ready);
            assert!(egress_fwd[2].valid);
        }
        assert_eq!(dut.state().buf, word(3));
    }

    #[test]
    fn clear_drops_pending_word() {
        let mut dut = dut();
        let _ = dut.step(&(Valid::valid(word(5)), false), &[Ready::new(false); 4]);
        let _ = dut.step(&(Valid::invalid(), false), &[Ready::new(true), Ready::new(false), Ready::new(false), Ready::new(false)]);
        assert!(dut.state().served.get(0));

        let _ = dut.step(&(Valid::invalid(), true), &[Ready::new(false); 4]);
        assert!(!dut.state().pending);
        assert!(!dut.state().served.any());
        assert_eq!(dut.state().buf, word(5));

        let (egress_fwd, (ready, ())) = dut.comb(&(Valid::invalid(), false), &[Ready::new(true); 4]);
        assert!(ready.ready);
        assert!(egress_fwd.iter().all(|fwd| !fwd.valid));

        dut.reset();
        assert_eq!(*dut.state(), SplitState::default());
    }

    #[test]
    fn clear_refuses_offered_word() {
        let mut dut = dut();
        let (_, (ready, ())) = dut.step(&(Valid::valid(word(9)), true), &[Ready::new(true); 4]);
        assert!(!ready.ready);
        assert!(!dut.state().pending);

        // The same word is accepted once the clear is released.
        let (_, (ready, ())) = dut.step(&(Valid::valid(word(9)), false), &[Ready::new(true); 4]);
        assert!(ready.ready);
        assert!(dut.state().pending);
        assert_eq!(dut.state().buf, word(9));
    }
}
