//! Stream fan-in with synchronized commit.

use super::*;

/// Ingress of the merger: one stream per lane.
pub type MergerI<const N: usize, const LW: usize, const LSW: usize> = [VrChannel<Strobed<LW, LSW>>; N];

/// Egress of the merger: the wide stream.
pub type MergerO<const DW: usize, const SW: usize> = VrChannel<Strobed<DW, SW>>;

/// Transition function of the merger.
pub type MergerF<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize> =
    fn([Valid<Strobed<LW, LSW>>; N], Ready, ()) -> (Valid<Strobed<DW, SW>>, [Ready; N], ());

/// Merger of `N` lanes of `LW` bits into a `DW`-bit stream. It is purely combinational.
pub type Merger<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize> =
    Fsm<MergerI<N, LW, LSW>, MergerO<DW, SW>, (), MergerF<N, DW, SW, LW, LSW>>;

fn merge_fsm<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize, const EW: usize>(
    ingress_fwd: [Valid<Strobed<LW, LSW>>; N], egress_bwd: Ready, s: (),
) -> (Valid<Strobed<DW, SW>>, [Ready; N], ()) {
    // Never presents partial data: all lanes commit in the same cycle, or none does.
    let all_valid = ingress_fwd.iter().all(|lane| lane.valid);
    let ingress_bwd = [Ready::new(egress_bwd.ready && all_valid); N];

    let lanes = ingress_fwd.map(|lane| lane.inner);
    let egress_fwd = Valid::new(all_valid, lane_merge::<N, DW, SW, LW, LSW>(&lanes, EW));

    (egress_fwd, ingress_bwd, s)
}

/// Creates a merger with `EW`-bit elements.
///
/// # Panics
///
/// Panics if the widths are inconsistent (see [`check_lane_params`]).
pub fn merger<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize, const EW: usize>(
) -> Merger<N, DW, SW, LW, LSW> {
    check_lane_params(N, DW, SW, LW, LSW, EW);
    Merger::new("merger", merge_fsm::<N, DW, SW, LW, LSW, EW>, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    type Narrow = Strobed<64, 8>;

    fn lane(seed: u8) -> Narrow { Narrow::from_bytes(&[seed; 8]) }

    #[test]
    fn atomic_commit() {
        let dut = merger::<4, 256, 32, 64, 8, 16>();

        let partial = [Valid::valid(lane(0)), Valid::valid(lane(1)), Valid::invalid(), Valid::valid(lane(3))];
        let (egress_fwd, ingress_bwd) = dut.comb(&partial, &Ready::new(true));
        assert!(!egress_fwd.valid);
        assert!(ingress_bwd.iter().all(|bwd| !bwd.ready));

        let full = [0, 1, 2, 3].map(|seed| Valid::valid(lane(seed)));
        let (egress_fwd, ingress_bwd) = dut.comb(&full, &Ready::new(false));
        assert!(egress_fwd.valid);
        assert!(ingress_bwd.iter().all(|bwd| !bwd.ready));

        let (egress_fwd, ingress_bwd) = dut.comb(&full, &Ready::new(true));
        assert!(ingress_bwd.iter().all(|bwd| bwd.ready));
        // Element 4k + i comes from lane i.
        assert_eq!(&egress_fwd.inner.bytes()[..8], &[0, 0, 1, 1, 2, 2, 3, 3]);
        assert!(egress_fwd.inner.strb.all());
    }
}
