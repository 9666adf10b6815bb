//! Lane distribution fabric.
//!
//! A wide word of `N * LW` bits is partitioned into `N` interleaved lanes of `LW` bits. Lane `i` owns
//! the element positions `i, i + N, i + 2N, ...` of the wide word: element `k` of lane `i` is element
//! `k * N + i` of the wide word. Strobe bits follow the same mapping.

mod merge;
mod split;

pub use merge::*;
pub use split::*;

use crate::*;

/// Checks the parameters of a lane fabric with `n` lanes of `lw`-bit width and `ew`-bit elements.
///
/// # Panics
///
/// Panics if the widths are inconsistent.
pub fn check_lane_params(n: usize, dw: usize, sw: usize, lw: usize, lsw: usize, ew: usize) {
    assert!(n > 0, "a lane fabric needs at least one lane");
    assert!(ew > 0 && ew % 8 == 0, "element width ({}) should be a nonzero multiple of 8", ew);
    assert_eq!(dw, n * lw, "wide width ({}) should be {} lanes of {} bits", dw, n, lw);
    assert_eq!(lw % ew, 0, "lane width ({}) should be a multiple of the element width ({})", lw, ew);
    assert_eq!(sw * 8, dw, "wide strobe width ({}) should be {} / 8", sw, dw);
    assert_eq!(lsw * 8, lw, "lane strobe width ({}) should be {} / 8", lsw, lw);
}

/// Returns the slice of lane `lane` of a wide word.
pub fn lane_slice<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize>(
    wide: &Strobed<DW, SW>, lane: usize, ew: usize,
) -> Strobed<LW, LSW> {
    let mut slice = Strobed::default();
    for k in 0..LW / ew {
        let (data, strb) = wide.elem(k * N + lane, ew);
        slice.set_elem(k, ew, &data, &strb);
    }
    slice
}

/// Returns the wide word reassembled from all lane slices. Inverse of [`lane_slice`].
pub fn lane_merge<const N: usize, const DW: usize, const SW: usize, const LW: usize, const LSW: usize>(
    lanes: &[Strobed<LW, LSW>; N], ew: usize,
) -> Strobed<DW, SW> {
    let mut wide = Strobed::default();
    for (lane, slice) in lanes.iter().enumerate() {
        for k in 0..LW / ew {
            let (data, strb) = slice.elem(k, ew);
            wide.set_elem(k * N + lane, ew, &data, &strb);
        }
    }
    wide
}
