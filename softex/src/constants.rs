//! Constants for Softex modules.

use static_assertions::*;

// Constants for the lane fabric.
pub mod fabric {
    pub const LANES: usize = 4;
    pub const DATA_WIDTH: usize = 256;
    pub const STRB_WIDTH: usize = DATA_WIDTH / 8;
    pub const LANE_WIDTH: usize = DATA_WIDTH / LANES;
    pub const LANE_STRB_WIDTH: usize = LANE_WIDTH / 8;
    pub const ELEM_WIDTH: usize = 16;
    pub const ELEMS_PER_LANE: usize = LANE_WIDTH / ELEM_WIDTH;
}

// Constants for the state slots.
pub mod slot {
    pub const NUM_SLOTS: usize = 8;
    pub const SLOT_ID_WIDTH: usize = softflow::clog2(NUM_SLOTS);
}

// Bit positions of the command register.
pub mod command {
    pub const ACC_ONLY: usize = 0;
    pub const DIV_ONLY: usize = 1;
    pub const LAST: usize = 2;
    pub const ACQUIRE_SLOT: usize = 3;
    pub const SET_CACHE_ADDR: usize = 4;
    pub const NO_OP: usize = 5;
    pub const CAST_IN: usize = 6;
    pub const CAST_OUT: usize = 7;
    pub const SLOT_ID: usize = 8;
}

// Bit positions of the cast control register.
pub mod cast_ctrl {
    pub const IN_WIDTH: usize = 0;
    pub const IN_SIGNED: usize = 8;
    pub const OUT_WIDTH: usize = 16;
    pub const OUT_SIGNED: usize = 24;
}

// Constants for the behavioral bench.
pub mod bench {
    /// Capacity of a lane pipeline.
    pub const LANE_DEPTH: usize = 8;
    /// Bytes per wide word.
    pub const WORD_BYTES: usize = super::fabric::DATA_WIDTH / 8;
}

const_assert!(fabric::DATA_WIDTH % fabric::LANES == 0);
const_assert!(fabric::ELEM_WIDTH % 8 == 0);
const_assert!(fabric::LANE_WIDTH % fabric::ELEM_WIDTH == 0);
const_assert!(fabric::STRB_WIDTH * 8 == fabric::DATA_WIDTH);
const_assert!(slot::NUM_SLOTS.is_power_of_two());
const_assert!(command::SLOT_ID + slot::SLOT_ID_WIDTH <= 32);
const_assert!(command::CAST_OUT < command::SLOT_ID);
