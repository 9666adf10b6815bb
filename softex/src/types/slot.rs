//! State slot requests.

use std::array;

use softflow::*;

use crate::constants::slot::SLOT_ID_WIDTH;

/// Slot request operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub enum SlotOp {
    /// Allocate a fresh slot.
    #[default]
    Alloc,
    /// Load the slot contents.
    Load,
}

/// Slot request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct SlotReq {
    /// Slot id.
    pub addr: Bits<SLOT_ID_WIDTH>,
    /// Operation.
    pub op: SlotOp,
}

/// Slot update operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub enum SlotUpdOp {
    /// Store the per-lane values.
    #[default]
    Update,
    /// Release the slot.
    Free,
}

/// Slot update carrying the per-lane maximum and denominator.
#[derive(Debug, Clone, PartialEq, Eq, Signal)]
pub struct SlotUpdate<const N: usize> {
    /// Slot id.
    pub addr: Bits<SLOT_ID_WIDTH>,
    /// Operation.
    pub op: SlotUpdOp,
    /// Running maximum of each lane.
    pub max: [u32; N],
    /// Denominator (or its reciprocal) of each lane.
    pub den: [u32; N],
}

impl<const N: usize> Default for SlotUpdate<N> {
    fn default() -> Self { Self { addr: Bits::zeros(), op: SlotUpdOp::default(), max: [0; N], den: [0; N] } }
}

/// Combinational read-back of the slot addressed by the current command.
#[derive(Debug, Clone, PartialEq, Eq, Signal)]
pub struct SlotReadback<const N: usize> {
    /// The slot holds values.
    pub valid: bool,
    /// Stored maximum of each lane.
    pub max: [u32; N],
    /// Stored denominator of each lane.
    pub den: [u32; N],
}

impl<const N: usize> Default for SlotReadback<N> {
    fn default() -> Self { Self { valid: false, max: [0; N], den: [0; N] } }
}

impl<const N: usize> SlotReadback<N> {
    /// Read-back of a slot holding the given per-lane values.
    pub fn valid(max: [u32; N], den: [u32; N]) -> Self { Self { valid: true, max, den } }

    /// Read-back built lane by lane.
    pub fn from_lanes(valid: bool, f: impl Fn(usize) -> (u32, u32)) -> Self {
        Self { valid, max: array::from_fn(|lane| f(lane).0), den: array::from_fn(|lane| f(lane).1) }
    }
}
