//! Strobed stream payloads.

use softflow_macro::Signal;

use crate::*;

/// Stream payload with a byte-enable strobe.
///
/// `SW` should be `DW / 8`. Bit `j` of `strb` enables byte `j` of `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Signal)]
pub struct Strobed<const DW: usize, const SW: usize> {
    /// Payload.
    pub data: Bits<DW>,

    /// Byte enables.
    pub strb: Bits<SW>,
}

impl<const DW: usize, const SW: usize> Strobed<DW, SW> {
    /// Creates a payload from `bytes`, little-endian, with every byte enabled.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len() * 8, DW, "{} bytes do not fill a {}-bit payload", bytes.len(), DW);
        let mut data = Bits::zeros();
        for (i, byte) in bytes.iter().enumerate() {
            data.set_range(i * 8, &Bits::<8>::from_u64(u64::from(*byte)));
        }
        Self { data, strb: Bits::ones() }
    }

    /// Payload bytes, little-endian.
    pub fn bytes(&self) -> Vec<u8> {
        (0..DW / 8).map(|i| self.data.clip::<8>(i * 8).to_u64() as u8).collect()
    }

    /// Returns the `index`-th element of `elem_width` bits, together with its strobe bits.
    pub fn elem(&self, index: usize, elem_width: usize) -> (Vec<bool>, Vec<bool>) {
        let elem_bytes = elem_width / 8;
        let data = (0..elem_width).map(|b| self.data.get(index * elem_width + b)).collect();
        let strb = (0..elem_bytes).map(|b| self.strb.get(index * elem_bytes + b)).collect();
        (data, strb)
    }

    /// Overwrites the `index`-th element of `elem_width` bits, together with its strobe bits.
    pub fn set_elem(&mut self, index: usize, elem_width: usize, data: &[bool], strb: &[bool]) {
        let elem_bytes = elem_width / 8;
        assert_eq!(data.len(), elem_width);
        assert_eq!(strb.len(), elem_bytes);
        for (b, bit) in data.iter().enumerate() {
            self.data.set(index * elem_width + b, *bit);
        }
        for (b, bit) in strb.iter().enumerate() {
            self.strb.set(index * elem_bytes + b, *bit);
        }
    }
}
