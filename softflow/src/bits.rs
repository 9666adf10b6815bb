use std::fmt;

use crate::{PortDecls, Signal, SignalError};

/// Fixed-width bit vector.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits<const N: usize> {
    inner: [bool; N],
}

impl<const N: usize> Bits<N> {
    /// All bits cleared.
    pub const fn zeros() -> Self { Self { inner: [false; N] } }

    /// All bits set.
    pub const fn ones() -> Self { Self { inner: [true; N] } }

    /// Creates bits from the low bits of `value`. Bits above 64 are cleared.
    pub fn from_u64(value: u64) -> Self {
        let mut bits = Self::zeros();
        for (i, bit) in bits.inner.iter_mut().enumerate().take(64) {
            *bit = (value >> i) & 1 == 1;
        }
        bits
    }

    /// Returns the low 64 bits as an integer.
    pub fn to_u64(&self) -> u64 {
        self.inner.iter().take(64).enumerate().fold(0, |acc, (i, bit)| acc | (u64::from(*bit) << i))
    }

    /// Returns the `index`-th bit.
    pub fn get(&self, index: usize) -> bool { self.inner[index] }

    /// Sets the `index`-th bit.
    pub fn set(&mut self, index: usize, value: bool) { self.inner[index] = value; }

    /// Returns `M` bits starting from `start`.
    pub fn clip<const M: usize>(&self, start: usize) -> Bits<M> {
        assert!(start + M <= N, "clip [{}, {}) out of range for {} bits", start, start + M, N);
        let mut bits = Bits::<M>::zeros();
        bits.inner.copy_from_slice(&self.inner[start..start + M]);
        bits
    }

    /// Overwrites `M` bits starting from `start`.
    pub fn set_range<const M: usize>(&mut self, start: usize, value: &Bits<M>) {
        assert!(start + M <= N, "range [{}, {}) out of range for {} bits", start, start + M, N);
        self.inner[start..start + M].copy_from_slice(&value.inner);
    }

    /// Iterator over the bits, least significant first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ { self.inner.iter().copied() }

    /// Returns `true` if every bit is set.
    pub fn all(&self) -> bool { self.inner.iter().all(|b| *b) }

    /// Returns `true` if any bit is set.
    pub fn any(&self) -> bool { self.inner.iter().any(|b| *b) }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize { self.inner.iter().filter(|b| **b).count() }
}

impl<const N: usize> Default for Bits<N> {
    fn default() -> Self { Self::zeros() }
}

impl<const N: usize> From<[bool; N]> for Bits<N> {
    fn from(inner: [bool; N]) -> Self { Self { inner } }
}

impl<const N: usize> TryFrom<Vec<bool>> for Bits<N> {
    type Error = SignalError;

    fn try_from(value: Vec<bool>) -> Result<Self, Self::Error> {
        let found = value.len();
        let inner = value.try_into().map_err(|_| SignalError::WidthMismatch { expected: N, found })?;
        Ok(Self { inner })
    }
}

impl<const N: usize> fmt::Debug for Bits<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'h", N)?;
        if N == 0 {
            return write!(f, "0");
        }
        for chunk in (0..(N + 3) / 4).rev() {
            let nibble = (0..4)
                .filter(|i| chunk * 4 + i < N && self.inner[chunk * 4 + i])
                .fold(0_u32, |acc, i| acc | (1 << i));
            write!(f, "{:x}", nibble)?;
        }
        Ok(())
    }
}

impl<const N: usize> Signal for Bits<N> {
    const WIDTH: usize = N;

    fn transl(&self) -> Vec<bool> { self.inner.to_vec() }

    fn port_decls() -> PortDecls { PortDecls::Bits(N) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_conversion() {
        let bits = Bits::<12>::from_u64(0xabc);
        assert_eq!(bits.to_u64(), 0xabc);
        assert!(bits.get(2));
        assert!(!bits.get(0));
        assert_eq!(format!("{:?}", bits), "12'habc");
        assert_eq!(Bits::<4>::from_u64(0xff).to_u64(), 0xf);
    }

    #[test]
    fn clip_and_set_range() {
        let mut bits = Bits::<16>::from_u64(0x1234);
        assert_eq!(bits.clip::<8>(4).to_u64(), 0x23);

        bits.set_range(8, &Bits::<8>::ones());
        assert_eq!(bits.to_u64(), 0xff34);
        assert_eq!(bits.count_ones(), 11);
    }

    #[test]
    fn width_mismatch() {
        assert_eq!(
            Bits::<3>::try_from(vec![true, false]),
            Err(SignalError::WidthMismatch { expected: 3, found: 2 })
        );
        assert!(Bits::<2>::try_from(vec![true, true]).map(|bits| bits.all()).unwrap_or(false));
    }
}
