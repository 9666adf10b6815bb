//! Sticky completion bitmap.

use softflow_macro::Signal;

use crate::*;

/// Per-lane completion flags, accumulated over cycles until cleared as a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct DoneBitmap<const N: usize> {
    #[member(name = "")]
    inner: Bits<N>,
}

impl<const N: usize> DoneBitmap<N> {
    /// Empty bitmap.
    pub const fn new() -> Self { Self { inner: Bits::zeros() } }

    /// Returns whether `lane` is done.
    pub fn get(&self, lane: usize) -> bool { self.inner.get(lane) }

    /// Marks `lane` as done.
    #[must_use]
    pub fn mark(mut self, lane: usize) -> Self {
        self.inner.set(lane, true);
        self
    }

    /// ORs the given per-lane flags into the bitmap.
    #[must_use]
    pub fn merge(self, flags: impl IntoIterator<Item = bool>) -> Self {
        flags.into_iter().take(N).enumerate().fold(self, |acc, (lane, flag)| if flag { acc.mark(lane) } else { acc })
    }

    /// Clears every flag.
    #[must_use]
    pub fn clear(self) -> Self { Self::new() }

    /// Returns `true` if every lane is done.
    pub fn all(&self) -> bool { self.inner.all() }

    /// Returns `true` if any lane is done.
    pub fn any(&self) -> bool { self.inner.any() }

    /// Number of done lanes.
    pub fn count(&self) -> usize { self.inner.count_ones() }

    /// Bitmap view.
    pub fn bits(&self) -> Bits<N> { self.inner }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticky_flags() {
        let bitmap = DoneBitmap::<4>::new().merge([true, false, false, false]);
        assert_eq!(bitmap.count(), 1);
        assert!(!bitmap.all());

        let bitmap = bitmap.merge([false, false, true, false]).merge([true, true, false, true]);
        assert!(bitmap.all());
        assert!(bitmap.get(2));
        assert!(!bitmap.clear().any());
        assert_eq!(DoneBitmap::<4>::default(), DoneBitmap::new());
    }
}
