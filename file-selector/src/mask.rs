//! Fixed-width set of registered filter identifiers.
//!
//! A [`FilterMask`] is a 64-bit set where bit `i` refers to the `i`-th
//! extension registered in an [`ExtensionRegistry`](crate::ExtensionRegistry).
//! The empty mask means "no filter restriction".

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Maximum number of filters a single registry (and therefore a single mask) can address.
pub const MAX_FILTERS: usize = u64::BITS as usize;

/// Bit-set of extension identifiers.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FilterMask(u64);

impl FilterMask {
    /// The empty set: the picker accepts all files.
    pub const EMPTY: FilterMask = FilterMask(0);

    /// Wrap a raw bit pattern received from a caller.
    ///
    /// Bits without a registered extension are kept; they are skipped on resolution.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mask with only the bit for `index` set, or `None` if `index >= MAX_FILTERS`.
    #[inline]
    pub const fn single(index: usize) -> Option<Self> {
        if index < MAX_FILTERS {
            Some(Self(1u64 << index))
        } else {
            None
        }
    }

    /// Returns `true` if no identifier is selected.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected identifiers.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the identifier at `index` is selected.
    #[inline]
    pub const fn contains(self, index: usize) -> bool {
        index < MAX_FILTERS && self.0 & (1u64 << index) != 0
    }

    /// Selected identifiers in ascending bit order.
    pub fn iter(self) -> Indices {
        Indices(self.0)
    }
}

impl fmt::Debug for FilterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterMask({:#b})", self.0)
    }
}

impl BitOr for FilterMask {
    type Output = FilterMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FilterMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<FilterMask> for FilterMask {
    fn from_iter<I: IntoIterator<Item = FilterMask>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, BitOr::bitor)
    }
}

impl From<u64> for FilterMask {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl IntoIterator for FilterMask {
    type Item = usize;
    type IntoIter = Indices;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the set bit indices of a [`FilterMask`], lowest first.
#[derive(Clone, Debug)]
pub struct Indices(u64);

impl Iterator for Indices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        // clear lowest set bit
        self.0 &= self.0 - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Indices {}
