//! Coordinates type: a signed per-axis position

use super::shape::MAX_DIMS;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};

/// A signed integer tuple with one value per axis
///
/// Used both for valid-region anchors and for per-element iteration
/// positions. Signed so that anchors can sit inside a border region.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Coordinates(SmallVec<[isize; MAX_DIMS]>);

impl Coordinates {
    /// Create empty (zero-dimensional) coordinates.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// All-zero coordinates of the given rank.
    pub fn zeros(rank: usize) -> Self {
        Self((0..rank).map(|_| 0).collect())
    }

    /// Number of axes.
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.0.len()
    }

    /// Coordinate along `axis`; zero for axes beyond the rank.
    #[inline]
    pub fn get(&self, axis: usize) -> isize {
        self.0.get(axis).copied().unwrap_or(0)
    }

    /// Set the coordinate along `axis`, growing the rank with zeros if
    /// needed.
    pub fn set(&mut self, axis: usize, value: isize) {
        while self.0.len() <= axis {
            self.0.push(0);
        }
        self.0[axis] = value;
    }

    /// View coordinates as a slice.
    pub fn as_slice(&self) -> &[isize] {
        self.0.as_slice()
    }
}

impl Deref for Coordinates {
    type Target = [isize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl DerefMut for Coordinates {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut_slice()
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Vec<isize>> for Coordinates {
    fn from(value: Vec<isize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[isize]> for Coordinates {
    fn from(value: &[isize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[isize; N]> for Coordinates {
    fn from(value: [isize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<isize> for Coordinates {
    fn from_iter<T: IntoIterator<Item = isize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
