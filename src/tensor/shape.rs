//! Shape type: per-axis extents of a tensor

use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};

/// Maximum number of dimensions this layer supports.
/// Axis 0 is always the innermost (fastest-varying) axis.
pub(crate) const MAX_DIMS: usize = 6;

/// Shape type: per-axis extents, innermost axis first
#[derive(Clone, PartialEq, Eq, Default)]
pub struct TensorShape(SmallVec<[usize; MAX_DIMS]>);

impl TensorShape {
    /// Create an empty (zero-dimensional) shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.0.len()
    }

    /// Whether this shape has zero dimensions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of elements; zero for a zero-dimensional shape.
    pub fn total_size(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.iter().product()
        }
    }

    /// Extent along `axis`; axes beyond the rank have extent 1.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.0.get(axis).copied().unwrap_or(1)
    }

    /// Set the extent along `axis`, growing the rank with extents of 1
    /// if needed.
    pub fn set(&mut self, axis: usize, extent: usize) {
        while self.0.len() <= axis {
            self.0.push(1);
        }
        self.0[axis] = extent;
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl Deref for TensorShape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl DerefMut for TensorShape {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut_slice()
    }
}

impl fmt::Debug for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for TensorShape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<Vec<usize>> for TensorShape {
    fn from(value: Vec<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<&[usize]> for TensorShape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for TensorShape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for TensorShape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
