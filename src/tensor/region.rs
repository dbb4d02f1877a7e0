//! Valid region: the sub-rectangle of an allocated buffer holding defined
//! (non-border) values

use super::coords::Coordinates;
use super::shape::TensorShape;

/// An anchor + shape sub-rectangle of defined data inside a (possibly
/// padded) allocation
///
/// Invariant: `anchor + shape` must fit within the owning descriptor's
/// allocated shape plus padding; [`crate::tensor::TensorDescriptor`] and
/// [`crate::tensor::SubTensorView`] enforce this at mutation time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidRegion {
    /// Position of the first valid element per axis
    pub anchor: Coordinates,
    /// Extent of the valid data per axis
    pub shape: TensorShape,
}

impl ValidRegion {
    /// Create a valid region from an anchor and shape.
    pub fn new(anchor: Coordinates, shape: TensorShape) -> Self {
        Self { anchor, shape }
    }

    /// The full region of `shape`, anchored at the origin.
    pub fn full(shape: &TensorShape) -> Self {
        Self {
            anchor: Coordinates::zeros(shape.num_dimensions()),
            shape: shape.clone(),
        }
    }

    /// First valid position along `axis`.
    #[inline]
    pub fn start(&self, axis: usize) -> isize {
        self.anchor.get(axis)
    }

    /// One past the last valid position along `axis`.
    #[inline]
    pub fn end(&self, axis: usize) -> isize {
        self.anchor.get(axis) + self.shape.extent(axis) as isize
    }

    /// Whether this region lies entirely inside `outer`, per axis.
    pub fn contained_in(&self, outer: &ValidRegion) -> bool {
        let rank = self
            .shape
            .num_dimensions()
            .max(outer.shape.num_dimensions());
        (0..rank).all(|axis| self.start(axis) >= outer.start(axis) && self.end(axis) <= outer.end(axis))
    }
}
