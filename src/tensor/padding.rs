//! Padding (border) sizes around the two innermost axes

/// Border sizes in elements around a 2D plane
///
/// Padding is only meaningful on the two innermost axes: `left`/`right`
/// extend axis 0, `top`/`bottom` extend axis 1. Outer axes are never padded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaddingSize {
    /// Elements prepended on axis 1
    pub top: usize,
    /// Elements appended on axis 0
    pub right: usize,
    /// Elements appended on axis 1
    pub bottom: usize,
    /// Elements prepended on axis 0
    pub left: usize,
}

impl PaddingSize {
    /// No padding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Equal padding on all four sides.
    pub fn uniform(size: usize) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    /// Padding with distinct sizes per side.
    pub fn with_sides(top: usize, right: usize, bottom: usize, left: usize) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Whether all four sides are zero.
    pub fn is_empty(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }

    /// Union with `other`: each side becomes the maximum of the two.
    /// Returns whether any side grew. Padding never shrinks.
    pub fn merge(&mut self, other: &PaddingSize) -> bool {
        let merged = Self {
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
            left: self.left.max(other.left),
        };
        let changed = merged != *self;
        *self = merged;
        changed
    }
}
