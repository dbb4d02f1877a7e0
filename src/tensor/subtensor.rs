//! Zero-copy sub-tensor views over a parent descriptor
//!
//! A view carries its own shape, offset coordinates, and valid region, and
//! forwards every other metadata query to its parent through the arena.
//! Write operations on shared fields (data type, layout, quantization,
//! locks, padding) mutate the parent and are therefore visible to every
//! sibling view.

use super::arena::{TensorArena, TensorHandle};
use super::coords::Coordinates;
use super::padding::PaddingSize;
use super::region::ValidRegion;
use super::shape::TensorShape;
use crate::dtype::{DataLayout, DataType, QuantizationInfo};
use crate::error::{Error, Result};

/// Number of innermost axes fixed by the memory layout. Sub-tensoring and
/// parent extension are disallowed along these (fastest-varying) axes.
const LAYOUT_AXES: usize = 2;

/// A view over a rectangular region of a parent tensor, sharing its storage
///
/// Constructed against a parent handle in a [`TensorArena`]; the arena (not
/// the view) owns the parent, so views can be dropped in any order.
///
/// With `extend_parent`, setting the view's shape grows the parent's shape
/// on every axis except the two innermost, and updates the parent's valid
/// region to match.
#[derive(Clone, Debug)]
pub struct SubTensorView {
    parent: TensorHandle,
    shape: TensorShape,
    coords: Coordinates,
    valid_region: ValidRegion,
    extend_parent: bool,
}

impl SubTensorView {
    /// Create a view of `shape` at `coords` inside `parent`.
    ///
    /// Without `extend_parent`, `coords + shape` must fit inside the
    /// parent's shape on every axis, and the two innermost axes must match
    /// the parent exactly; a violation is a recoverable configuration error.
    ///
    /// With `extend_parent`, the parent's shape is grown instead wherever
    /// `coords + shape` exceeds it, on any axis other than the two
    /// innermost.
    pub fn new(
        arena: &mut TensorArena,
        parent: TensorHandle,
        shape: impl Into<TensorShape>,
        coords: impl Into<Coordinates>,
        extend_parent: bool,
    ) -> Result<Self> {
        let shape = shape.into();
        let mut view = Self {
            parent,
            shape: TensorShape::new(),
            coords: coords.into(),
            valid_region: ValidRegion::default(),
            extend_parent,
        };
        view.set_tensor_shape(arena, shape)?;
        Ok(view)
    }

    /// Set the view's shape, validating against (or growing) the parent.
    pub fn set_tensor_shape(
        &mut self,
        arena: &mut TensorArena,
        shape: impl Into<TensorShape>,
    ) -> Result<()> {
        let shape = shape.into();
        if self.extend_parent {
            self.grow_parent(arena, &shape)?;
        } else {
            self.check_contained(arena.get(self.parent).tensor_shape(), &shape)?;
        }
        self.valid_region = ValidRegion::full(&shape);
        self.shape = shape;
        Ok(())
    }

    fn check_contained(&self, parent_shape: &TensorShape, shape: &TensorShape) -> Result<()> {
        let rank = parent_shape
            .num_dimensions()
            .max(shape.num_dimensions())
            .max(self.coords.num_dimensions());
        for axis in 0..rank {
            let coord = self.coords.get(axis);
            let extent = shape.extent(axis);
            let parent_extent = parent_shape.extent(axis);
            if axis < LAYOUT_AXES.min(parent_shape.num_dimensions()) {
                if coord != 0 || extent != parent_extent {
                    return Err(Error::sub_tensor(format!(
                        "axis {axis} is layout-fixed: the view must match the parent exactly"
                    )));
                }
                continue;
            }
            if coord < 0 || coord as usize + extent > parent_extent {
                return Err(Error::sub_tensor(format!(
                    "view exceeds parent on axis {axis}: coord {coord} + extent {extent} > {parent_extent}"
                )));
            }
        }
        Ok(())
    }

    fn grow_parent(&self, arena: &mut TensorArena, shape: &TensorShape) -> Result<()> {
        let parent = arena.get(self.parent);
        let parent_shape = parent.tensor_shape();
        let rank = parent_shape
            .num_dimensions()
            .max(shape.num_dimensions())
            .max(self.coords.num_dimensions());

        let mut grown = parent_shape.clone();
        let mut needs_growth = false;
        for axis in 0..rank {
            let coord = self.coords.get(axis);
            if coord < 0 {
                return Err(Error::sub_tensor(format!(
                    "negative coordinate {coord} on axis {axis}"
                )));
            }
            let required = coord as usize + shape.extent(axis);
            if required <= parent_shape.extent(axis) {
                continue;
            }
            if axis < LAYOUT_AXES {
                return Err(Error::sub_tensor(format!(
                    "cannot extend parent along layout-fixed axis {axis}"
                )));
            }
            grown.set(axis, required);
            needs_growth = true;
        }

        if needs_growth {
            let parent = arena.get_mut(self.parent);
            parent.set_tensor_shape(grown)?;
            parent.reset_valid_region_to_full();
        }
        Ok(())
    }

    // ----- own fields -----

    /// The view's own shape (not the parent's).
    pub fn tensor_shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Number of dimensions of the view.
    pub fn num_dimensions(&self) -> usize {
        self.shape.num_dimensions()
    }

    /// Offset of the view's origin inside the parent.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coords
    }

    /// The view's own valid region.
    pub fn valid_region(&self) -> &ValidRegion {
        &self.valid_region
    }

    /// Handle of the parent descriptor.
    pub fn parent(&self) -> TensorHandle {
        self.parent
    }

    /// Whether this view grows its parent on `set_tensor_shape`.
    pub fn extends_parent(&self) -> bool {
        self.extend_parent
    }

    /// Set the view's valid region.
    ///
    /// While the parent is configured (non-empty), the region must be
    /// contained in the parent's valid region; before that it is stored
    /// directly.
    pub fn set_valid_region(&mut self, arena: &TensorArena, region: ValidRegion) -> Result<()> {
        let parent = arena.get(self.parent);
        if parent.total_size() != 0 && !region.contained_in(parent.valid_region()) {
            return Err(Error::sub_tensor(
                "valid region exceeds the parent's valid region",
            ));
        }
        self.valid_region = region;
        Ok(())
    }

    // ----- queries forwarded to the parent -----

    /// Byte offset of the view's first element inside the parent's
    /// allocation.
    pub fn offset_first_element_in_bytes(&self, arena: &TensorArena) -> Result<usize> {
        arena.get(self.parent).offset_element_in_bytes(&self.coords)
    }

    /// Element type (the parent's).
    pub fn data_type(&self, arena: &TensorArena) -> DataType {
        arena.get(self.parent).data_type()
    }

    /// Element size in bytes (the parent's).
    pub fn element_size(&self, arena: &TensorArena) -> usize {
        arena.get(self.parent).element_size()
    }

    /// Byte strides (the parent's; a view never re-strides).
    pub fn strides_in_bytes<'a>(&self, arena: &'a TensorArena) -> &'a super::strides::Strides {
        arena.get(self.parent).strides_in_bytes()
    }

    /// Padding (the parent's).
    pub fn padding<'a>(&self, arena: &'a TensorArena) -> &'a PaddingSize {
        arena.get(self.parent).padding()
    }

    /// Total allocation size (the parent's).
    pub fn total_size(&self, arena: &TensorArena) -> usize {
        arena.get(self.parent).total_size()
    }

    /// Quantization info (the parent's).
    pub fn quantization_info<'a>(&self, arena: &'a TensorArena) -> &'a QuantizationInfo {
        arena.get(self.parent).quantization_info()
    }

    /// Layout tag (the parent's).
    pub fn data_layout(&self, arena: &TensorArena) -> DataLayout {
        arena.get(self.parent).data_layout()
    }

    // ----- writes delegated to the parent (visible to all sibling views) -----

    /// Set the element type on the parent.
    pub fn set_data_type(&self, arena: &mut TensorArena, data_type: DataType) -> Result<()> {
        arena.get_mut(self.parent).set_data_type(data_type)?;
        Ok(())
    }

    /// Set the layout tag on the parent.
    pub fn set_data_layout(&self, arena: &mut TensorArena, layout: DataLayout) {
        arena.get_mut(self.parent).set_data_layout(layout);
    }

    /// Set the quantization info on the parent.
    pub fn set_quantization_info(&self, arena: &mut TensorArena, info: QuantizationInfo) {
        arena.get_mut(self.parent).set_quantization_info(info);
    }

    /// Allow or forbid resizing on the parent.
    pub fn set_is_resizable(&self, arena: &mut TensorArena, resizable: bool) {
        arena.get_mut(self.parent).set_is_resizable(resizable);
    }

    /// Lock or unlock paddings on the parent.
    pub fn set_lock_paddings(&self, arena: &mut TensorArena, lock: bool) {
        arena.get_mut(self.parent).set_lock_paddings(lock);
    }

    /// Extend padding on the parent.
    pub fn extend_padding(&self, arena: &mut TensorArena, padding: PaddingSize) -> Result<bool> {
        arena.get_mut(self.parent).extend_padding(padding)
    }
}
