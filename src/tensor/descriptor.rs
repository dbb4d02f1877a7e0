//! Owning tensor metadata: shape, byte strides, padding, valid region,
//! element type, and mutation locks

use super::coords::Coordinates;
use super::padding::PaddingSize;
use super::region::ValidRegion;
use super::shape::TensorShape;
use super::strides::Strides;
use crate::dtype::{DataLayout, DataType, QuantizationInfo};
use crate::error::{Error, Result};

/// Canonical metadata for one tensor
///
/// A descriptor holds everything a kernel needs to address elements - shape,
/// byte strides, padding, valid region, element type - but never the element
/// storage itself. A descriptor is *empty* until both a shape and a data type
/// are set (`total_size() == 0`); kernels refuse to configure against empty
/// operands unless they can auto-initialize them.
///
/// Shape- and type-changing setters fail once `set_is_resizable(false)` has
/// been called; `extend_padding` fails once paddings are locked. Cloning is a
/// deep copy of the metadata only.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorDescriptor {
    shape: TensorShape,
    strides_in_bytes: Strides,
    offset_first_element_in_bytes: usize,
    total_size_in_bytes: usize,
    padding: PaddingSize,
    valid_region: ValidRegion,
    valid_region_fixed: bool,
    data_type: DataType,
    quantization: QuantizationInfo,
    data_layout: DataLayout,
    resizable: bool,
    lock_paddings: bool,
    id: usize,
}

/// Id of a descriptor not yet registered in an arena
pub(crate) const UNREGISTERED_ID: usize = usize::MAX;

impl TensorDescriptor {
    /// Create an empty, resizable descriptor with no shape or type.
    pub fn empty() -> Self {
        Self {
            shape: TensorShape::new(),
            strides_in_bytes: Strides::new(),
            offset_first_element_in_bytes: 0,
            total_size_in_bytes: 0,
            padding: PaddingSize::new(),
            valid_region: ValidRegion::default(),
            valid_region_fixed: false,
            data_type: DataType::Unknown,
            quantization: QuantizationInfo::default(),
            data_layout: DataLayout::Unknown,
            resizable: true,
            lock_paddings: false,
            id: UNREGISTERED_ID,
        }
    }

    /// Create a descriptor with a shape and data type, with contiguous
    /// unpadded strides.
    pub fn new(shape: impl Into<TensorShape>, data_type: DataType) -> Self {
        let mut desc = Self::empty();
        desc.data_type = data_type;
        desc.shape = shape.into();
        desc.recompute_layout();
        desc.valid_region = ValidRegion::full(&desc.shape);
        desc
    }

    // ----- accessors -----

    /// The tensor's shape.
    pub fn tensor_shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn num_dimensions(&self) -> usize {
        self.shape.num_dimensions()
    }

    /// Byte strides per axis (inclusive of padding).
    pub fn strides_in_bytes(&self) -> &Strides {
        &self.strides_in_bytes
    }

    /// Byte offset from the start of the allocation to the first element
    /// of the unpadded region.
    pub fn offset_first_element_in_bytes(&self) -> usize {
        self.offset_first_element_in_bytes
    }

    /// Total allocation size in bytes, padding included. Zero while the
    /// descriptor is still empty.
    pub fn total_size(&self) -> usize {
        self.total_size_in_bytes
    }

    /// Current padding around the two innermost axes.
    pub fn padding(&self) -> &PaddingSize {
        &self.padding
    }

    /// Whether any padding is present.
    pub fn has_padding(&self) -> bool {
        !self.padding.is_empty()
    }

    /// The region of defined (non-border) values.
    pub fn valid_region(&self) -> &ValidRegion {
        &self.valid_region
    }

    /// Element type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.data_type.size_in_bytes()
    }

    /// Quantization parameters (identity for non-quantized types).
    pub fn quantization_info(&self) -> &QuantizationInfo {
        &self.quantization
    }

    /// Memory layout tag.
    pub fn data_layout(&self) -> DataLayout {
        self.data_layout
    }

    /// Whether shape/type mutation is still permitted.
    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// Whether `extend_padding` is still permitted.
    pub fn are_paddings_locked(&self) -> bool {
        self.lock_paddings
    }

    /// Stable id, assigned by the arena at registration.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    // ----- mutation -----

    /// Set the tensor shape, recomputing strides and total size.
    ///
    /// Fails if the descriptor is not resizable. Resets the valid region to
    /// the full shape unless a caller-fixed valid region is in place.
    pub fn set_tensor_shape(&mut self, shape: impl Into<TensorShape>) -> Result<&mut Self> {
        if !self.resizable {
            return Err(Error::NotResizable);
        }
        self.shape = shape.into();
        self.recompute_layout();
        if !self.valid_region_fixed {
            self.valid_region = ValidRegion::full(&self.shape);
        }
        Ok(self)
    }

    /// Set the element type, recomputing strides and total size.
    ///
    /// Fails if the descriptor is not resizable (the element size feeds the
    /// stride computation).
    pub fn set_data_type(&mut self, data_type: DataType) -> Result<&mut Self> {
        if !self.resizable {
            return Err(Error::NotResizable);
        }
        self.data_type = data_type;
        self.recompute_layout();
        if !self.valid_region_fixed && self.valid_region.shape.is_empty() {
            self.valid_region = ValidRegion::full(&self.shape);
        }
        Ok(self)
    }

    /// Set the memory layout tag.
    pub fn set_data_layout(&mut self, layout: DataLayout) -> &mut Self {
        self.data_layout = layout;
        self
    }

    /// Set the quantization parameters.
    pub fn set_quantization_info(&mut self, info: QuantizationInfo) -> &mut Self {
        self.quantization = info;
        self
    }

    /// Fix the valid region. Subsequent `set_tensor_shape` calls keep it.
    pub fn set_valid_region(&mut self, region: ValidRegion) -> &mut Self {
        self.valid_region = region;
        self.valid_region_fixed = true;
        self
    }

    pub(crate) fn reset_valid_region_to_full(&mut self) {
        self.valid_region = ValidRegion::full(&self.shape);
        self.valid_region_fixed = false;
    }

    /// Allow or forbid shape/type mutation.
    pub fn set_is_resizable(&mut self, resizable: bool) -> &mut Self {
        self.resizable = resizable;
        self
    }

    /// Allow or forbid further padding extension.
    pub fn set_lock_paddings(&mut self, lock: bool) -> &mut Self {
        self.lock_paddings = lock;
        self
    }

    /// Union the requested padding into the existing padding.
    ///
    /// Padding never shrinks. Fails if paddings are locked or the descriptor
    /// is still empty. Returns whether strides or offsets changed.
    pub fn extend_padding(&mut self, padding: PaddingSize) -> Result<bool> {
        if self.lock_paddings {
            return Err(Error::PaddingsLocked);
        }
        if self.total_size_in_bytes == 0 {
            return Err(Error::EmptyDescriptor {
                op: "extend padding",
            });
        }
        let changed = self.padding.merge(&padding);
        if changed {
            self.recompute_layout();
        }
        Ok(changed)
    }

    // ----- addressing -----

    /// Byte offset of the element at `coords`:
    /// `sum(coords[i] * strides[i]) + offset_first_element_in_bytes()`.
    ///
    /// Fails with `OutOfRange` if any coordinate falls outside `[0, shape[i])`.
    pub fn offset_element_in_bytes(&self, coords: &Coordinates) -> Result<usize> {
        let mut offset = self.offset_first_element_in_bytes as isize;
        for axis in 0..coords.num_dimensions().max(self.num_dimensions()) {
            let c = coords.get(axis);
            let extent = self.shape.extent(axis);
            if c < 0 || c as usize >= extent {
                return Err(Error::OutOfRange {
                    index: c,
                    axis,
                    extent,
                });
            }
            offset += c * self.strides_in_bytes.get(axis) as isize;
        }
        Ok(offset as usize)
    }

    // ----- layout computation -----

    /// Recompute byte strides, first-element offset, and total size from
    /// the current shape, element size, and padding.
    ///
    /// Layout per axis (axis 0 innermost):
    ///   stride[0] = element_size
    ///   stride[1] = (left + shape[0] + right) * stride[0]
    ///   stride[2] = (top + shape[1] + bottom) * stride[1]
    ///   stride[i>2] = stride[i-1] * shape[i-1]
    fn recompute_layout(&mut self) {
        let elem = self.element_size();
        let rank = self.shape.num_dimensions();

        self.strides_in_bytes = Strides::new();
        self.offset_first_element_in_bytes = 0;
        self.total_size_in_bytes = 0;

        if elem == 0 || rank == 0 || self.shape.total_size() == 0 {
            return;
        }

        let stride_x = elem;
        let stride_y = (self.padding.left + self.shape.extent(0) + self.padding.right) * stride_x;
        let stride_z = (self.padding.top + self.shape.extent(1) + self.padding.bottom) * stride_y;

        self.strides_in_bytes.push(stride_x);
        if rank >= 2 {
            self.strides_in_bytes.push(stride_y);
        }
        if rank >= 3 {
            self.strides_in_bytes.push(stride_z);
        }
        for axis in 3..rank {
            let stride = self.strides_in_bytes.get(axis - 1) * self.shape.extent(axis - 1);
            self.strides_in_bytes.push(stride);
        }

        self.offset_first_element_in_bytes =
            self.padding.top * stride_y + self.padding.left * stride_x;

        self.total_size_in_bytes = match rank {
            1 => stride_y,
            2 => stride_z,
            _ => self.strides_in_bytes.get(rank - 1) * self.shape.extent(rank - 1),
        };
    }
}

impl Default for TensorDescriptor {
    fn default() -> Self {
        Self::empty()
    }
}
