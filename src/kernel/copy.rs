//! Copy kernel: row-wise copy between tensors of identical shape and type

use super::{for_each_row, row_target, KernelIo, RowTarget};
use crate::error::{Error, Result, Status};
use crate::runtime::{Hints, WorkerContext};
use crate::tensor::{TensorArena, TensorDescriptor, TensorHandle};
use crate::window::{Steps, Window};

/// Copies its source tensor into its destination, row by row
///
/// If the destination descriptor is still empty at configure time it is
/// auto-initialized from the source (shape and data type), provided it is
/// resizable. Source and destination may carry different paddings; the copy
/// goes through each descriptor's own strides.
#[derive(Clone, Debug)]
pub struct CopyKernel {
    src: TensorHandle,
    dst: TensorHandle,
    window: Window,
}

impl CopyKernel {
    const MIN_WORKLOAD: usize = 1;
    const SPLIT_AXIS: usize = 1;

    /// Check that `src` can be copied into `dst` without configuring
    /// anything.
    pub fn validate(src: &TensorDescriptor, dst: &TensorDescriptor) -> Status {
        if src.total_size() == 0 {
            return Err(Error::EmptyDescriptor {
                op: "configure copy",
            });
        }
        if dst.total_size() == 0 {
            // Will be auto-initialized from src at configure time.
            if !dst.is_resizable() {
                return Err(Error::NotResizable);
            }
            return Ok(());
        }
        if src.data_type() != dst.data_type() {
            return Err(Error::DTypeMismatch {
                lhs: src.data_type(),
                rhs: dst.data_type(),
            });
        }
        if src.tensor_shape() != dst.tensor_shape() {
            return Err(Error::shape_mismatch(
                src.tensor_shape().as_slice(),
                dst.tensor_shape().as_slice(),
            ));
        }
        Ok(())
    }

    /// Configure a copy from `src` into `dst`.
    ///
    /// Validates first and only then mutates: a failed configure leaves the
    /// destination descriptor untouched.
    pub fn configure(
        arena: &mut TensorArena,
        src: TensorHandle,
        dst: TensorHandle,
    ) -> Result<Self> {
        if src == dst {
            return Err(Error::InvalidArgument {
                arg: "dst",
                reason: "source and destination alias the same tensor".into(),
            });
        }
        Self::validate(arena.get(src), arena.get(dst))?;

        if arena.get(dst).total_size() == 0 {
            let shape = arena.get(src).tensor_shape().clone();
            let data_type = arena.get(src).data_type();
            arena
                .get_mut(dst)
                .set_data_type(data_type)?
                .set_tensor_shape(shape)?;
        }

        let window = Window::calculate_max_window(arena.get(src), &Steps::new())?;
        Ok(Self { src, dst, window })
    }

    /// The configured execution window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Scheduling hints for copy dispatches.
    pub fn hints() -> Hints {
        Hints::new(Self::SPLIT_AXIS).with_min_workload(Self::MIN_WORKLOAD)
    }

    pub(crate) fn run(
        &self,
        window: &Window,
        _worker: &WorkerContext,
        arena: &TensorArena,
        io: &KernelIo<'_>,
    ) -> Result<()> {
        let src_desc = arena.get(self.src);
        let dst_desc = arena.get(self.dst);
        let src_buf = io.get(self.src)?;
        let dst_buf = io.get(self.dst)?;
        let elem = src_desc.element_size();
        let shape_x = src_desc.tensor_shape().extent(0) as isize;
        let dim0 = window.dimension(0);

        for_each_row(window, |row| {
            let dst_base = match row_target(dst_desc, row) {
                RowTarget::Write(offset) => offset,
                RowTarget::Discard => return Ok(()),
            };
            let src_base = match src_desc.offset_element_in_bytes(row) {
                Ok(offset) => offset,
                Err(_) => return Ok(()),
            };
            let count = (dim0.end().min(shape_x) - dim0.start()).max(0) as usize;
            // Safety: src and dst are distinct tensors, and rows of
            // disjoint sub-windows never share bytes.
            let src_bytes = unsafe { src_buf.bytes(src_base, count * elem) };
            let dst_bytes = unsafe { dst_buf.bytes_mut(dst_base, count * elem) };
            dst_bytes.copy_from_slice(src_bytes);
            Ok(())
        })
    }
}
