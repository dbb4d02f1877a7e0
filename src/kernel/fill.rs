//! Fill kernel: writes one element value across a tensor

use super::{for_each_row, row_target, KernelIo, RowTarget};
use crate::error::{Error, Result, Status};
use crate::runtime::{Hints, WorkerContext};
use crate::tensor::{TensorArena, TensorDescriptor, TensorHandle};
use crate::window::{Steps, Window};

/// Fills every element of its output tensor with a fixed value
///
/// The value is given as raw bytes matching the output's element size, so
/// one kernel covers every data type. Padding bytes are never written.
#[derive(Clone, Debug)]
pub struct FillKernel {
    out: TensorHandle,
    value: Vec<u8>,
    window: Window,
}

impl FillKernel {
    // Rows along the split axis one worker should get at minimum; filling a
    // row is cheap, so fan-out only pays off past a few rows per worker.
    const MIN_WORKLOAD: usize = 4;
    const SPLIT_AXIS: usize = 1;

    /// Check that `descriptor` can be filled with `value` without
    /// configuring anything.
    pub fn validate(descriptor: &TensorDescriptor, value: &[u8]) -> Status {
        if descriptor.total_size() == 0 {
            return Err(Error::EmptyDescriptor {
                op: "configure fill",
            });
        }
        if value.len() != descriptor.element_size() {
            return Err(Error::InvalidArgument {
                arg: "value",
                reason: format!(
                    "{} bytes given, element size is {}",
                    value.len(),
                    descriptor.element_size()
                ),
            });
        }
        Ok(())
    }

    /// Configure a fill over `out`'s full valid region, one element per
    /// iteration.
    pub fn configure(arena: &TensorArena, out: TensorHandle, value: Vec<u8>) -> Result<Self> {
        Self::configure_with_steps(arena, out, value, &Steps::new())
    }

    /// Configure a fill with explicit per-axis steps.
    ///
    /// A step above 1 on axis 0 rounds the window end past the shape;
    /// `run` clips the trailing iteration to the shape.
    pub fn configure_with_steps(
        arena: &TensorArena,
        out: TensorHandle,
        value: Vec<u8>,
        steps: &Steps,
    ) -> Result<Self> {
        let descriptor = arena.get(out);
        Self::validate(descriptor, &value)?;
        let window = Window::calculate_max_window(descriptor, steps)?;
        Ok(Self { out, value, window })
    }

    /// The configured execution window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Scheduling hints for fill dispatches.
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
        let descriptor = arena.get(self.out);
        let buffer = io.get(self.out)?;
        let elem = descriptor.element_size();
        let shape_x = descriptor.tensor_shape().extent(0) as isize;
        let dim0 = window.dimension(0);

        for_each_row(window, |row| {
            let base = match row_target(descriptor, row) {
                RowTarget::Write(offset) => offset,
                RowTarget::Discard => return Ok(()),
            };
            // Clip the (possibly step-rounded) row end to the shape.
            let count = (dim0.end().min(shape_x) - dim0.start()).max(0) as usize;
            // Safety: rows of disjoint sub-windows never share bytes.
            let dst = unsafe { buffer.bytes_mut(base, count * elem) };
            for element in dst.chunks_exact_mut(elem) {
                element.copy_from_slice(&self.value);
            }
            Ok(())
        })
    }
}
