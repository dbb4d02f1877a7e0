//! # corten
//!
//! **Tensor metadata, execution windows, and window scheduling for compute kernels.**
//!
//! corten is the infrastructure layer that per-microarchitecture numeric
//! kernels (convolution, pooling, GEMM, elementwise) are built on top of:
//!
//! - **Tensor metadata**: shape, byte strides, padding, valid region, and
//!   zero-copy sub-tensor views sharing a parent descriptor's storage
//! - **Execution windows**: the n-dimensional iteration space every kernel
//!   runs over, with slicing, collapsing, and sub-window validation
//! - **Scheduling**: partitioning a window across CPU worker threads or
//!   ordered command-queue enqueues, with no gaps, overlaps, or data races
//!
//! The numeric kernel bodies themselves (SIMD/assembly math loops) are out of
//! scope; the two kernels shipped here (`Fill`, `Copy`) exist to exercise the
//! full configure/partition/run pipeline.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use corten::prelude::*;
//!
//! let mut arena = TensorArena::new();
//! let out = arena.alloc(TensorDescriptor::new([16, 16], DataType::F32));
//!
//! let kernel: KernelOp = FillKernel::configure(&arena, out, vec![0; 4])?.into();
//! let mut buffer = TensorBuffer::allocate(&arena, out);
//!
//! let ctx = ExecutionContext::with_threads(4)?;
//! let mut io = KernelIo::new();
//! io.bind(out, &mut buffer);
//! ctx.run(&kernel, &arena, &io)?;
//! ```
//!
//! ## Conventions
//!
//! Axis 0 is the **innermost** (fastest-varying) axis, crate-wide. Padding is
//! only meaningful on the two innermost axes. Strides are in **bytes**.
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded CPU scheduler backed by a fixed-size
//!   `rayon::ThreadPool`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod helpers;
pub mod kernel;
pub mod runtime;
pub mod tensor;
pub mod window;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DataLayout, DataType, QuantizationInfo};
    pub use crate::error::{Error, Result, Status};
    pub use crate::kernel::{CopyKernel, FillKernel, KernelIo, KernelOp, TensorBuffer};
    pub use crate::runtime::{ExecutionContext, Hints, Scheduler, WorkerContext};
    pub use crate::tensor::{
        Coordinates, PaddingSize, SubTensorView, TensorArena, TensorDescriptor, TensorHandle,
        TensorShape, ValidRegion,
    };
    pub use crate::window::{Steps, Window, WindowDimension};

    #[cfg(feature = "rayon")]
    pub use crate::runtime::cpu::CpuScheduler;
}
