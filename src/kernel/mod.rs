//! Kernel operations and the buffers they run against
//!
//! A kernel is configured once against descriptors in a [`TensorArena`]
//! (computing its maximum execution window), then run many times over
//! sub-windows handed out by a scheduler. The closed [`KernelOp`] enum is
//! the dispatch surface: a `KernelOp` only exists after a successful
//! `configure`, so "run before configure" is unrepresentable.
//!
//! Element storage lives in [`TensorBuffer`]s, bound to descriptor handles
//! through a [`KernelIo`] at dispatch time. Workers address disjoint rows of
//! the same buffer concurrently; the disjointness comes from the window
//! partitioner, not from locks.

mod copy;
mod fill;

pub use copy::CopyKernel;
pub use fill::FillKernel;

use crate::error::{Error, Result};
use crate::runtime::{Hints, WorkerContext};
use crate::tensor::{Coordinates, TensorArena, TensorDescriptor, TensorHandle};
use crate::window::{Window, WindowDimension};
use std::collections::HashMap;
use std::marker::PhantomData;

/// Byte storage for one tensor, sized from its descriptor
///
/// The buffer covers the descriptor's full allocation, padding included,
/// and is zero-initialized.
#[derive(Debug)]
pub struct TensorBuffer {
    handle: TensorHandle,
    data: Vec<u8>,
}

impl TensorBuffer {
    /// Allocate zeroed storage matching `handle`'s descriptor.
    ///
    /// The descriptor must be configured at this point: allocating against
    /// an empty descriptor yields a zero-length buffer that no kernel can
    /// address.
    pub fn allocate(arena: &TensorArena, handle: TensorHandle) -> Self {
        Self {
            handle,
            data: vec![0; arena.get(handle).total_size()],
        }
    }

    /// Handle of the descriptor this buffer was sized from.
    pub fn handle(&self) -> TensorHandle {
        self.handle
    }

    /// Allocation size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the allocation is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The raw bytes, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Raw view of a bound buffer, shareable across workers
///
/// Safety: workers hand out disjoint sub-windows, and every access goes
/// through byte ranges derived from a sub-window's coordinates, so no two
/// workers touch the same bytes. The pointer stays valid for the lifetime
/// of the [`KernelIo`] that produced it, which mutably borrows the buffer.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SharedBuffer {
    ptr: *mut u8,
    len: usize,
}

unsafe impl Send for SharedBuffer {}
unsafe impl Sync for SharedBuffer {}

impl SharedBuffer {
    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Safety
    /// The range must not be written by any other worker for the duration
    /// of the borrow.
    pub(crate) unsafe fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        assert!(offset + len <= self.len, "buffer access out of bounds");
        std::slice::from_raw_parts(self.ptr.add(offset), len)
    }

    /// Mutably borrow `len` bytes starting at `offset`.
    ///
    /// # Safety
    /// The range must not be accessed by any other worker for the duration
    /// of the borrow.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn bytes_mut(&self, offset: usize, len: usize) -> &mut [u8] {
        assert!(offset + len <= self.len, "buffer access out of bounds");
        std::slice::from_raw_parts_mut(self.ptr.add(offset), len)
    }
}

/// Binding of descriptor handles to tensor buffers for one dispatch
///
/// Each bound buffer is mutably borrowed for the binding's lifetime, so the
/// buffers cannot be touched elsewhere while kernels run against them.
#[derive(Debug, Default)]
pub struct KernelIo<'a> {
    bindings: HashMap<usize, SharedBuffer>,
    _buffers: PhantomData<&'a mut [u8]>,
}

impl<'a> KernelIo<'a> {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            _buffers: PhantomData,
        }
    }

    /// Bind `buffer` as the storage for `handle`. Rebinding a handle
    /// replaces the previous binding.
    pub fn bind(&mut self, handle: TensorHandle, buffer: &'a mut TensorBuffer) {
        self.bindings.insert(
            handle.index(),
            SharedBuffer {
                ptr: buffer.data.as_mut_ptr(),
                len: buffer.data.len(),
            },
        );
    }

    /// The buffer bound to `handle`, or `UnboundTensor`.
    pub(crate) fn get(&self, handle: TensorHandle) -> Result<SharedBuffer> {
        self.bindings
            .get(&handle.index())
            .copied()
            .ok_or(Error::UnboundTensor {
                id: handle.index(),
            })
    }
}

/// Where one row of kernel output goes
///
/// A stepped window's end is rounded up past the tensor shape, so the last
/// iterations of an axis can fall outside the allocation. Rows resolving
/// outside the shape are discarded instead of redirected into scratch
/// storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowTarget {
    /// Byte offset of the row's first element inside the bound buffer
    Write(usize),
    /// Row lies outside the tensor shape; produced values are dropped
    Discard,
}

/// Resolve the target for the row at `coords` (axis 0 gives the row's
/// first x position).
pub(crate) fn row_target(descriptor: &TensorDescriptor, coords: &Coordinates) -> RowTarget {
    match descriptor.offset_element_in_bytes(coords) {
        Ok(offset) => RowTarget::Write(offset),
        Err(_) => RowTarget::Discard,
    }
}

/// Visit every row of `window`: axis 0 is pinned to its start, the
/// remaining axes iterate as usual. Stops at the first error.
pub(crate) fn for_each_row<F>(window: &Window, mut f: F) -> Result<()>
where
    F: FnMut(&Coordinates) -> Result<()>,
{
    let dim0 = window.dimension(0);
    let mut rows = window.clone();
    rows.set(0, WindowDimension::new(dim0.start(), dim0.start() + 1, 1));

    let mut result = Ok(());
    crate::window::execute_window_loop(&rows, |coords| {
        if result.is_ok() {
            result = f(coords);
        }
    });
    result
}

/// A configured kernel, ready to run over sub-windows
///
/// Closed enum rather than a trait object: the set of kernels is known to
/// the crate, dispatch is a match, and every variant is constructed only by
/// its kernel's `configure`.
#[derive(Clone, Debug)]
pub enum KernelOp {
    /// Fill a tensor with one element value
    Fill(FillKernel),
    /// Copy one tensor into another of the same shape and type
    Copy(CopyKernel),
}

impl KernelOp {
    /// Kernel name, for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fill(_) => "fill",
            Self::Copy(_) => "copy",
        }
    }

    /// The maximum execution window computed at configure time.
    pub fn window(&self) -> &Window {
        match self {
            Self::Fill(k) => k.window(),
            Self::Copy(k) => k.window(),
        }
    }

    /// Scheduling hints for this kernel.
    pub fn hints(&self) -> Hints {
        match self {
            Self::Fill(_) => FillKernel::hints(),
            Self::Copy(_) => CopyKernel::hints(),
        }
    }

    /// Run over `window`, which must be contained in the configured window
    /// with identical steps.
    pub fn run(
        &self,
        window: &Window,
        worker: &WorkerContext,
        arena: &TensorArena,
        io: &KernelIo<'_>,
    ) -> Result<()> {
        Window::validate_subwindow(self.window(), window)?;
        match self {
            Self::Fill(k) => k.run(window, worker, arena, io),
            Self::Copy(k) => k.run(window, worker, arena, io),
        }
    }
}

impl From<FillKernel> for KernelOp {
    fn from(kernel: FillKernel) -> Self {
        Self::Fill(kernel)
    }
}

impl From<CopyKernel> for KernelOp {
    fn from(kernel: CopyKernel) -> Self {
        Self::Copy(kernel)
    }
}
