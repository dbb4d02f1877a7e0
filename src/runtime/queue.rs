//! Command-queue scheduling for GPU-style backends
//!
//! On the GPU side a window is not fanned out across threads: each
//! partition becomes one `enqueue` against a single in-order command queue,
//! and the device's own hardware scheduler supplies the fine-grained
//! parallelism inside each enqueue. This layer only guarantees submission
//! order and a drain point; device-side execution is opaque to it.
//!
//! Real device queues (OpenCL, GLES) live behind [`CommandQueue`] in the
//! backend crates; [`InlineQueue`] and [`RecordingQueue`] are the
//! in-process implementations used for tests and reference runs.

use super::scheduler::{partition, DispatchFn, Hints, Scheduler, WorkerContext};
use crate::error::Result;
use crate::window::Window;
use parking_lot::Mutex;
use tracing::trace;

/// A single in-order command queue
///
/// Enqueues are submitted in order and may execute asynchronously;
/// [`CommandQueue::flush`] blocks until everything submitted has executed.
pub trait CommandQueue: Send + Sync {
    /// Submit one partition for in-order execution.
    fn enqueue(
        &self,
        window: &Window,
        ctx: &WorkerContext,
        dispatch: DispatchFn<'_>,
    ) -> Result<()>;

    /// Block until every submitted partition has executed.
    fn flush(&self) -> Result<()>;
}

/// Queue that executes each enqueue immediately on the calling thread
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineQueue;

impl InlineQueue {
    /// Create an inline queue.
    pub fn new() -> Self {
        Self
    }
}

impl CommandQueue for InlineQueue {
    fn enqueue(
        &self,
        window: &Window,
        ctx: &WorkerContext,
        dispatch: DispatchFn<'_>,
    ) -> Result<()> {
        dispatch(window, ctx)
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Queue that executes immediately and records every submitted sub-window,
/// in submission order
#[derive(Debug, Default)]
pub struct RecordingQueue {
    submitted: Mutex<Vec<Window>>,
}

impl RecordingQueue {
    /// Create an empty recording queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sub-windows submitted so far, in order.
    pub fn submitted(&self) -> Vec<Window> {
        self.submitted.lock().clone()
    }
}

impl CommandQueue for RecordingQueue {
    fn enqueue(
        &self,
        window: &Window,
        ctx: &WorkerContext,
        dispatch: DispatchFn<'_>,
    ) -> Result<()> {
        self.submitted.lock().push(window.clone());
        dispatch(window, ctx)
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Scheduler that turns window partitions into ordered queue enqueues
///
/// `max_enqueues` bounds how many partitions one window is split into; the
/// queue is flushed before `schedule` returns, so the blocking contract
/// matches the CPU side.
pub struct QueueScheduler<Q> {
    queue: Q,
    max_enqueues: usize,
}

impl<Q: CommandQueue> QueueScheduler<Q> {
    /// Create a scheduler over `queue`, splitting windows into at most
    /// `max_enqueues` partitions.
    pub fn new(queue: Q, max_enqueues: usize) -> Self {
        Self {
            queue,
            max_enqueues: max_enqueues.max(1),
        }
    }

    /// The underlying queue.
    pub fn queue(&self) -> &Q {
        &self.queue
    }
}

impl<Q: CommandQueue> Scheduler for QueueScheduler<Q> {
    fn num_workers(&self) -> usize {
        self.max_enqueues
    }

    fn schedule(&self, window: &Window, hints: &Hints, dispatch: DispatchFn<'_>) -> Result<()> {
        let partitions = partition(window, hints, self.max_enqueues)?;
        let num_workers = partitions.len();
        trace!(num_workers, "enqueueing window partitions");
        for (worker_id, sub) in partitions.iter().enumerate() {
            self.queue.enqueue(
                sub,
                &WorkerContext {
                    worker_id,
                    num_workers,
                },
                dispatch,
            )?;
        }
        self.queue.flush()
    }
}
