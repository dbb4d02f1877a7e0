//! Execution context tying kernels to a scheduler

use super::scheduler::{Scheduler, SingleThreadScheduler};
use crate::error::Result;
use crate::kernel::{KernelIo, KernelOp};
use crate::tensor::TensorArena;
use tracing::debug;

/// Owns the scheduler used to run kernels
///
/// Constructed once at startup and passed by reference to every run.
/// Swapping the scheduler takes `&mut self`, so it cannot happen while a
/// shared borrow is mid-dispatch; reconfiguration is a between-runs
/// operation by construction.
pub struct ExecutionContext {
    scheduler: Box<dyn Scheduler>,
}

impl ExecutionContext {
    /// Context running everything on the calling thread.
    pub fn single_threaded() -> Self {
        Self {
            scheduler: Box::new(SingleThreadScheduler::new()),
        }
    }

    /// Context over an explicit scheduler.
    pub fn new(scheduler: Box<dyn Scheduler>) -> Self {
        Self { scheduler }
    }

    /// Context over a CPU thread pool with `num_threads` workers; 0 selects
    /// one worker per available CPU.
    #[cfg(feature = "rayon")]
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Ok(Self {
            scheduler: Box::new(super::cpu::CpuScheduler::new(num_threads)?),
        })
    }

    /// Number of workers the current scheduler can run in parallel.
    pub fn num_workers(&self) -> usize {
        self.scheduler.num_workers()
    }

    /// Replace the scheduler.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        debug!(
            num_workers = scheduler.num_workers(),
            "execution context rescheduled"
        );
        self.scheduler = scheduler;
    }

    /// Run a configured kernel over its full execution window.
    ///
    /// The window is split per the kernel's hints; each partition runs on
    /// one worker. Blocks until every partition has completed and returns
    /// the first partition error, if any.
    pub fn run(&self, op: &KernelOp, arena: &TensorArena, io: &KernelIo) -> Result<()> {
        debug!(kernel = op.name(), "running kernel");
        self.scheduler
            .schedule(op.window(), &op.hints(), &|sub, worker| {
                op.run(sub, worker, arena, io)
            })
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("num_workers", &self.scheduler.num_workers())
            .finish()
    }
}
