//! Schedulers and execution contexts
//!
//! The scheduler owns the one hard concurrency problem in this crate:
//! carving a kernel's window into disjoint partitions and dispatching them
//! across workers without data races. Two worker models are provided:
//!
//! - CPU: a fixed-size thread pool; `schedule` blocks until every partition
//!   has completed ([`cpu::CpuScheduler`], behind the `rayon` feature)
//! - GPU-style: a single in-order command queue; each partition becomes one
//!   ordered enqueue, drained by an explicit flush ([`QueueScheduler`])
//!
//! [`ExecutionContext`] gives scheduler state an explicit lifecycle:
//! constructed once at startup, passed to every operator, and reconfigured
//! only between runs (enforced by `&mut self`).

mod context;
#[cfg(feature = "rayon")]
pub mod cpu;
mod queue;
mod scheduler;

pub use context::ExecutionContext;
pub use queue::{CommandQueue, InlineQueue, QueueScheduler, RecordingQueue};
pub use scheduler::{
    effective_workers, DispatchFn, Hints, Scheduler, SingleThreadScheduler, WorkerContext,
};
