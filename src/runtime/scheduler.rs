//! Window partitioning and the scheduler contract

use crate::error::{Error, Result};
use crate::window::Window;

/// Scheduling hints a kernel hands to the scheduler
///
/// `min_workload` is the smallest number of elements along the split axis
/// worth giving one worker; it bounds fan-out so a dimension is never split
/// so finely that per-worker overhead dominates. The right value is kernel-
/// and platform-specific, so each kernel kind supplies its own constant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hints {
    /// Axis along which the window is split across workers
    pub split_axis: usize,
    /// Minimum elements along the split axis per worker
    pub min_workload: usize,
}

impl Hints {
    /// Hints splitting along `split_axis` with no workload floor.
    pub fn new(split_axis: usize) -> Self {
        Self {
            split_axis,
            min_workload: 1,
        }
    }

    /// Set the minimum per-worker workload.
    pub fn with_min_workload(mut self, min_workload: usize) -> Self {
        self.min_workload = min_workload;
        self
    }
}

/// Identity of one worker within a dispatch
///
/// Passed to every per-partition invocation; kernels that stage per-worker
/// scratch space index it by `worker_id`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerContext {
    /// Index of this worker in `[0, num_workers)`
    pub worker_id: usize,
    /// Number of workers participating in this dispatch
    pub num_workers: usize,
}

/// The per-partition entry point handed to [`Scheduler::schedule`]
///
/// Must be callable concurrently: partitions are disjoint by construction,
/// so implementations need no locking as long as they only touch the
/// coordinates of the sub-window they are given.
pub type DispatchFn<'a> = &'a (dyn Fn(&Window, &WorkerContext) -> Result<()> + Sync);

/// Partitions a window across workers and dispatches each partition
pub trait Scheduler: Send + Sync {
    /// Number of workers this scheduler can run in parallel.
    fn num_workers(&self) -> usize;

    /// Split `window` along `hints.split_axis` and invoke `dispatch` once
    /// per partition. Blocks until every partition has completed; the first
    /// partition error, if any, is returned.
    fn schedule(&self, window: &Window, hints: &Hints, dispatch: DispatchFn<'_>) -> Result<()>;
}

/// Number of workers actually used for a given extent:
/// `min(worker_count, max(1, extent / min_workload))`.
pub fn effective_workers(extent: usize, worker_count: usize, min_workload: usize) -> usize {
    let by_workload = (extent / min_workload.max(1)).max(1);
    worker_count.clamp(1, by_workload)
}

/// Split `window` into the sub-windows one dispatch will run.
///
/// The union of the returned windows covers `window` exactly once along the
/// split axis; every other axis is carried through untouched.
pub(crate) fn partition(
    window: &Window,
    hints: &Hints,
    worker_count: usize,
) -> Result<Vec<Window>> {
    window.validate()?;
    if hints.split_axis >= crate::tensor::MAX_DIMS {
        return Err(Error::window(format!(
            "split axis {} out of range",
            hints.split_axis
        )));
    }

    let extent = window.extent(hints.split_axis);
    let workers = effective_workers(extent, worker_count, hints.min_workload)
        .min(window.num_iterations(hints.split_axis).max(1));

    Ok((0..workers)
        .map(|id| window.split(hints.split_axis, id, workers))
        .collect())
}

/// Sequential reference scheduler: runs every partition on the calling
/// thread, in order
///
/// Used for tests and as the fallback when no thread pool is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleThreadScheduler;

impl SingleThreadScheduler {
    /// Create a single-threaded scheduler.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for SingleThreadScheduler {
    fn num_workers(&self) -> usize {
        1
    }

    fn schedule(&self, window: &Window, hints: &Hints, dispatch: DispatchFn<'_>) -> Result<()> {
        let partitions = partition(window, hints, 1)?;
        let num_workers = partitions.len();
        for (worker_id, sub) in partitions.iter().enumerate() {
            dispatch(
                sub,
                &WorkerContext {
                    worker_id,
                    num_workers,
                },
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowDimension;

    fn window_1d(extent: usize) -> Window {
        let mut window = Window::new();
        window.set(0, WindowDimension::new(0, extent as isize, 1));
        window
    }

    #[test]
    fn test_effective_workers_caps_by_workload() {
        // Scenario A: plenty of work for 4 workers.
        assert_eq!(effective_workers(100, 4, 8), 4);
        // Scenario B: 10 < 4 * 8, fall back to one worker.
        assert_eq!(effective_workers(10, 4, 8), 1);
        assert_eq!(effective_workers(0, 4, 8), 1);
        assert_eq!(effective_workers(64, 4, 16), 4);
        assert_eq!(effective_workers(48, 4, 16), 3);
    }

    #[test]
    fn test_partition_scenario_a() {
        let window = window_1d(100);
        let parts = partition(&window, &Hints::new(0).with_min_workload(8), 4).unwrap();
        assert_eq!(parts.len(), 4);
        let starts: Vec<_> = parts.iter().map(|w| w.dimension(0).start()).collect();
        assert_eq!(starts, [0, 25, 50, 75]);
        assert!(parts.iter().all(|w| w.extent(0) == 25));
    }

    #[test]
    fn test_partition_scenario_b() {
        let window = window_1d(10);
        let parts = partition(&window, &Hints::new(0).with_min_workload(8), 4).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].dimension(0), WindowDimension::new(0, 10, 1));
    }

    #[test]
    fn test_partition_never_exceeds_iterations() {
        let window = window_1d(3);
        let parts = partition(&window, &Hints::new(0), 8).unwrap();
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn test_partition_rejects_invalid_window() {
        let mut window = Window::new();
        window.set(0, WindowDimension::new(4, 0, 1));
        assert!(partition(&window, &Hints::new(0), 4).is_err());
    }

    // Partition exactness: the union of all sub-windows covers the original
    // extent exactly once, for every extent and worker count in 1..64.
    #[test]
    fn test_partition_exactness() {
        for extent in 1..64usize {
            for workers in 1..64usize {
                let window = window_1d(extent);
                let parts = partition(&window, &Hints::new(0), workers).unwrap();
                let mut covered = vec![0usize; extent];
                for part in &parts {
                    let dim = part.dimension(0);
                    assert!(dim.start() >= 0 && dim.end() <= extent as isize);
                    for position in dim.start()..dim.end() {
                        covered[position as usize] += 1;
                    }
                }
                assert!(
                    covered.iter().all(|&count| count == 1),
                    "gaps or overlaps for extent {extent}, workers {workers}"
                );
            }
        }
    }

    #[test]
    fn test_single_thread_scheduler_runs_all_partitions() {
        use std::sync::Mutex;
        let window = window_1d(10);
        let seen = Mutex::new(Vec::new());
        let scheduler = SingleThreadScheduler::new();
        scheduler
            .schedule(&window, &Hints::new(0), &|sub, ctx| {
                seen.lock()
                    .unwrap()
                    .push((sub.dimension(0).start(), ctx.worker_id));
                Ok(())
            })
            .unwrap();
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen, [(0, 0)]);
    }
}
