//! CPU scheduler backed by a fixed-size thread pool

use super::scheduler::{partition, DispatchFn, Hints, Scheduler, WorkerContext};
use crate::error::{Error, Result};
use crate::window::Window;
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Multi-threaded CPU scheduler
///
/// Wraps a fixed-size `rayon::ThreadPool`. `schedule` submits one task per
/// partition and blocks until the scope joins, so by the time it returns
/// every partition has run. The pool size is fixed at construction; to
/// change the worker count, build a new scheduler between runs (see
/// [`crate::runtime::ExecutionContext`]).
pub struct CpuScheduler {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl CpuScheduler {
    /// Create a scheduler with `num_threads` workers; 0 selects one worker
    /// per available CPU.
    pub fn new(num_threads: usize) -> Result<Self> {
        let num_threads = if num_threads == 0 {
            num_cpus::get().max(1)
        } else {
            num_threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("corten-worker-{index}"))
            .build()
            .map_err(|e| Error::Scheduler(e.to_string()))?;
        debug!(num_threads, "cpu scheduler created");
        Ok(Self { pool, num_threads })
    }

    /// Create a scheduler with one worker per available CPU.
    pub fn with_default_threads() -> Result<Self> {
        Self::new(0)
    }
}

impl Scheduler for CpuScheduler {
    fn num_workers(&self) -> usize {
        self.num_threads
    }

    fn schedule(&self, window: &Window, hints: &Hints, dispatch: DispatchFn<'_>) -> Result<()> {
        let partitions = partition(window, hints, self.num_threads)?;
        let num_workers = partitions.len();
        trace!(
            num_workers,
            split_axis = hints.split_axis,
            "dispatching window"
        );

        if num_workers == 1 {
            return dispatch(
                &partitions[0],
                &WorkerContext {
                    worker_id: 0,
                    num_workers: 1,
                },
            );
        }

        let first_error: Mutex<Option<Error>> = Mutex::new(None);
        self.pool.install(|| {
            rayon::scope(|scope| {
                for (worker_id, sub) in partitions.iter().enumerate() {
                    let first_error = &first_error;
                    scope.spawn(move |_| {
                        let ctx = WorkerContext {
                            worker_id,
                            num_workers,
                        };
                        if let Err(e) = dispatch(sub, &ctx) {
                            let mut slot = first_error.lock();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                        }
                    });
                }
            });
        });

        match first_error.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for CpuScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuScheduler")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowDimension;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    fn window_1d(extent: usize) -> Window {
        let mut window = Window::new();
        window.set(0, WindowDimension::new(0, extent as isize, 1));
        window
    }

    #[test]
    fn test_schedule_covers_extent_exactly_once() {
        let scheduler = CpuScheduler::new(4).unwrap();
        let window = window_1d(100);
        let visited = StdMutex::new(HashSet::new());

        scheduler
            .schedule(&window, &Hints::new(0), &|sub, _| {
                let dim = sub.dimension(0);
                let mut set = visited.lock().unwrap();
                for position in dim.start()..dim.end() {
                    assert!(set.insert(position), "position {position} visited twice");
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(visited.into_inner().unwrap().len(), 100);
    }

    #[test]
    fn test_schedule_blocks_until_done() {
        let scheduler = CpuScheduler::new(4).unwrap();
        let window = window_1d(64);
        let counter = AtomicUsize::new(0);

        scheduler
            .schedule(&window, &Hints::new(0).with_min_workload(16), &|sub, _| {
                counter.fetch_add(sub.extent(0), Ordering::Relaxed);
                Ok(())
            })
            .unwrap();

        // All work observed after schedule returns.
        assert_eq!(counter.load(Ordering::Relaxed), 64);
    }

    #[test]
    fn test_schedule_reports_first_error() {
        let scheduler = CpuScheduler::new(2).unwrap();
        let window = window_1d(32);

        let result = scheduler.schedule(&window, &Hints::new(0), &|sub, _| {
            if sub.dimension(0).start() == 0 {
                Err(Error::Scheduler("boom".into()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_worker_context_ids_are_distinct() {
        let scheduler = CpuScheduler::new(4).unwrap();
        let window = window_1d(64);
        let ids = StdMutex::new(HashSet::new());

        scheduler
            .schedule(&window, &Hints::new(0), &|_, ctx| {
                assert!(ctx.worker_id < ctx.num_workers);
                ids.lock().unwrap().insert(ctx.worker_id);
                Ok(())
            })
            .unwrap();

        assert_eq!(ids.into_inner().unwrap().len(), 4);
    }
}
