//! Integration tests for window partitioning and the scheduler backends.

use corten::prelude::*;
use corten::runtime::{InlineQueue, QueueScheduler, RecordingQueue, SingleThreadScheduler};
use std::sync::atomic::{AtomicUsize, Ordering};

fn window_2d(x: usize, y: usize) -> Window {
    let mut window = Window::new();
    window.set(0, WindowDimension::new(0, x as isize, 1));
    window.set(1, WindowDimension::new(0, y as isize, 1));
    window
}

#[test]
fn test_single_thread_scheduler_visits_whole_window() {
    let window = window_2d(16, 8);
    let scheduler = SingleThreadScheduler::new();
    let iterations = AtomicUsize::new(0);

    scheduler
        .schedule(&window, &Hints::new(1), &|sub, ctx| {
            assert_eq!(ctx.num_workers, 1);
            iterations.fetch_add(sub.num_iterations_total(), Ordering::Relaxed);
            Ok(())
        })
        .unwrap();

    assert_eq!(iterations.load(Ordering::Relaxed), 16 * 8);
}

#[test]
fn test_queue_scheduler_preserves_submission_order() {
    let scheduler = QueueScheduler::new(RecordingQueue::new(), 4);
    scheduler
        .schedule(&window_2d(16, 100), &Hints::new(1), &|_, _| Ok(()))
        .unwrap();

    let submitted = scheduler.queue().submitted();
    assert_eq!(submitted.len(), 4);
    let starts: Vec<_> = submitted.iter().map(|w| w.dimension(1).start()).collect();
    assert_eq!(starts, [0, 25, 50, 75]);
    // Untouched axes carried through to every enqueue.
    assert!(submitted.iter().all(|w| w.extent(0) == 16));
}

#[test]
fn test_queue_scheduler_propagates_dispatch_errors() {
    let scheduler = QueueScheduler::new(InlineQueue::new(), 4);
    let result = scheduler.schedule(&window_2d(4, 40), &Hints::new(1), &|sub, _| {
        if sub.dimension(1).start() >= 20 {
            Err(Error::Scheduler("device lost".into()))
        } else {
            Ok(())
        }
    });
    assert!(matches!(result, Err(Error::Scheduler(_))));
}

#[cfg(feature = "rayon")]
mod cpu {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_cpu_scheduler_covers_rows_exactly_once() {
        let scheduler = CpuScheduler::new(4).unwrap();
        let window = window_2d(8, 64);
        let row_visits: Vec<AtomicUsize> = (0..64).map(|_| AtomicUsize::new(0)).collect();

        scheduler
            .schedule(&window, &Hints::new(1), &|sub, _| {
                let dim = sub.dimension(1);
                for row in dim.start()..dim.end() {
                    row_visits[row as usize].fetch_add(1, Ordering::Relaxed);
                }
                Ok(())
            })
            .unwrap();

        assert!(row_visits
            .iter()
            .all(|visits| visits.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_min_workload_limits_fan_out() {
        let scheduler = CpuScheduler::new(8).unwrap();

        // Plenty of work: all workers participate.
        let wide = window_2d(4, 100);
        let workers = Mutex::new(std::collections::HashSet::new());
        scheduler
            .schedule(&wide, &Hints::new(1).with_min_workload(8), &|_, ctx| {
                workers.lock().unwrap().insert(ctx.worker_id);
                Ok(())
            })
            .unwrap();
        assert_eq!(workers.into_inner().unwrap().len(), 8);

        // Too little work for the requested floor: one worker.
        let narrow = window_2d(4, 10);
        let count = AtomicUsize::new(0);
        scheduler
            .schedule(&narrow, &Hints::new(1).with_min_workload(8), &|_, ctx| {
                assert_eq!(ctx.num_workers, 1);
                count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_context_scheduler_swap() {
        let mut ctx = ExecutionContext::single_threaded();
        assert_eq!(ctx.num_workers(), 1);
        ctx.set_scheduler(Box::new(CpuScheduler::new(3).unwrap()));
        assert_eq!(ctx.num_workers(), 3);
    }
}
