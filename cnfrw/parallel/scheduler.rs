use std::num::NonZeroUsize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};
use tracing::{debug, error};

/// Unit of work run by a [`Scheduler`]. Any result or failure has to be
/// reported by the job itself.
pub trait Job: Send {
    fn run(self: Box<Self>);
}

impl<F: FnOnce() + Send> Job for F {
    fn run(self: Box<Self>) {
        (*self)();
    }
}

/// Number of scheduled jobs that have not completed yet.
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    done: Condvar,
}

impl Pending {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self) {
        *self.lock() += 1;
    }

    fn complete(&self) {
        let mut count = self.lock();
        *count -= 1;
        if *count == 0 {
            self.done.notify_all();
        }
    }
}

/// Fixed pool of worker threads draining a FIFO queue of jobs.
///
/// Jobs are independent: completion order across workers is unspecified.
/// [`Scheduler::wait`] blocks until every job scheduled so far has run, after
/// which the pool accepts new jobs again. Dropping the scheduler lets idle
/// workers exit.
pub struct Scheduler {
    queue: Sender<Box<dyn Job>>,
    pending: Arc<Pending>,
    workers: usize,
}

impl Scheduler {
    #[must_use]
    pub fn new(workers: NonZeroUsize) -> Self {
        let (queue, jobs) = unbounded::<Box<dyn Job>>();
        let pending = Arc::new(Pending::default());

        for worker in 0..workers.get() {
            let jobs = jobs.clone();
            let pending = Arc::clone(&pending);
            thread::spawn(move || work(worker, &jobs, &pending));
        }

        Scheduler {
            queue,
            pending,
            workers: workers.get(),
        }
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Enqueue a job without waiting for it.
    pub fn schedule(&self, job: impl Job + 'static) {
        self.pending.add();
        if self.queue.send(Box::new(job)).is_err() {
            // Only possible once every worker is gone.
            error!("no worker left to run the job");
            self.pending.complete();
        }
    }

    /// Block until every scheduled job has completed.
    pub fn wait(&self) {
        let mut count = self.pending.lock();
        while *count > 0 {
            count = self
                .pending
                .done
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

fn work(worker: usize, jobs: &Receiver<Box<dyn Job>>, pending: &Pending) {
    debug!(worker, "worker started");
    while let Ok(job) = jobs.recv() {
        if catch_unwind(AssertUnwindSafe(|| job.run())).is_err() {
            error!(worker, "job panicked");
        }
        pending.complete();
    }
    debug!(worker, "worker stopped");
}

#[cfg(test)]
mod test {
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::{Job, Scheduler};

    fn pool(n: usize) -> Scheduler {
        Scheduler::new(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn every_job_runs_exactly_once() {
        for n in [1, 2, 8] {
            for m in [0, 1, 50] {
                let scheduler = pool(n);
                let runs: Arc<Vec<AtomicUsize>> =
                    Arc::new((0..m).map(|_| AtomicUsize::new(0)).collect());
                for job in 0..m {
                    let runs = Arc::clone(&runs);
                    scheduler.schedule(move || {
                        runs[job].fetch_add(1, Ordering::SeqCst);
                    });
                }
                scheduler.wait();

                let counts: Vec<usize> = runs.iter().map(|r| r.load(Ordering::SeqCst)).collect();
                assert_eq!(counts, vec![1; m], "{n} workers, {m} jobs");
            }
        }
    }

    #[test]
    fn wait_covers_slow_jobs() {
        let scheduler = pool(2);
        let done = Arc::new(AtomicUsize::new(0));
        for delay in [30, 10, 20, 0] {
            let done = Arc::clone(&done);
            scheduler.schedule(move || {
                thread::sleep(Duration::from_millis(delay));
                done.fetch_add(1, Ordering::SeqCst);
            });
        }
        scheduler.wait();
        assert_eq!(done.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn reusable_after_wait() {
        let scheduler = pool(3);
        let done = Arc::new(AtomicUsize::new(0));
        for round in 1..=3 {
            for _ in 0..10 {
                let done = Arc::clone(&done);
                scheduler.schedule(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                });
            }
            scheduler.wait();
            assert_eq!(done.load(Ordering::SeqCst), round * 10);
        }
    }

    #[test]
    fn single_worker_keeps_fifo_order() {
        let scheduler = pool(1);
        let order = Arc::new(Mutex::new(Vec::new()));
        for job in 0..20 {
            let order = Arc::clone(&order);
            scheduler.schedule(move || order.lock().unwrap().push(job));
        }
        scheduler.wait();
        assert_eq!(*order.lock().unwrap(), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn panicking_job_is_contained() {
        let scheduler = pool(1);
        let done = Arc::new(AtomicUsize::new(0));
        scheduler.schedule(|| panic!("job failure"));
        let counter = Arc::clone(&done);
        scheduler.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.wait();
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    struct Record {
        slot: Arc<Mutex<Option<String>>>,
        name: String,
    }

    impl Job for Record {
        fn run(self: Box<Self>) {
            *self.slot.lock().unwrap() = Some(self.name);
        }
    }

    #[test]
    fn struct_jobs() {
        let scheduler = pool(2);
        let slot = Arc::new(Mutex::new(None));
        scheduler.schedule(Record {
            slot: Arc::clone(&slot),
            name: "benchmark-01".to_owned(),
        });
        scheduler.wait();
        assert_eq!(slot.lock().unwrap().as_deref(), Some("benchmark-01"));
    }
}
