//! Cancellable delayed execution on a worker pool.
//!
//! A `Scheduler` runs each callback at most once, no earlier than its delay.
//! `cancel_all` aborts every callback that has not started yet and leaves the
//! facade exhausted: it refuses further work until replaced by `fresh()`.
//! A callback that is already running is never interrupted. Dropping a
//! scheduler aborts whatever it still holds.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::{sleep_until, Instant};

use crate::SchedulerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Active,
    Exhausted,
}

/// Handle to one scheduled callback
#[derive(Debug)]
pub struct ScheduledTask {
    abort: AbortHandle,
    pub due: Instant,
}

impl ScheduledTask {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

pub struct Scheduler {
    handle: Handle,
    tasks: JoinSet<()>,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: JoinSet::new(),
            state: SchedulerState::Active,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == SchedulerState::Exhausted
    }

    /// Callbacks still waiting or running
    pub fn pending(&mut self) -> usize {
        self.reap();
        self.tasks.len()
    }

    pub fn schedule_after<F>(&mut self, delay: Duration, f: F) -> Result<ScheduledTask, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_exhausted() {
            tracing::error!(?delay, "schedule on exhausted scheduler");
            return Err(SchedulerError::Exhausted);
        }
        self.reap();

        // Deadline is fixed here, not when the task is first polled.
        let due = Instant::now() + delay;
        let abort = self.tasks.spawn_on(
            async move {
                sleep_until(due).await;
                f();
            },
            &self.handle,
        );
        Ok(ScheduledTask { abort, due })
    }

    /// Aborts everything not yet started and exhausts the facade.
    pub fn cancel_all(&mut self) {
        let outstanding = self.tasks.len();
        self.tasks.abort_all();
        self.state = SchedulerState::Exhausted;
        tracing::debug!(outstanding, "scheduler cancelled");
    }

    /// Replacement facade on the same worker pool
    pub fn fresh(&self) -> Scheduler {
        Scheduler::new(self.handle.clone())
    }

    fn reap(&mut self) {
        while let Some(res) = self.tasks.try_join_next() {
            if let Err(e) = res {
                if e.is_panic() {
                    tracing::error!("scheduled callback panicked: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let make = move || -> Box<dyn FnOnce() + Send> {
            let h = h.clone();
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            })
        };
        (hits, make)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_once_after_delay() {
        let (hits, make) = counter();
        let mut s = Scheduler::new(Handle::current());
        s.schedule_after(Duration::from_millis(700), make()).unwrap();

        tokio::time::sleep(Duration::from_millis(699)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(s.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_drops_pending_and_exhausts() {
        let (hits, make) = counter();
        let mut s = Scheduler::new(Handle::current());
        s.schedule_after(Duration::from_millis(10), make()).unwrap();
        s.schedule_after(Duration::from_millis(20), make()).unwrap();
        s.cancel_all();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(s.state(), SchedulerState::Exhausted);
        assert!(matches!(
            s.schedule_after(Duration::from_millis(1), make()),
            Err(SchedulerError::Exhausted)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_scheduler_accepts_work() {
        let (hits, make) = counter();
        let mut s = Scheduler::new(Handle::current());
        s.cancel_all();
        let mut s = s.fresh();
        assert_eq!(s.state(), SchedulerState::Active);
        s.schedule_after(Duration::from_millis(5), make()).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn single_task_cancel() {
        let (hits, make) = counter();
        let mut s = Scheduler::new(Handle::current());
        let first = s.schedule_after(Duration::from_millis(5), make()).unwrap();
        s.schedule_after(Duration::from_millis(5), make()).unwrap();
        first.cancel();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(first.is_finished());
        assert_eq!(s.state(), SchedulerState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels() {
        let (hits, make) = counter();
        let mut s = Scheduler::new(Handle::current());
        s.schedule_after(Duration::from_millis(5), make()).unwrap();
        drop(s);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
