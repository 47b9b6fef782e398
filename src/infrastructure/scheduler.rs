//! Timer abstraction for the simulators and the mock stores.
//!
//! Everything time-driven goes through [`Scheduler`] so tests can run on
//! tokio's paused clock and advance virtual time deterministically.

use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
pub type TickFuture = Pin<Box<dyn Future<Output = TickControl> + Send + 'static>>;
pub type TickFn = Box<dyn FnMut(u64) -> TickFuture + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

#[async_trait]
pub trait Scheduler: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    async fn sleep(&self, duration: Duration);
    /// Fails when there is nothing to run the task on.
    fn spawn(&self, task: TaskFuture) -> Result<TimerHandle>;
}

/// Cancellable handle to a scheduled task.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Aborts the task. Pending ticks never run after this returns.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task to end, whether it completed or was cancelled.
    pub async fn wait(self) {
        if let Err(err) = self.task.await {
            if !err.is_cancelled() {
                tracing::error!(error = %err, "Scheduled task panicked");
            }
        }
    }
}

pub trait SchedulerExt {
    fn schedule_after(&self, delay: Duration, task: TaskFuture) -> Result<TimerHandle>;
    /// Runs `tick` every `period`, starting one period from now, until it
    /// returns [`TickControl::Stop`] or the handle is cancelled. The tick
    /// counter starts at 1.
    fn schedule_periodic(&self, period: Duration, tick: TickFn) -> Result<TimerHandle>;
}

impl SchedulerExt for Arc<dyn Scheduler> {
    fn schedule_after(&self, delay: Duration, task: TaskFuture) -> Result<TimerHandle> {
        let scheduler = Arc::clone(self);
        self.spawn(Box::pin(async move {
            scheduler.sleep(delay).await;
            task.await;
        }))
    }

    fn schedule_periodic(&self, period: Duration, mut tick: TickFn) -> Result<TimerHandle> {
        let scheduler = Arc::clone(self);
        self.spawn(Box::pin(async move {
            let mut count = 0u64;
            loop {
                scheduler.sleep(period).await;
                count += 1;
                if tick(count).await == TickControl::Stop {
                    break;
                }
            }
        }))
    }
}

/// Scheduler backed by the ambient tokio runtime.
#[derive(Debug, Default, Clone)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn shared() -> Arc<dyn Scheduler> {
        Arc::new(Self)
    }
}

#[async_trait]
impl Scheduler for TokioScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    fn spawn(&self, task: TaskFuture) -> Result<TimerHandle> {
        let runtime = Handle::try_current().map_err(|err| {
            AppError::Internal(format!("No async runtime to schedule on: {}", err))
        })?;
        Ok(TimerHandle::new(runtime.spawn(task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_schedule_after_fires_once_delay_elapsed() {
        let scheduler = TokioScheduler::shared();
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        let handle = scheduler.schedule_after(
            Duration::from_secs(2),
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        tokio::time::sleep(Duration::from_millis(1_999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        handle.wait().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_stops_when_tick_says_so() {
        let scheduler = TokioScheduler::shared();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let handle = scheduler.schedule_periodic(
            Duration::from_secs(2),
            Box::new(move |n| -> TickFuture {
                counter.store(n, Ordering::SeqCst);
                Box::pin(async move {
                    if n >= 3 {
                        TickControl::Stop
                    } else {
                        TickControl::Continue
                    }
                })
            }),
        )
        .unwrap();

        handle.wait().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_ticks() {
        let scheduler = TokioScheduler::shared();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let handle = scheduler.schedule_periodic(
            Duration::from_secs(2),
            Box::new(move |n| -> TickFuture {
                counter.store(n, Ordering::SeqCst);
                Box::pin(async { TickControl::Continue })
            }),
        )
        .unwrap();

        tokio::time::sleep(Duration::from_millis(4_500)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert!(handle.is_finished());
    }

    #[test]
    fn test_spawn_outside_runtime_is_an_error() {
        let scheduler = TokioScheduler::shared();
        let result = scheduler.schedule_after(Duration::from_secs(1), Box::pin(async {}));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
