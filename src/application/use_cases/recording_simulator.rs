use crate::domain::error::Result;
use crate::domain::recording::{Action, ActionType, ElementKind};
use crate::domain::workbench::StopReason;
use crate::infrastructure::config::RecorderConfig;
use crate::infrastructure::random::{pick, RandomSource};
use crate::infrastructure::scheduler::{
    Scheduler, SchedulerExt, TickControl, TickFuture, TimerHandle,
};
use crate::shared::ids::IdGenerator;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Receives what the simulator produces.
#[async_trait]
pub trait RecordingSink: Send + Sync + 'static {
    /// Appends the action built for the next 1-based position. Returns `false`
    /// when the sink no longer accepts actions, which ends the run.
    fn record_tick(&self, build: &mut (dyn FnMut(usize) -> Action + Send)) -> bool;

    /// Called once after the last tick of a run that reached its ceiling.
    async fn finish(&self, reason: StopReason);
}

/// Fixed-cadence generator of synthetic actions.
#[derive(Clone)]
pub struct RecordingSimulator {
    scheduler: Arc<dyn Scheduler>,
    random: Arc<dyn RandomSource>,
    config: RecorderConfig,
    ids: Arc<IdGenerator>,
}

impl RecordingSimulator {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            scheduler,
            random,
            config,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Samples one action. `position` is its 1-based place in the recording.
    pub fn next_action(&self, position: usize) -> Action {
        let now = self.scheduler.now();
        Action {
            id: self.ids.next(now.timestamp_millis()),
            action_type: *pick(self.random.as_ref(), &ActionType::ALL),
            element: *pick(self.random.as_ref(), &ElementKind::ALL),
            value: format!("Action {}", position),
            timestamp: now,
        }
    }

    /// Starts a run feeding `sink`. The returned handle cancels every pending
    /// tick; a run that is not cancelled ends on its own after `max_ticks`.
    pub fn arm(&self, sink: Arc<dyn RecordingSink>) -> Result<TimerHandle> {
        let max_ticks = u64::from(self.config.max_ticks.max(1));
        let simulator = self.clone();
        self.scheduler.schedule_periodic(
            self.config.tick(),
            Box::new(move |tick: u64| -> TickFuture {
                let simulator = simulator.clone();
                let sink = Arc::clone(&sink);
                Box::pin(async move {
                    let accepted = sink.record_tick(&mut |position| simulator.next_action(position));
                    if !accepted {
                        debug!(tick, "Recording sink closed, ending run");
                        return TickControl::Stop;
                    }
                    if tick >= max_ticks {
                        debug!(tick, "Recording reached its ceiling");
                        sink.finish(StopReason::Ceiling).await;
                        return TickControl::Stop;
                    }
                    TickControl::Continue
                })
            }),
        )
    }
}
