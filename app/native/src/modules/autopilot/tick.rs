//! Main dispatch tick.
//!
//! On a fixed period, takes at most one action from the front of the queue
//! and runs it to completion. This is the only consumer of the queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::executor::ActionExecutor;
use super::state::Scheduler;

/// Periodic dispatcher feeding the [`ActionExecutor`].
pub struct DispatchTick {
    scheduler: Arc<Scheduler>,
    executor: Arc<ActionExecutor>,
    period: Duration,
}

impl DispatchTick {
    #[must_use]
    pub fn new(scheduler: Arc<Scheduler>, executor: Arc<ActionExecutor>, period: Duration) -> Self {
        Self { scheduler, executor, period: period.max(Duration::from_millis(1)) }
    }

    /// Runs until the task is aborted.
    pub async fn run(self) {
        let mut ticks = tokio::time::interval(self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;
            self.tick_once().await;
        }
    }

    /// Dispatches one action if one is ready, returning whether it did.
    pub async fn tick_once(&self) -> bool {
        let Some((action, _guard)) = self.scheduler.try_dispatch() else {
            return false;
        };

        tracing::debug!(
            kind = %action.kind,
            remaining = self.scheduler.queue_len(),
            "ghost: dispatching action"
        );
        self.executor.execute(&action).await;
        true
    }
}
