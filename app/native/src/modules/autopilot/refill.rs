//! Plan refill loop.
//!
//! Whenever autopilot is on, the queue is empty and nothing is executing,
//! the loop asks the planner for a new batch and installs it as the queue.
//! The trigger is re-evaluated on every scheduler wake-up, on every layout
//! change reported by the desktop and on a fixed poll interval, so an empty
//! queue with autopilot on is never left waiting forever.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::state::{RefillOutcome, Scheduler};
use crate::config::{FallbackPolicy, RefillConfig};
use crate::modules::desktop::{Desktop, Viewport};
use crate::modules::planner::{CursorAction, PlanRequest, Planner};
use crate::utils::random::RandomSource;

/// Status line shown while waiting for the planner.
pub const THINKING_STATUS: &str = "Thinking...";

/// Requests plans and installs them into the scheduler.
pub struct RefillLoop {
    scheduler: Arc<Scheduler>,
    planner: Arc<dyn Planner>,
    desktop: Arc<dyn Desktop>,
    rng: Arc<RandomSource>,
    config: RefillConfig,
}

impl RefillLoop {
    #[must_use]
    pub fn new(
        scheduler: Arc<Scheduler>,
        planner: Arc<dyn Planner>,
        desktop: Arc<dyn Desktop>,
        rng: Arc<RandomSource>,
        config: RefillConfig,
    ) -> Self {
        Self { scheduler, planner, desktop, rng, config }
    }

    /// Runs until the task is aborted.
    pub async fn run(self) {
        let mut layout = self.desktop.layout_changes();
        let mut poll = tokio::time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if matches!(
                self.refill_once().await,
                Some(RefillOutcome::Installed(0) | RefillOutcome::Discarded)
            ) {
                tokio::time::sleep(self.config.empty_plan_backoff()).await;
                continue;
            }

            tokio::select! {
                () = self.scheduler.changed() => {}
                () = layout_changed(&mut layout) => {}
                _ = poll.tick() => {}
            }
        }
    }

    /// Performs one refill if the scheduler says a plan is needed.
    ///
    /// Returns `None` when no refill was due.
    pub async fn refill_once(&self) -> Option<RefillOutcome> {
        let ticket = self.scheduler.begin_refill()?;

        self.desktop.set_status(THINKING_STATUS);
        let request = PlanRequest {
            open_windows: self.desktop.open_window_titles(),
            viewport: self.desktop.viewport(),
        };
        tracing::debug!(
            planner = self.planner.name(),
            generation = ticket.generation(),
            windows = request.open_windows.len(),
            "ghost: requesting plan"
        );

        let actions = match self.planner.request_plan(&request).await {
            Ok(actions) => actions,
            Err(err) => {
                tracing::info!(
                    planner = self.planner.name(),
                    error = %err,
                    fallback = ?self.config.fallback,
                    "ghost: planner failed, using fallback plan"
                );
                self.fallback_plan(request.viewport)
            }
        };

        let outcome = self.scheduler.finish_refill(ticket, actions);
        match outcome {
            RefillOutcome::Installed(count) => {
                self.desktop.append_log(format!("Plan updated: {count} instructions."));
            }
            RefillOutcome::Discarded => {
                tracing::debug!("ghost: autopilot changed during planning, plan discarded");
            }
        }

        Some(outcome)
    }

    /// Plan used in place of a failed planner response.
    #[must_use]
    pub fn fallback_plan(&self, viewport: Viewport) -> Vec<CursorAction> {
        match self.config.fallback {
            FallbackPolicy::SyntheticMove => {
                vec![CursorAction::move_to(self.rng.point_in(viewport, 0.0)).with_label("fallback")]
            }
            FallbackPolicy::Empty => Vec::new(),
        }
    }
}

/// Resolves on the next layout revision, or never if the desktop cannot
/// report layout changes.
async fn layout_changed(layout: &mut Option<watch::Receiver<u64>>) {
    let Some(receiver) = layout.as_mut() else {
        return std::future::pending().await;
    };

    if receiver.changed().await.is_err() {
        *layout = None;
    }
}
