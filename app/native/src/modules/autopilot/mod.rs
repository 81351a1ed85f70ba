//! Autopilot.
//!
//! Wires the three periodic loops around one [`Scheduler`]:
//!
//! - the [`DispatchTick`] feeds queued actions to the [`ActionExecutor`],
//! - the [`WanderController`] keeps the cursor moving while idle,
//! - the [`RefillLoop`] asks the planner for more work.
//!
//! [`Autopilot::spawn`] starts the tick and refill tasks and returns an
//! [`AutopilotHandle`] that turns autopilot on and off. Wandering only runs
//! while autopilot is on.

mod executor;
mod queue;
mod refill;
mod state;
mod tick;
mod wander;

use std::sync::Arc;

pub use executor::{ActionExecutor, DRAW_INTENT_LOG};
pub use queue::ActionQueue;
pub use refill::{RefillLoop, THINKING_STATUS};
pub use state::{ExecutionGuard, RefillOutcome, RefillTicket, Scheduler, SchedulerSnapshot};
pub use tick::DispatchTick;
use tokio::task::JoinHandle;
pub use wander::{WANDERING_STATUS, WanderController};

use crate::config::GhostConfig;
use crate::modules::desktop::{Desktop, Position};
use crate::modules::motion::MotionDriver;
use crate::modules::planner::{CursorAction, Planner};
use crate::utils::random::RandomSource;

/// Builder for a running autopilot.
pub struct Autopilot {
    desktop: Arc<dyn Desktop>,
    planner: Arc<dyn Planner>,
    rng: Arc<RandomSource>,
    config: GhostConfig,
}

impl Autopilot {
    /// Creates an autopilot for `desktop`, fed by `planner`.
    #[must_use]
    pub fn new(desktop: Arc<dyn Desktop>, planner: Arc<dyn Planner>, config: GhostConfig) -> Self {
        Self {
            desktop,
            planner,
            rng: Arc::new(RandomSource::from_entropy()),
            config,
        }
    }

    /// Uses `rng` for jitter, wander targets and fallback plans.
    #[must_use]
    pub fn with_rng(mut self, rng: Arc<RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Spawns the dispatch tick and the refill loop.
    ///
    /// Autopilot starts disabled; call [`AutopilotHandle::enable`].
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(self) -> AutopilotHandle {
        let config = self.config;
        let initial = self.desktop.viewport().center();

        let scheduler = Arc::new(Scheduler::new());
        let motion = Arc::new(MotionDriver::new(
            self.desktop.clone(),
            initial,
            config.motion.frame_interval(),
        ));
        let executor = Arc::new(ActionExecutor::new(
            self.desktop.clone(),
            motion.clone(),
            self.rng.clone(),
            config.motion.clone(),
            config.drawing.clone(),
        ));

        let tick = DispatchTick::new(scheduler.clone(), executor, config.scheduler.tick_interval());
        let refill = RefillLoop::new(
            scheduler.clone(),
            self.planner.clone(),
            self.desktop.clone(),
            self.rng.clone(),
            config.refill.clone(),
        );
        let wander = WanderController::new(
            scheduler.clone(),
            motion.clone(),
            self.desktop,
            self.rng,
            config.wander,
        );

        tracing::info!(planner = self.planner.name(), "ghost: autopilot ready");

        AutopilotHandle {
            scheduler,
            motion,
            wander,
            tasks: vec![tokio::spawn(tick.run()), tokio::spawn(refill.run())],
        }
    }
}

/// Control surface of a spawned autopilot.
///
/// Dropping the handle stops wandering and aborts the background tasks.
pub struct AutopilotHandle {
    scheduler: Arc<Scheduler>,
    motion: Arc<MotionDriver>,
    wander: WanderController,
    tasks: Vec<JoinHandle<()>>,
}

impl AutopilotHandle {
    /// Turns autopilot on and starts wandering.
    pub fn enable(&self) {
        if self.scheduler.set_autopilot(true) {
            tracing::info!("ghost: autopilot enabled");
        }
        self.wander.start();
    }

    /// Turns autopilot off and stops wandering.
    ///
    /// An action already executing runs to completion, and so does a
    /// wander motion already in flight. The queue is kept. A plan still
    /// being fetched is discarded when it arrives.
    pub fn disable(&self) {
        if self.scheduler.set_autopilot(false) {
            tracing::info!("ghost: autopilot disabled");
        }
        self.wander.stop();
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool { self.scheduler.is_autopilot_enabled() }

    /// Appends actions to the queue by hand.
    pub fn enqueue(&self, actions: impl IntoIterator<Item = CursorAction>) {
        self.scheduler.enqueue(actions);
    }

    /// The shared scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<Scheduler> { &self.scheduler }

    /// Last cursor position published by the motion driver.
    #[must_use]
    pub fn cursor(&self) -> Position { self.motion.position() }

    /// Disables autopilot and waits for the background tasks to stop.
    pub async fn shutdown(mut self) {
        self.disable();
        for task in self.tasks.drain(..) {
            task.abort();
            match task.await {
                Err(err) if !err.is_cancelled() => {
                    tracing::warn!(error = %err, "ghost: autopilot task failed");
                }
                _ => {}
            }
        }
        tracing::debug!("ghost: autopilot stopped");
    }
}

impl Drop for AutopilotHandle {
    fn drop(&mut self) {
        self.wander.stop();
        for task in &self.tasks {
            task.abort();
        }
    }
}
