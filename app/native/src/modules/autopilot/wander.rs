//! Idle wandering.
//!
//! While autopilot is on and there is nothing to execute, the cursor drifts
//! to random points so it never looks frozen while a plan is being fetched.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::state::Scheduler;
use crate::config::WanderConfig;
use crate::modules::desktop::Desktop;
use crate::modules::motion::MotionDriver;
use crate::utils::random::RandomSource;

/// Status line shown while wandering.
pub const WANDERING_STATUS: &str = "Wandering...";

struct WanderTask {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

/// Everything the wander loop needs, shared with the spawned task.
struct WanderContext {
    scheduler: Arc<Scheduler>,
    motion: Arc<MotionDriver>,
    desktop: Arc<dyn Desktop>,
    rng: Arc<RandomSource>,
    config: WanderConfig,
}

/// Starts and stops the periodic wander trigger.
pub struct WanderController {
    context: Arc<WanderContext>,
    task: Mutex<Option<WanderTask>>,
}

impl WanderController {
    #[must_use]
    pub fn new(
        scheduler: Arc<Scheduler>,
        motion: Arc<MotionDriver>,
        desktop: Arc<dyn Desktop>,
        rng: Arc<RandomSource>,
        config: WanderConfig,
    ) -> Self {
        Self {
            context: Arc::new(WanderContext { scheduler, motion, desktop, rng, config }),
            task: Mutex::new(None),
        }
    }

    /// Starts the periodic trigger. Returns `false` if it was already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock();
        if task.is_some() {
            return false;
        }

        let (stop, stopped) = watch::channel(false);
        let handle = tokio::spawn(self.context.clone().run(stopped));
        *task = Some(WanderTask { handle, stop });

        tracing::debug!("ghost: wandering started");
        true
    }

    /// Stops the periodic trigger. Returns `false` if it was not running.
    ///
    /// A wander motion already in flight is left to finish.
    pub fn stop(&self) -> bool {
        let Some(task) = self.task.lock().take() else {
            return false;
        };

        let _ = task.stop.send(true);
        tracing::debug!("ghost: wandering stopped");
        true
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|task| !task.handle.is_finished())
    }
}

impl WanderContext {
    async fn run(self: Arc<Self>, mut stopped: watch::Receiver<bool>) {
        let mut ticks = tokio::time::interval(self.config.interval());
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticks.tick() => {}
                changed = stopped.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            if *stopped.borrow() {
                break;
            }

            if self.scheduler.may_wander() {
                self.wander_once().await;
            }
        }
    }

    async fn wander_once(&self) {
        let target = self.rng.point_in(self.desktop.viewport(), self.config.margin);
        let duration = self
            .rng
            .duration_between(self.config.min_duration(), self.config.max_duration());

        self.desktop.set_status(WANDERING_STATUS);
        tracing::trace!(
            x = target.x,
            y = target.y,
            duration_ms = duration.as_millis(),
            "ghost: wandering"
        );

        // Directed actions supersede this motion; there is nothing to do
        // either way once it returns.
        let _ = self.motion.move_to(target, duration).await;
    }
}
