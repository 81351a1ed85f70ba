//! Frame-driven motion runner.
//!
//! The driver owns the shared cursor position. Each call to
//! [`MotionDriver::move_to`] runs one [`Motion`] on a frame interval and
//! publishes every sample to the desktop. Starting a new motion supersedes
//! whatever motion is running; the older call notices on its next frame and
//! returns [`MotionOutcome::Superseded`] without writing again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};

use super::interpolator::Motion;
use crate::modules::desktop::{Desktop, Position};

/// How a call to [`MotionDriver::move_to`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// The cursor reached the target.
    Completed,
    /// A newer motion took over before the target was reached.
    Superseded,
}

/// Runs motions against a shared cursor position.
pub struct MotionDriver {
    desktop: Arc<dyn Desktop>,
    position: Mutex<Position>,
    /// Id of the most recently started motion. Zero means none yet.
    latest: AtomicU64,
    frame_interval: Duration,
}

impl MotionDriver {
    /// Creates a driver starting at `initial` and publishing to `desktop`.
    #[must_use]
    pub fn new(desktop: Arc<dyn Desktop>, initial: Position, frame_interval: Duration) -> Self {
        Self {
            desktop,
            position: Mutex::new(initial),
            latest: AtomicU64::new(0),
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    /// Last published cursor position.
    #[must_use]
    pub fn position(&self) -> Position { *self.position.lock() }

    /// Number of motions started so far.
    #[must_use]
    pub fn motions_started(&self) -> u64 { self.latest.load(Ordering::SeqCst) }

    /// Moves the cursor to `target` over `duration`, one frame at a time.
    ///
    /// The start point is captured when the call begins. The first frame is
    /// published immediately, so a zero duration lands on `target` without
    /// waiting.
    pub async fn move_to(&self, target: Position, duration: Duration) -> MotionOutcome {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let motion = Motion::new(self.position(), target, duration);
        let started = Instant::now();

        tracing::trace!(
            motion = id,
            x = target.x,
            y = target.y,
            duration_ms = duration.as_millis(),
            "ghost: motion started"
        );

        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            frames.tick().await;

            if self.latest.load(Ordering::SeqCst) != id {
                tracing::trace!(motion = id, "ghost: motion superseded");
                return MotionOutcome::Superseded;
            }

            let sample = motion.sample(started.elapsed());
            self.publish(sample.position);

            if sample.is_finished() {
                return MotionOutcome::Completed;
            }
        }
    }

    fn publish(&self, position: Position) {
        *self.position.lock() = position;
        self.desktop.set_cursor(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::desktop::{Viewport, VirtualDesktop, default_windows};

    fn driver() -> (Arc<VirtualDesktop>, MotionDriver) {
        let desktop = Arc::new(VirtualDesktop::new(Viewport::new(1000.0, 1000.0), default_windows()));
        let driver = MotionDriver::new(desktop.clone(), Position::new(0.0, 0.0), Duration::from_millis(16));
        (desktop, driver)
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_to_reaches_target_exactly() {
        let (desktop, driver) = driver();
        let target = Position::new(123.456, 789.012);

        let started = Instant::now();
        let outcome = driver.move_to(target, Duration::from_millis(400)).await;

        assert_eq!(outcome, MotionOutcome::Completed);
        assert_eq!(driver.position(), target);
        assert_eq!(desktop.cursor(), target);
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_completes_on_first_frame() {
        let (_desktop, driver) = driver();
        let target = Position::new(5.0, 6.0);

        let started = Instant::now();
        let outcome = driver.move_to(target, Duration::ZERO).await;

        assert_eq!(outcome, MotionOutcome::Completed);
        assert_eq!(driver.position(), target);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_motion_supersedes_older() {
        let (_desktop, driver) = driver();
        let driver = Arc::new(driver);

        let slow = {
            let driver = driver.clone();
            tokio::spawn(async move { driver.move_to(Position::new(900.0, 900.0), Duration::from_secs(4)).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let fast = driver.move_to(Position::new(10.0, 10.0), Duration::from_millis(200)).await;
        let slow = slow.await.unwrap();

        assert_eq!(fast, MotionOutcome::Completed);
        assert_eq!(slow, MotionOutcome::Superseded);
        assert_eq!(driver.position(), Position::new(10.0, 10.0));
        assert_eq!(driver.motions_started(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_motion_starts_from_current_position() {
        let (_desktop, driver) = driver();
        driver.move_to(Position::new(100.0, 0.0), Duration::ZERO).await;

        let driver = Arc::new(driver);
        let handle = {
            let driver = driver.clone();
            tokio::spawn(async move { driver.move_to(Position::new(200.0, 0.0), Duration::from_millis(1000)).await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        // The first frame was published at t = 0, i.e. at the start point.
        let x = driver.position().x;
        assert!((100.0..200.0).contains(&x));
        handle.await.unwrap();
    }
}
