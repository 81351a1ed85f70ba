//! Time-parameterized cursor interpolation.
//!
//! A [`Motion`] is pure: feed it elapsed time and it returns where the cursor
//! should be. The [`super::MotionDriver`] owns the clock; tests can step a
//! motion with synthetic time instead.

use std::time::Duration;

use super::easing::{ease_out_quint, lerp, progress};
use crate::modules::desktop::Position;

/// One interpolated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position to publish for this frame.
    pub position: Position,
    /// Linear progress in `[0, 1]`.
    pub progress: f64,
}

impl Sample {
    /// Whether this is the final frame of the motion.
    #[must_use]
    pub fn is_finished(&self) -> bool { self.progress >= 1.0 }
}

/// A single eased motion from `start` to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    start: Position,
    target: Position,
    duration: Duration,
}

impl Motion {
    /// Creates a motion. A zero duration completes on the first sample.
    #[must_use]
    pub const fn new(start: Position, target: Position, duration: Duration) -> Self {
        Self { start, target, duration }
    }

    /// Samples the motion `elapsed` after it started.
    ///
    /// The final sample is exactly `target`, not an eased approximation of it.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> Sample {
        let progress = progress(elapsed.as_secs_f64(), self.duration.as_secs_f64());

        if progress >= 1.0 {
            return Sample { position: self.target, progress: 1.0 };
        }

        let ease = ease_out_quint(progress);
        Sample {
            position: Position::new(
                lerp(self.start.x, self.target.x, ease),
                lerp(self.start.y, self.target.y, ease),
            ),
            progress,
        }
    }

    /// Steps the motion with a fixed synthetic frame interval.
    ///
    /// The first sample is taken at `t = 0`; iteration ends after the
    /// finishing sample. A zero `step` is treated as one millisecond.
    pub fn frames(&self, step: Duration) -> impl Iterator<Item = Sample> + '_ {
        let step = if step.is_zero() { Duration::from_millis(1) } else { step };
        let mut elapsed = Duration::ZERO;
        let mut done = false;

        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let sample = self.sample(elapsed);
            done = sample.is_finished();
            elapsed += step;
            Some(sample)
        })
    }
}
