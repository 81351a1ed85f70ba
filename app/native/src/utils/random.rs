//! Injectable random source.
//!
//! Target jitter, wander destinations and synthetic plans all draw from one
//! [`RandomSource`]. Seeding it makes every resolved coordinate reproducible.

use std::ops::Range;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::modules::desktop::{Position, Viewport};

/// Thread-safe, optionally seeded random number source.
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl Default for RandomSource {
    fn default() -> Self { Self::from_entropy() }
}

impl RandomSource {
    /// Creates a deterministic source.
    #[must_use]
    pub fn seeded(seed: u64) -> Self { Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) } }

    /// Creates a source seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_rng(&mut rand::rng())),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self { seed.map_or_else(Self::from_entropy, Self::seeded) }

    /// Uniform value in `range`. An empty range yields its start.
    pub fn range(&self, range: Range<f64>) -> f64 {
        if range.start >= range.end {
            return range.start;
        }
        self.rng.lock().random_range(range)
    }

    /// Uniform integer in `range`. An empty range yields its start.
    pub fn index(&self, range: Range<usize>) -> usize {
        if range.start >= range.end {
            return range.start;
        }
        self.rng.lock().random_range(range)
    }

    /// Uniform offset in `[-magnitude, magnitude)`.
    pub fn jitter(&self, magnitude: f64) -> f64 {
        let magnitude = magnitude.abs();
        self.range(-magnitude..magnitude)
    }

    /// Uniform point inside `viewport` inset by `margin` on every side.
    ///
    /// When the inset leaves no room on an axis, that axis collapses to the
    /// viewport centre.
    pub fn point_in(&self, viewport: Viewport, margin: f64) -> Position {
        let axis = |extent: f64| {
            if extent - margin * 2.0 <= 0.0 {
                extent / 2.0
            } else {
                self.range(margin..extent - margin)
            }
        };
        Position::new(axis(viewport.width), axis(viewport.height))
    }

    /// Uniform duration in `[min, max)`. Returns `min` if the range is empty.
    pub fn duration_between(&self, min: Duration, max: Duration) -> Duration {
        if min >= max {
            return min;
        }
        Duration::from_secs_f64(self.range(min.as_secs_f64()..max.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_agree() {
        let a = RandomSource::seeded(7);
        let b = RandomSource::seeded(7);
        for _ in 0..10 {
            assert!((a.jitter(10.0) - b.jitter(10.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_jitter_bounds() {
        let rng = RandomSource::seeded(1);
        for _ in 0..1000 {
            let j = rng.jitter(10.0);
            assert!((-10.0..10.0).contains(&j));
        }
        assert!((rng.jitter(0.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_in_respects_margin() {
        let rng = RandomSource::seeded(2);
        let viewport = Viewport::new(800.0, 600.0);
        for _ in 0..1000 {
            let p = rng.point_in(viewport, 100.0);
            assert!((100.0..700.0).contains(&p.x));
            assert!((100.0..500.0).contains(&p.y));
        }
    }

    #[test]
    fn test_point_in_tiny_viewport_uses_center() {
        let rng = RandomSource::seeded(3);
        let p = rng.point_in(Viewport::new(150.0, 120.0), 100.0);
        assert_eq!(p, Position::new(75.0, 60.0));
    }

    #[test]
    fn test_duration_between() {
        let rng = RandomSource::seeded(4);
        let min = Duration::from_millis(2000);
        let max = Duration::from_millis(4000);
        for _ in 0..100 {
            let d = rng.duration_between(min, max);
            assert!(d >= min && d < max);
        }
        assert_eq!(rng.duration_between(max, min), max);
    }

    #[test]
    fn test_index_empty_range() {
        let rng = RandomSource::seeded(5);
        assert_eq!(rng.index(3..3), 3);
        assert!(rng.index(0..4) < 4);
    }
}
