//! Easing curves for cursor motion.

// ============================================================================
// Easing Functions
// ============================================================================

/// Linear interpolation between two values.
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 { (end - start).mul_add(t, start) }

/// Quintic ease-out: very fast start, long gentle settle.
///
/// `1 - (1 - t)^5`
#[inline]
pub fn ease_out_quint(t: f64) -> f64 { 1.0 - (1.0 - t).powi(5) }

/// Normalized progress of `elapsed` through `duration`, clamped to `[0, 1]`.
///
/// Reaching or passing the duration yields exactly `1.0`, which also covers a
/// zero duration without dividing by it.
#[inline]
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if elapsed >= duration {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < f64::EPSILON);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < f64::EPSILON);
        assert!((lerp(50.0, 150.0, 0.25) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ease_out_quint_endpoints() {
        assert!((ease_out_quint(0.0) - 0.0).abs() < f64::EPSILON);
        assert!((ease_out_quint(1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ease_out_quint_front_loaded() {
        // Half the time covers ~97% of the distance.
        assert!((ease_out_quint(0.5) - 0.968_75).abs() < 1e-12);
        assert!(ease_out_quint(0.1) > 0.4);
    }

    #[test]
    fn test_ease_out_quint_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let value = ease_out_quint(f64::from(i) / 100.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn test_progress_clamps() {
        assert!((progress(0.0, 100.0) - 0.0).abs() < f64::EPSILON);
        assert!((progress(50.0, 100.0) - 0.5).abs() < f64::EPSILON);
        assert!((progress(250.0, 100.0) - 1.0).abs() < f64::EPSILON);
        assert!((progress(-5.0, 100.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_zero_or_negative_duration_is_complete() {
        assert!((progress(0.0, 0.0) - 1.0).abs() < f64::EPSILON);
        assert!((progress(0.0, -10.0) - 1.0).abs() < f64::EPSILON);
        assert!(!progress(0.0, 0.0).is_nan());
    }
}
