//! Cursor motion engine.
//!
//! # Architecture
//!
//! - `easing` - quintic ease-out curve and progress clamping
//! - `interpolator` - pure, time-parameterized [`Motion`] sampling
//! - `driver` - [`MotionDriver`], which runs motions on a frame interval and
//!   owns the shared cursor position

mod driver;
mod easing;
mod interpolator;

pub use driver::{MotionDriver, MotionOutcome};
pub use easing::{ease_out_quint, lerp, progress};
pub use interpolator::{Motion, Sample};
