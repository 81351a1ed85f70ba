//! Runs one cursor action to completion.
//!
//! The executor never fails: unknown targets fall back to the action's own
//! position or to the configured fallback coordinate, and a DRAW without a
//! drawing surface only logs its intent.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{DrawingConfig, MotionConfig};
use crate::modules::desktop::{Desktop, Position, StrokeOp, Window};
use crate::modules::motion::{MotionDriver, MotionOutcome};
use crate::modules::planner::{ActionKind, CursorAction};
use crate::utils::random::RandomSource;

/// Log line appended before a drawing starts.
pub const DRAW_INTENT_LOG: &str = "Intent: Creative Drawing";

/// Holds the clicking flag for its lifetime, so a dwell cut short by task
/// cancellation still releases it.
struct ClickPress<'a> {
    desktop: &'a dyn Desktop,
}

impl<'a> ClickPress<'a> {
    fn new(desktop: &'a dyn Desktop) -> Self {
        desktop.set_clicking(true);
        Self { desktop }
    }
}

impl Drop for ClickPress<'_> {
    fn drop(&mut self) { self.desktop.set_clicking(false); }
}

/// Interprets [`CursorAction`]s against the current desktop layout.
pub struct ActionExecutor {
    desktop: Arc<dyn Desktop>,
    motion: Arc<MotionDriver>,
    rng: Arc<RandomSource>,
    motion_config: MotionConfig,
    drawing: DrawingConfig,
}

impl ActionExecutor {
    #[must_use]
    pub fn new(
        desktop: Arc<dyn Desktop>,
        motion: Arc<MotionDriver>,
        rng: Arc<RandomSource>,
        motion_config: MotionConfig,
        drawing: DrawingConfig,
    ) -> Self {
        Self { desktop, motion, rng, motion_config, drawing }
    }

    /// Runs `action` until all of its visible effects have been applied.
    pub async fn execute(&self, action: &CursorAction) {
        tracing::debug!(
            kind = %action.kind,
            target = action.target.as_deref().unwrap_or("-"),
            "ghost: executing action"
        );
        self.desktop.set_status(&action.status_line());

        match action.kind {
            ActionKind::Move => {
                let destination = self.resolve_destination(action);
                self.glide(destination, self.motion_config.directed_duration()).await;
            }
            ActionKind::Click => {
                let destination = self.resolve_destination(action);
                self.glide(destination, self.motion_config.directed_duration()).await;
                self.click(action.target.as_deref()).await;
            }
            ActionKind::Draw => self.draw(action.path.as_deref().unwrap_or_default()).await,
            ActionKind::Idle => {}
        }
    }

    /// Where a MOVE or CLICK should land.
    ///
    /// A target naming a known window (open or closed) resolves to that
    /// window's centre plus fresh jitter on each axis. Otherwise the action's
    /// position is used, or the fallback coordinate if it has none.
    #[must_use]
    pub fn resolve_destination(&self, action: &CursorAction) -> Position {
        let window = action.target.as_deref().and_then(|reference| self.desktop.find_window(reference));

        if let Some(window) = window {
            let center = window.center();
            let jitter = self.motion_config.target_jitter;
            return Position::new(center.x + self.rng.jitter(jitter), center.y + self.rng.jitter(jitter));
        }

        if let Some(target) = &action.target {
            tracing::debug!(target = %target, "ghost: unknown window, using position");
        }
        action.position.unwrap_or(self.motion_config.fallback_position)
    }

    async fn glide(&self, destination: Position, duration: Duration) {
        if self.motion.move_to(destination, duration).await == MotionOutcome::Superseded {
            tracing::debug!(x = destination.x, y = destination.y, "ghost: directed motion superseded");
        }
    }

    async fn click(&self, target: Option<&str>) {
        let _pressed = ClickPress::new(self.desktop.as_ref());
        self.desktop.append_log(format!("Click: {}", target.unwrap_or("desktop")));
        tokio::time::sleep(self.motion_config.click_dwell()).await;
    }

    async fn draw(&self, path: &[Position]) {
        if path.is_empty() {
            tracing::debug!("ghost: draw with empty path, nothing to do");
            return;
        }

        self.desktop.append_log(DRAW_INTENT_LOG.to_string());

        let surface = &self.drawing.surface;
        let Some(window) = self.desktop.drawing_surface(surface) else {
            tracing::debug!(surface = %surface, "ghost: no drawing surface, skipping draw");
            return;
        };

        let style = self.drawing.stroke_style();
        let segment = self.drawing.segment_duration();

        for (index, point) in path.iter().enumerate() {
            let absolute = self.surface_to_screen(&window, *point);
            self.glide(absolute, segment).await;

            let local = self.screen_to_canvas(&window, absolute);
            let op = if index == 0 {
                StrokeOp::Begin { at: local, style: style.clone() }
            } else {
                StrokeOp::LineTo(local)
            };
            self.desktop.stroke(surface, op);
        }
    }

    /// Maps a normalized `(u, v)` point into the drawable interior of `window`.
    #[must_use]
    pub fn surface_to_screen(&self, window: &Window, point: Position) -> Position {
        let d = &self.drawing;
        let inner_width = window.width - 2.0 * d.margin_x;
        let inner_height = window.height - d.margin_top - d.margin_bottom;
        Position::new(
            point.x.mul_add(inner_width, window.x + d.margin_x),
            point.y.mul_add(inner_height, window.y + d.margin_top),
        )
    }

    /// Converts a screen coordinate into the canvas space below the title bar.
    #[must_use]
    pub fn screen_to_canvas(&self, window: &Window, absolute: Position) -> Position {
        Position::new(absolute.x - window.x, absolute.y - window.y - self.drawing.title_bar_height)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::modules::desktop::{StrokeStyle, Viewport, VirtualDesktop, default_windows};

    struct Fixture {
        desktop: Arc<VirtualDesktop>,
        motion: Arc<MotionDriver>,
        executor: Arc<ActionExecutor>,
    }

    fn fixture_with(windows: Vec<Window>, seed: u64) -> Fixture {
        let desktop = Arc::new(VirtualDesktop::new(Viewport::new(1280.0, 800.0), windows));
        let motion = Arc::new(MotionDriver::new(
            desktop.clone(),
            Position::new(0.0, 0.0),
            Duration::from_millis(16),
        ));
        let executor = Arc::new(ActionExecutor::new(
            desktop.clone(),
            motion.clone(),
            Arc::new(RandomSource::seeded(seed)),
            MotionConfig::default(),
            DrawingConfig::default(),
        ));
        Fixture { desktop, motion, executor }
    }

    fn fixture() -> Fixture { fixture_with(default_windows(), 5) }

    #[test]
    fn test_window_target_gets_fresh_jitter() {
        let f = fixture();
        let expected_rng = RandomSource::seeded(5);
        let action = CursorAction::move_to_window("Notepad");

        let first = f.executor.resolve_destination(&action);
        let second = f.executor.resolve_destination(&action);

        let x = 200.0 + expected_rng.jitter(10.0);
        let y = 150.0 + expected_rng.jitter(10.0);
        assert_eq!(first, Position::new(x, y));
        assert_ne!(first, second);
        assert!((first.x - 200.0).abs() <= 10.0);
        assert!((first.y - 150.0).abs() <= 10.0);
    }

    #[test]
    fn test_target_resolves_by_id() {
        let f = fixture();
        let p = f.executor.resolve_destination(&CursorAction::click_window("whiteboard"));
        assert!((p.x - 600.0).abs() <= 10.0);
        assert!((p.y - 300.0).abs() <= 10.0);
    }

    #[test]
    fn test_unknown_target_uses_position() {
        let f = fixture();
        let mut action = CursorAction::move_to(Position::new(12.0, 34.0));
        action.target = Some("Calculator".to_string());
        assert_eq!(f.executor.resolve_destination(&action), Position::new(12.0, 34.0));
    }

    #[test]
    fn test_unknown_target_without_position_uses_fallback() {
        let f = fixture();
        let action = CursorAction::click_window("Calculator");
        assert_eq!(f.executor.resolve_destination(&action), Position::new(500.0, 500.0));
        assert_eq!(f.executor.resolve_destination(&CursorAction::click()), Position::new(500.0, 500.0));
    }

    #[test]
    fn test_closed_window_still_resolves() {
        let f = fixture();
        f.desktop.close_window("files");
        let p = f.executor.resolve_destination(&CursorAction::move_to_window("File Explorer"));
        assert!((p.x - 225.0).abs() <= 10.0);
        assert!((p.y - 440.0).abs() <= 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_glides_for_directed_duration() {
        let f = fixture();
        let started = Instant::now();
        f.executor.execute(&CursorAction::move_to(Position::new(640.0, 400.0))).await;

        assert!(started.elapsed() >= Duration::from_millis(1200));
        assert!(started.elapsed() < Duration::from_millis(1300));
        assert_eq!(f.desktop.cursor(), Position::new(640.0, 400.0));
        assert_eq!(f.desktop.status(), "MOVE");
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_click_releases_flag() {
        let f = fixture();
        let executor = f.executor.clone();
        let run = tokio::spawn(async move { executor.execute(&CursorAction::click_window("Whiteboard")).await });

        tokio::time::sleep(Duration::from_millis(1300)).await;
        assert!(f.desktop.is_clicking());

        run.abort();
        assert!(run.await.unwrap_err().is_cancelled());
        assert!(!f.desktop.is_clicking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_holds_for_dwell() {
        let f = fixture();
        let executor = f.executor.clone();
        let started = Instant::now();
        let run = tokio::spawn(async move { executor.execute(&CursorAction::click_window("Whiteboard")).await });

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(!f.desktop.is_clicking());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(f.desktop.is_clicking());
        assert_eq!(f.desktop.logs()[0], "Click: Whiteboard");
        assert_eq!(f.desktop.status(), "CLICK: Whiteboard");

        run.await.unwrap();
        assert!(!f.desktop.is_clicking());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_without_target_logs_desktop() {
        let f = fixture();
        f.executor.execute(&CursorAction::click()).await;

        assert_eq!(f.desktop.logs()[0], "Click: desktop");
        assert_eq!(f.desktop.cursor(), Position::new(500.0, 500.0));
        assert_eq!(f.motion.motions_started(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_maps_corners_into_canvas() {
        let f = fixture();
        let path = vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0)];
        f.executor.execute(&CursorAction::draw(path)).await;

        assert_eq!(f.motion.motions_started(), 2);
        assert_eq!(f.desktop.cursor(), Position::new(780.0, 470.0));
        assert_eq!(f.desktop.logs()[0], DRAW_INTENT_LOG);

        let strokes = f.desktop.strokes("whiteboard");
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].style, StrokeStyle::default());
        // Whiteboard is 400x400: corners land at (20, 10) and (W - 20, H - 70).
        assert_eq!(strokes[0].points, vec![Position::new(20.0, 10.0), Position::new(380.0, 330.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_is_progressive() {
        let f = fixture();
        let executor = f.executor.clone();
        let path = vec![Position::new(0.0, 0.0), Position::new(0.5, 0.5), Position::new(1.0, 1.0)];
        let run = tokio::spawn(async move { executor.execute(&CursorAction::draw(path)).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        let partial = f.desktop.strokes("whiteboard");
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].points.len(), 1);

        run.await.unwrap();
        assert_eq!(f.desktop.strokes("whiteboard")[0].points.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_strokes_accumulate_across_draws() {
        let f = fixture();
        let path = vec![Position::new(0.2, 0.2), Position::new(0.8, 0.8)];
        f.executor.execute(&CursorAction::draw(path.clone())).await;
        f.executor.execute(&CursorAction::draw(path)).await;
        assert_eq!(f.desktop.strokes("whiteboard").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_with_empty_path_is_noop() {
        let f = fixture();
        let logs_before = f.desktop.logs();
        let started = Instant::now();

        f.executor.execute(&CursorAction::draw(Vec::new())).await;
        let mut absent = CursorAction::draw(Vec::new());
        absent.path = None;
        f.executor.execute(&absent).await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(f.motion.motions_started(), 0);
        assert!(f.desktop.strokes("whiteboard").is_empty());
        assert_eq!(f.desktop.logs(), logs_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_without_surface_logs_intent_only() {
        let windows = vec![Window::new("notepad", "Notepad", 50.0, 50.0, 300.0, 200.0, 1)];
        let f = fixture_with(windows, 1);
        let path = vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0)];

        f.executor.execute(&CursorAction::draw(path)).await;

        assert_eq!(f.motion.motions_started(), 0);
        assert_eq!(f.desktop.logs()[0], DRAW_INTENT_LOG);
        assert!(f.desktop.strokes("whiteboard").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_does_nothing() {
        let f = fixture();
        f.executor.execute(&CursorAction::idle()).await;
        assert_eq!(f.motion.motions_started(), 0);
        assert_eq!(f.desktop.status(), "IDLE");
    }
}
