//! Offline planner that improvises plausible plans.

use std::f64::consts::TAU;
use std::sync::Arc;

use async_trait::async_trait;

use super::{CursorAction, PlanRequest, Planner, PlannerError};
use crate::modules::desktop::Position;
use crate::utils::random::RandomSource;

/// Title of the window that hosts the drawing canvas.
const WHITEBOARD_TITLE: &str = "Whiteboard";

/// Margin kept from the viewport edges for free-standing moves.
const FREE_MOVE_MARGIN: f64 = 50.0;

/// Shapes the local planner knows how to draw.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Circle,
    Triangle,
    Zigzag,
    Spiral,
}

const SHAPES: [Shape; 4] = [Shape::Circle, Shape::Triangle, Shape::Zigzag, Shape::Spiral];

impl Shape {
    const fn label(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Zigzag => "zigzag",
            Self::Spiral => "spiral",
        }
    }

    /// Normalized `0..1` path for this shape.
    fn path(self) -> Vec<Position> {
        match self {
            Self::Circle => (0..=24)
                .map(|i| {
                    let angle = TAU * f64::from(i) / 24.0;
                    Position::new(0.5 + 0.35 * angle.cos(), 0.5 + 0.35 * angle.sin())
                })
                .collect(),
            Self::Triangle => vec![
                Position::new(0.5, 0.15),
                Position::new(0.85, 0.8),
                Position::new(0.15, 0.8),
                Position::new(0.5, 0.15),
            ],
            Self::Zigzag => (0..=8)
                .map(|i| {
                    let y = if i % 2 == 0 { 0.3 } else { 0.7 };
                    Position::new(0.1 + 0.1 * f64::from(i), y)
                })
                .collect(),
            Self::Spiral => (0..=40)
                .map(|i| {
                    let t = f64::from(i) / 40.0;
                    let angle = TAU * 3.0 * t;
                    let radius = 0.45 * t;
                    Position::new(0.5 + radius * angle.cos(), 0.5 + radius * angle.sin())
                })
                .collect(),
        }
    }
}

/// Planner that synthesizes actions without any external service.
pub struct LocalPlanner {
    rng: Arc<RandomSource>,
    min_actions: usize,
    max_actions: usize,
}

impl LocalPlanner {
    /// Creates a planner producing between `min_actions` and `max_actions`
    /// actions per plan.
    #[must_use]
    pub fn new(rng: Arc<RandomSource>, min_actions: usize, max_actions: usize) -> Self {
        let min_actions = min_actions.max(1);
        Self { rng, min_actions, max_actions: max_actions.max(min_actions) }
    }

    fn improvise(&self, request: &PlanRequest) -> Vec<CursorAction> {
        let count = self.rng.index(self.min_actions..self.max_actions + 1);
        let can_draw = request.open_windows.iter().any(|t| t == WHITEBOARD_TITLE);
        let mut actions = Vec::with_capacity(count);
        let mut drew = false;

        for _ in 0..count {
            let roll = self.rng.range(0.0..1.0);
            let action = if can_draw && !drew && roll < 0.3 {
                drew = true;
                let shape = SHAPES[self.rng.index(0..SHAPES.len())];
                CursorAction::draw(shape.path()).with_label(shape.label())
            } else if !request.open_windows.is_empty() && roll < 0.65 {
                let title = &request.open_windows[self.rng.index(0..request.open_windows.len())];
                CursorAction::move_to_window(title.clone())
            } else if !request.open_windows.is_empty() && roll < 0.85 {
                let title = &request.open_windows[self.rng.index(0..request.open_windows.len())];
                CursorAction::click_window(title.clone())
            } else {
                CursorAction::move_to(self.rng.point_in(request.viewport, FREE_MOVE_MARGIN))
            };
            actions.push(action);
        }

        actions
    }
}

#[async_trait]
impl Planner for LocalPlanner {
    fn name(&self) -> &'static str { "local" }

    async fn request_plan(&self, request: &PlanRequest) -> Result<Vec<CursorAction>, PlannerError> {
        Ok(self.improvise(request))
    }
}
