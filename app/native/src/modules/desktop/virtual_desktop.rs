//! In-memory desktop used by the CLI and the tests.
//!
//! Keeps everything the presentation layer would render: windows, cursor,
//! status line, the capped log stream and whiteboard strokes.

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

use super::{Desktop, Position, Stroke, StrokeOp, Viewport, Window};

/// Maximum number of log messages kept, newest first.
pub const LOG_CAPACITY: usize = 10;

/// Z-index given to the focused window.
const FOCUSED_Z_INDEX: i32 = 10;

/// Messages shown before anything has happened.
const INITIAL_LOG: [&str; 2] = ["Waiting for instructions...", "System ready."];

/// Mutable desktop state guarded by a single lock.
#[derive(Debug)]
struct DesktopState {
    viewport: Viewport,
    windows: Vec<Window>,
    canvases: HashSet<String>,
    cursor: Position,
    clicking: bool,
    status: String,
    logs: VecDeque<String>,
    strokes: HashMap<String, Vec<Stroke>>,
}

/// Point-in-time copy of the desktop, suitable for printing or asserting on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesktopSnapshot {
    pub viewport: Viewport,
    pub windows: Vec<Window>,
    pub cursor: Position,
    pub clicking: bool,
    pub status: String,
    pub logs: Vec<String>,
    pub strokes: HashMap<String, Vec<Stroke>>,
}

/// Thread-safe in-memory [`Desktop`].
pub struct VirtualDesktop {
    state: Mutex<DesktopState>,
    layout: watch::Sender<u64>,
}

impl VirtualDesktop {
    /// Creates a desktop with the given viewport and windows.
    ///
    /// The cursor starts at the viewport centre. A window with id
    /// `whiteboard` gets a drawing canvas.
    #[must_use]
    pub fn new(viewport: Viewport, windows: Vec<Window>) -> Self {
        let canvases = windows
            .iter()
            .filter(|w| w.id == "whiteboard")
            .map(|w| w.id.clone())
            .collect();
        let (layout, _) = watch::channel(0);

        Self {
            state: Mutex::new(DesktopState {
                viewport,
                windows,
                canvases,
                cursor: viewport.center(),
                clicking: false,
                status: "Idle".to_string(),
                logs: INITIAL_LOG.iter().map(ToString::to_string).collect(),
                strokes: HashMap::new(),
            }),
            layout,
        }
    }

    /// Attaches a drawing canvas to the window `id`.
    pub fn add_canvas(&self, id: &str) { self.state.lock().canvases.insert(id.to_string()); }

    /// Brings a window to the front.
    ///
    /// The focused window gets z-index 10; every other window drops by one,
    /// never below 1.
    pub fn focus_window(&self, id: &str) {
        {
            let mut state = self.state.lock();
            for win in &mut state.windows {
                win.z_index = if win.id == id {
                    FOCUSED_Z_INDEX
                } else {
                    (win.z_index - 1).max(1)
                };
            }
        }
        self.bump_layout();
    }

    /// Closes a window. Its geometry is kept.
    pub fn close_window(&self, id: &str) { self.update_window(id, |w| w.is_open = false); }

    /// Reopens a previously closed window.
    pub fn open_window(&self, id: &str) { self.update_window(id, |w| w.is_open = true); }

    /// Moves a window to a new origin.
    pub fn move_window(&self, id: &str, x: f64, y: f64) {
        self.update_window(id, |w| {
            w.x = x;
            w.y = y;
        });
    }

    /// Resizes the viewport.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.state.lock().viewport = viewport;
        self.bump_layout();
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> Position { self.state.lock().cursor }

    /// Whether the cursor is currently showing a click.
    #[must_use]
    pub fn is_clicking(&self) -> bool { self.state.lock().clicking }

    /// Current status line.
    #[must_use]
    pub fn status(&self) -> String { self.state.lock().status.clone() }

    /// Log messages, newest first.
    #[must_use]
    pub fn logs(&self) -> Vec<String> { self.state.lock().logs.iter().cloned().collect() }

    /// Strokes drawn on the canvas `surface`.
    #[must_use]
    pub fn strokes(&self, surface: &str) -> Vec<Stroke> {
        self.state.lock().strokes.get(surface).cloned().unwrap_or_default()
    }

    /// Copies the whole desktop state.
    #[must_use]
    pub fn snapshot(&self) -> DesktopSnapshot {
        let state = self.state.lock();
        DesktopSnapshot {
            viewport: state.viewport,
            windows: state.windows.clone(),
            cursor: state.cursor,
            clicking: state.clicking,
            status: state.status.clone(),
            logs: state.logs.iter().cloned().collect(),
            strokes: state.strokes.clone(),
        }
    }

    fn update_window(&self, id: &str, apply: impl FnOnce(&mut Window)) {
        let found = {
            let mut state = self.state.lock();
            state.windows.iter_mut().find(|w| w.id == id).map(apply).is_some()
        };

        if found {
            self.bump_layout();
        } else {
            tracing::debug!(window = id, "ghost: ignoring layout change for unknown window");
        }
    }

    fn bump_layout(&self) { self.layout.send_modify(|revision| *revision += 1); }
}

impl Default for VirtualDesktop {
    fn default() -> Self { Self::new(Viewport::default(), super::default_windows()) }
}

impl Desktop for VirtualDesktop {
    fn viewport(&self) -> Viewport { self.state.lock().viewport }

    fn windows(&self) -> Vec<Window> { self.state.lock().windows.clone() }

    fn drawing_surface(&self, surface: &str) -> Option<Window> {
        let state = self.state.lock();
        if !state.canvases.contains(surface) {
            return None;
        }
        state.windows.iter().find(|w| w.id == surface).cloned()
    }

    fn set_cursor(&self, position: Position) {
        tracing::trace!(x = position.x, y = position.y, "ghost: cursor frame");
        self.state.lock().cursor = position;
    }

    fn set_clicking(&self, clicking: bool) { self.state.lock().clicking = clicking; }

    fn set_status(&self, status: &str) {
        tracing::debug!(status, "ghost: status changed");
        status.clone_into(&mut self.state.lock().status);
    }

    fn append_log(&self, message: String) {
        tracing::info!(target: "ghost::desktop", "{message}");
        let mut state = self.state.lock();
        state.logs.push_front(message);
        state.logs.truncate(LOG_CAPACITY);
    }

    fn stroke(&self, surface: &str, op: StrokeOp) {
        let mut state = self.state.lock();
        let strokes = state.strokes.entry(surface.to_string()).or_default();

        match op {
            StrokeOp::Begin { at, style } => strokes.push(Stroke { style, points: vec![at] }),
            StrokeOp::LineTo(point) => {
                if let Some(current) = strokes.last_mut() {
                    current.points.push(point);
                } else {
                    tracing::debug!(surface, "ghost: line-to without an open path, ignored");
                }
            }
        }
    }

    fn layout_changes(&self) -> Option<watch::Receiver<u64>> { Some(self.layout.subscribe()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::desktop::{StrokeStyle, default_windows};

    fn desktop() -> VirtualDesktop {
        VirtualDesktop::new(Viewport::new(1000.0, 800.0), default_windows())
    }

    #[test]
    fn test_initial_state() {
        let desktop = desktop();
        assert_eq!(desktop.cursor(), Position::new(500.0, 400.0));
        assert_eq!(desktop.status(), "Idle");
        assert_eq!(desktop.logs(), vec!["Waiting for instructions...", "System ready."]);
        assert!(!desktop.is_clicking());
    }

    #[test]
    fn test_log_is_capped_newest_first() {
        let desktop = desktop();
        for i in 0..15 {
            desktop.append_log(format!("entry {i}"));
        }
        let logs = desktop.logs();
        assert_eq!(logs.len(), LOG_CAPACITY);
        assert_eq!(logs[0], "entry 14");
        assert_eq!(logs[9], "entry 5");
    }

    #[test]
    fn test_focus_window_reorders_z_index() {
        let desktop = desktop();
        desktop.focus_window("notepad");
        let windows = desktop.windows();
        let z = |id: &str| windows.iter().find(|w| w.id == id).unwrap().z_index;
        assert_eq!(z("notepad"), 10);
        assert_eq!(z("whiteboard"), 1);
        assert_eq!(z("files"), 2);
    }

    #[test]
    fn test_closed_window_keeps_geometry_but_leaves_title_list() {
        let desktop = desktop();
        desktop.close_window("notepad");

        assert_eq!(desktop.open_window_titles(), vec!["Whiteboard", "File Explorer"]);
        let notepad = desktop.find_window("Notepad").unwrap();
        assert!(!notepad.is_open);
        assert_eq!(notepad.center(), Position::new(200.0, 150.0));
    }

    #[test]
    fn test_layout_changes_bump_revision() {
        let desktop = desktop();
        let rx = desktop.layout_changes().unwrap();
        assert_eq!(*rx.borrow(), 0);

        desktop.move_window("files", 10.0, 10.0);
        desktop.close_window("files");
        assert_eq!(*rx.borrow(), 2);

        desktop.close_window("does-not-exist");
        assert_eq!(*rx.borrow(), 2);

        desktop.open_window("files");
        assert_eq!(*rx.borrow(), 3);
        assert_eq!(desktop.open_window_titles().len(), 3);

        desktop.set_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(*rx.borrow(), 4);
        assert_eq!(desktop.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn test_drawing_surface_requires_canvas() {
        let desktop = desktop();
        assert!(desktop.drawing_surface("whiteboard").is_some());
        assert!(desktop.drawing_surface("notepad").is_none());

        desktop.add_canvas("notepad");
        assert!(desktop.drawing_surface("notepad").is_some());
    }

    #[test]
    fn test_strokes_accumulate() {
        let desktop = desktop();
        let style = StrokeStyle::default();
        desktop.stroke("whiteboard", StrokeOp::Begin { at: Position::new(1.0, 1.0), style: style.clone() });
        desktop.stroke("whiteboard", StrokeOp::LineTo(Position::new(2.0, 2.0)));
        desktop.stroke("whiteboard", StrokeOp::Begin { at: Position::new(5.0, 5.0), style });

        let strokes = desktop.strokes("whiteboard");
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].points.len(), 2);
        assert_eq!(strokes[1].points.len(), 1);
    }

    #[test]
    fn test_line_to_without_path_is_ignored() {
        let desktop = desktop();
        desktop.stroke("whiteboard", StrokeOp::LineTo(Position::new(2.0, 2.0)));
        assert!(desktop.strokes("whiteboard").is_empty());
    }
}
