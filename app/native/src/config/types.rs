//! Configuration sections, their defaults and the JSONC file loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::modules::desktop::{LineStyle, Position, StrokeStyle, Viewport, Window, default_windows};

/// Periodic timers need a non-zero period; `0` is read as 1 ms.
const fn period_from_millis(ms: u64) -> Duration {
    Duration::from_millis(if ms == 0 { 1 } else { ms })
}

// ============================================================================
// Motion
// ============================================================================

/// Directed-motion and click settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionConfig {
    /// Interval between published cursor frames, in milliseconds.
    /// Default: 16 (about 60 frames per second)
    pub frame_interval_ms: u64,

    /// Duration of a MOVE or CLICK glide, in milliseconds.
    /// Default: 1200
    pub directed_duration_ms: u64,

    /// How long a click is held, in milliseconds.
    /// Default: 300
    pub click_dwell_ms: u64,

    /// Maximum random offset (pixels, each axis) added to window targets.
    /// Default: 10
    pub target_jitter: f64,

    /// Where MOVE and CLICK go when they name nothing resolvable.
    /// Default: { "x": 500, "y": 500 }
    pub fallback_position: Position,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            directed_duration_ms: 1200,
            click_dwell_ms: 300,
            target_jitter: 10.0,
            fallback_position: Position::new(500.0, 500.0),
        }
    }
}

impl MotionConfig {
    #[must_use]
    pub const fn frame_interval(&self) -> Duration { period_from_millis(self.frame_interval_ms) }

    #[must_use]
    pub const fn directed_duration(&self) -> Duration {
        Duration::from_millis(self.directed_duration_ms)
    }

    #[must_use]
    pub const fn click_dwell(&self) -> Duration { Duration::from_millis(self.click_dwell_ms) }
}

// ============================================================================
// Wander
// ============================================================================

/// Idle wandering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WanderConfig {
    /// How often the wander controller checks whether it may move, in milliseconds.
    /// Default: 100
    pub interval_ms: u64,

    /// Distance kept from every viewport edge when picking a destination.
    /// Default: 100
    pub margin: f64,

    /// Shortest wander glide, in milliseconds.
    /// Default: 2000
    pub min_duration_ms: u64,

    /// Longest wander glide, in milliseconds.
    /// Default: 4000
    pub max_duration_ms: u64,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            margin: 100.0,
            min_duration_ms: 2000,
            max_duration_ms: 4000,
        }
    }
}

impl WanderConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration { period_from_millis(self.interval_ms) }

    #[must_use]
    pub const fn min_duration(&self) -> Duration { Duration::from_millis(self.min_duration_ms) }

    #[must_use]
    pub const fn max_duration(&self) -> Duration { Duration::from_millis(self.max_duration_ms) }
}

// ============================================================================
// Scheduler / Refill
// ============================================================================

/// Main scheduler tick settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Period of the dispatch tick, in milliseconds.
    /// Default: 100
    pub tick_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self { Self { tick_interval_ms: 100 } }
}

impl SchedulerConfig {
    #[must_use]
    pub const fn tick_interval(&self) -> Duration { period_from_millis(self.tick_interval_ms) }
}

/// What to enqueue when the planner fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// A single MOVE to a random viewport point.
    #[default]
    SyntheticMove,
    /// Nothing; wandering continues until the next refill.
    Empty,
}

/// Plan refill settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RefillConfig {
    /// How often the refill trigger is re-evaluated without a wake-up, in milliseconds.
    /// Default: 250
    pub poll_interval_ms: u64,

    /// Pause before asking again after an empty or discarded plan, in milliseconds.
    /// Default: 1000
    pub empty_plan_backoff_ms: u64,

    /// Plan used when the planner fails.
    /// Default: "synthetic-move"
    pub fallback: FallbackPolicy,
}

impl Default for RefillConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            empty_plan_backoff_ms: 1000,
            fallback: FallbackPolicy::SyntheticMove,
        }
    }
}

impl RefillConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration { period_from_millis(self.poll_interval_ms) }

    #[must_use]
    pub const fn empty_plan_backoff(&self) -> Duration {
        Duration::from_millis(self.empty_plan_backoff_ms)
    }
}

// ============================================================================
// Drawing
// ============================================================================

/// Whiteboard drawing settings.
///
/// A normalized point `(u, v)` maps to the screen as
/// `(x + marginX + u * (width - 2 * marginX), y + marginTop + v * (height - marginTop - marginBottom))`
/// and to the canvas by subtracting the window origin and `titleBarHeight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawingConfig {
    /// Id of the window whose canvas receives strokes.
    /// Default: "whiteboard"
    pub surface: String,

    /// Glide duration between consecutive path points, in milliseconds.
    /// Default: 150
    pub segment_duration_ms: u64,

    /// Left and right inset of the drawable area.
    /// Default: 20
    pub margin_x: f64,

    /// Top inset of the drawable area, measured from the window frame.
    /// Default: 50
    pub margin_top: f64,

    /// Bottom inset of the drawable area.
    /// Default: 30
    pub margin_bottom: f64,

    /// Height of the title bar above the canvas.
    /// Default: 40
    pub title_bar_height: f64,

    /// Stroke colour.
    /// Default: "#8b5cf6"
    pub stroke_color: String,

    /// Stroke width in pixels.
    /// Default: 4
    pub stroke_width: f64,

    /// Cap and join of strokes: "round" or "square".
    /// Default: "round"
    pub stroke_line_style: LineStyle,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            surface: "whiteboard".to_string(),
            segment_duration_ms: 150,
            margin_x: 20.0,
            margin_top: 50.0,
            margin_bottom: 30.0,
            title_bar_height: 40.0,
            stroke_color: "#8b5cf6".to_string(),
            stroke_width: 4.0,
            stroke_line_style: LineStyle::Round,
        }
    }
}

impl DrawingConfig {
    #[must_use]
    pub const fn segment_duration(&self) -> Duration {
        Duration::from_millis(self.segment_duration_ms)
    }

    /// Style applied to every stroke drawn on the surface.
    #[must_use]
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.stroke_color.clone(),
            width: self.stroke_width,
            cap: self.stroke_line_style,
            join: self.stroke_line_style,
        }
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Which planner produces action plans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlannerProvider {
    /// Hosted Gemini model.
    #[default]
    Gemini,
    /// Offline improvisation.
    Local,
}

/// Planner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Planner backend.
    /// Default: "gemini"
    pub provider: PlannerProvider,

    /// Model name.
    /// Default: "gemini-3-flash-preview"
    pub model: String,

    /// Base URL of the generative language API.
    /// Default: "https://generativelanguage.googleapis.com/v1beta"
    pub endpoint: String,

    /// Environment variables checked, in order, for the API key.
    /// Default: ["GEMINI_API_KEY", "API_KEY"]
    pub api_key_env: Vec<String>,

    /// Request timeout in milliseconds. Absent means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Fewest actions requested per plan.
    /// Default: 3
    pub min_actions: usize,

    /// Most actions requested per plan.
    /// Default: 5
    pub max_actions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: PlannerProvider::Gemini,
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: vec!["GEMINI_API_KEY".to_string(), "API_KEY".to_string()],
            timeout_ms: None,
            min_actions: 3,
            max_actions: 5,
        }
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure for Ghost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GhostConfig {
    /// JSON Schema reference for editor support.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Simulated screen size.
    pub viewport: Viewport,

    /// Directed motion and clicks.
    pub motion: MotionConfig,

    /// Idle wandering.
    pub wander: WanderConfig,

    /// Dispatch tick.
    pub scheduler: SchedulerConfig,

    /// Plan refill.
    pub refill: RefillConfig,

    /// Whiteboard drawing.
    pub drawing: DrawingConfig,

    /// Action planner.
    pub planner: PlannerConfig,

    /// Initial desktop layout.
    pub windows: Vec<Window>,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            schema: None,
            viewport: Viewport::default(),
            motion: MotionConfig::default(),
            wander: WanderConfig::default(),
            scheduler: SchedulerConfig::default(),
            refill: RefillConfig::default(),
            drawing: DrawingConfig::default(),
            planner: PlannerConfig::default(),
            windows: default_windows(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found.
    #[error(
        "No configuration file found. Expected at ~/.config/ghost/config.jsonc, \
         the platform config directory, or ~/.ghost.jsonc"
    )]
    NotFound,
    /// Error reading the configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing the configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// File names looked up in each config directory, first match wins.
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Dotfile names looked up directly in the home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".ghost.jsonc", ".ghost.json"];

/// Candidate configuration files, most specific first.
///
/// Each location is tried as `.jsonc` and then `.json`:
/// 1. `$XDG_CONFIG_HOME/ghost/config.jsonc` if the variable is set
/// 2. `~/.config/ghost/config.jsonc` or `config.json`
/// 3. the platform config directory (`dirs::config_dir()/ghost/`)
/// 4. `~/.ghost.jsonc` or `~/.ghost.json` (legacy/simple location)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let push_dir = |dir: PathBuf, paths: &mut Vec<PathBuf>| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(PathBuf::from(xdg_config).join("ghost"), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join("ghost"), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join("ghost"), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_from_path(path: &Path) -> Result<(GhostConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: GhostConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first existing default location.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no file exists, or a read/parse error.
pub fn load_config() -> Result<(GhostConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}
