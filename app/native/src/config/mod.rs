//! Ghost configuration.
//!
//! Files are JSONC, so `//` and `/* */` comments are accepted. Every
//! section is optional and falls back to its defaults.

pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    ConfigError, DrawingConfig, FallbackPolicy, GhostConfig, MotionConfig, PlannerConfig,
    PlannerProvider, RefillConfig, SchedulerConfig, WanderConfig, config_paths,
    load_config as load_config_default, load_config_from_path,
};

/// Process-wide configuration, loaded on first access.
static CONFIG: OnceLock<GhostConfig> = OnceLock::new();

/// File the configuration came from. Unset when running on defaults.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Path given with `--config`.
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Makes the next load read `path` and skip the search paths.
///
/// Has no effect once [`get_config`] has run. Returns `false` if an
/// override was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

fn load_or_default() -> GhostConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "ghost: configuration loaded");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("ghost: no configuration file, running on defaults");
            GhostConfig::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "ghost: configuration unreadable, running on defaults");
            GhostConfig::default()
        }
    }
}

/// The process-wide configuration.
///
/// The first call loads it; a missing or broken file yields the defaults.
pub fn get_config() -> &'static GhostConfig { CONFIG.get_or_init(load_or_default) }

/// File the configuration was read from, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }
