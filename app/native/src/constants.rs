//! Application-wide constants.

/// Binary and configuration directory name.
pub const APP_NAME: &str = "ghost";

/// Application version from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `$id` of the configuration JSON Schema.
pub const SCHEMA_ID: &str = "https://ghost-cursor.dev/schema/config.json";

/// Crates whose diagnostics follow the `-v` level; everything else logs at warn.
pub const LOG_TARGETS: &[&str] = &["ghost", "ghost_lib"];
