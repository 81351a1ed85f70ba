//! Diagnostic logging setup.
//!
//! `RUST_LOG` wins when set. Otherwise Ghost's own targets log at a level
//! picked by `-v` and everything else at `warn`. Output goes to stderr so
//! JSON printed on stdout stays machine-readable.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::constants::LOG_TARGETS;
use crate::error::GhostError;

/// Output format of the diagnostic log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line records.
    #[default]
    Compact,
    /// Multi-line, human-friendly records.
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

/// Level used for Ghost's own targets at the given `-v` count.
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Filter directives used when `RUST_LOG` is not set.
#[must_use]
pub fn default_directives(verbosity: u8) -> String {
    let level = level_for(verbosity);
    let mut directives: Vec<String> =
        LOG_TARGETS.iter().map(|target| format!("{target}={level}")).collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbosity: u8, format: LogFormat) -> Result<(), GhostError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Compact => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).try_init()
        }
        LogFormat::Pretty => {
            registry.with(fmt::layer().pretty().with_writer(std::io::stderr)).try_init()
        }
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_ansi(false))
            .try_init(),
    };

    result.map_err(|err| GhostError::CommandError(format!("Failed to initialize logging: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), "info");
        assert_eq!(level_for(1), "debug");
        assert_eq!(level_for(2), "trace");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(1), "ghost=debug,ghost_lib=debug,warn");
    }

    #[test]
    fn test_default_directives_parse() {
        for verbosity in 0..3 {
            assert!(EnvFilter::try_new(default_directives(verbosity)).is_ok());
        }
    }
}
