//! Command-line surface of the `ghost` binary.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};
use tokio::runtime::Runtime;

use super::output;
use crate::config::{self, GhostConfig};
use crate::constants::{APP_NAME, APP_VERSION};
use crate::error::GhostError;
use crate::logging::{self, LogFormat};
use crate::modules::autopilot::Autopilot;
use crate::modules::desktop::{Desktop, DesktopSnapshot, VirtualDesktop, Window};
use crate::modules::planner::{self, ActionPlan, FilePlanner, PlanRequest, Planner};
use crate::schema;
use crate::utils::random::RandomSource;

/// Ghost CLI - an autonomous cursor for a simulated desktop.
#[derive(Parser, Debug)]
#[command(name = "ghost")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Read configuration from this JSONC file instead of searching for one.
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Increase diagnostic verbosity (-v debug, -vv trace).
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Diagnostic log format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands of `ghost`.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run the autopilot against the in-memory desktop.
    ///
    /// Runs until Ctrl-C, or until --duration-secs elapses, then prints the
    /// final desktop state.
    Run(RunArgs),

    /// Request a single plan and print it.
    Plan {
        /// Use the local planner instead of the hosted model.
        #[arg(long)]
        offline: bool,

        /// Seed for the local planner.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the configured window layout.
    Windows {
        /// Print JSON instead of a table.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Print the JSON Schema of the configuration file.
    ///
    /// Point an editor at the output to get completion and validation
    /// while editing `config.jsonc`.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(ghost completions --shell zsh)"
    ///   ghost completions --shell fish > ~/.config/fish/completions/ghost.fish
    Completions {
        /// Target shell.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// Arguments of `ghost run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Seed for jitter, wander targets and fallback plans.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the local planner instead of the hosted model.
    #[arg(long)]
    pub offline: bool,

    /// Replay the plan in this JSON file on every refill.
    #[arg(long, value_name = "PATH")]
    pub plan_file: Option<PathBuf>,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long, value_name = "SECONDS")]
    pub duration_secs: Option<u64>,

    /// Print the final desktop state as JSON.
    #[arg(long, short = 'j')]
    pub json: bool,
}

impl Cli {
    /// The `--config` override, if given.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Fails when the config path does not exist or the subcommand fails.
    pub fn execute(&self) -> Result<(), GhostError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(GhostError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Run(args) => {
                logging::init(self.verbose, self.log_format)?;
                execute_run(config::get_config(), args)
            }
            Commands::Plan { offline, seed } => {
                logging::init(self.verbose, self.log_format)?;
                execute_plan(config::get_config(), *offline, *seed)
            }
            Commands::Windows { json } => {
                execute_windows(&config::get_config().windows, *json);
                Ok(())
            }
            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Writes the completion script for `generator` to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_NAME, &mut io::stdout());
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Single-threaded runtime shared by every async command.
fn runtime() -> Result<Runtime, GhostError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| GhostError::RuntimeError(err.to_string()))
}

/// Builds the in-memory desktop described by `config`.
fn build_desktop(config: &GhostConfig) -> Arc<VirtualDesktop> {
    let desktop = VirtualDesktop::new(config.viewport, config.windows.clone());
    desktop.add_canvas(&config.drawing.surface);
    Arc::new(desktop)
}

/// Picks the planner: a plan file wins, then the configured provider.
fn build_planner(
    config: &GhostConfig,
    offline: bool,
    plan_file: Option<&Path>,
    rng: Arc<RandomSource>,
) -> Result<Arc<dyn Planner>, GhostError> {
    if let Some(path) = plan_file {
        let planner = FilePlanner::load(path)?;
        tracing::info!(path = %path.display(), actions = planner.actions().len(), "ghost: replaying plan file");
        return Ok(Arc::new(planner));
    }
    Ok(planner::from_config(&config.planner, offline, rng))
}

// ============================================================================
// run
// ============================================================================

fn execute_run(config: &GhostConfig, args: &RunArgs) -> Result<(), GhostError> {
    let duration = match args.duration_secs {
        Some(0) => {
            return Err(GhostError::InvalidArguments(
                "--duration-secs must be greater than zero".to_string(),
            ));
        }
        secs => secs.map(Duration::from_secs),
    };

    tracing::info!(
        config = ?config::get_config_path(),
        seed = ?args.seed,
        "ghost: starting run"
    );

    let rng = Arc::new(RandomSource::new(args.seed));
    let desktop = build_desktop(config);
    let planner = build_planner(config, args.offline, args.plan_file.as_deref(), rng.clone())?;

    let snapshot = runtime()?.block_on(async {
        let autopilot = Autopilot::new(desktop.clone(), planner, config.clone())
            .with_rng(rng)
            .spawn();
        autopilot.enable();

        let stopped = match duration {
            Some(duration) => {
                tokio::select! {
                    () = tokio::time::sleep(duration) => Ok(()),
                    signal = tokio::signal::ctrl_c() => signal,
                }
            }
            None => tokio::signal::ctrl_c().await,
        };

        autopilot.shutdown().await;
        stopped.map(|()| desktop.snapshot())
    })?;

    print_snapshot(&snapshot, args.json)
}

fn print_snapshot(snapshot: &DesktopSnapshot, json: bool) -> Result<(), GhostError> {
    if json {
        output::print_highlighted_json(&serde_json::to_value(snapshot)?);
        return Ok(());
    }

    let strokes: usize = snapshot.strokes.values().map(Vec::len).sum();
    println!("{} {}", "Cursor:".bold(), output::format_pair(snapshot.cursor.x, snapshot.cursor.y));
    println!("{} {}", "Status:".bold(), snapshot.status);
    println!("{} {strokes}", "Strokes:".bold());
    println!("{}", "Log (newest first):".bold());
    for line in &snapshot.logs {
        println!("  {line}");
    }
    Ok(())
}

// ============================================================================
// plan
// ============================================================================

fn execute_plan(config: &GhostConfig, offline: bool, seed: Option<u64>) -> Result<(), GhostError> {
    let desktop = build_desktop(config);
    let planner = build_planner(config, offline, None, Arc::new(RandomSource::new(seed)))?;
    let request = PlanRequest {
        open_windows: desktop.open_window_titles(),
        viewport: desktop.viewport(),
    };

    let actions = runtime()?.block_on(planner.request_plan(&request))?;
    output::print_highlighted_json(&serde_json::to_value(ActionPlan { actions })?);
    Ok(())
}

// ============================================================================
// windows
// ============================================================================

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Z")]
    z_index: i32,
    #[tabled(rename = "Open")]
    open: String,
}

impl From<&Window> for WindowRow {
    fn from(window: &Window) -> Self {
        Self {
            id: window.id.clone(),
            title: output::truncate(&window.title, 24),
            position: output::format_pair(window.x, window.y),
            size: format!("{}×{}", window.width, window.height),
            z_index: window.z_index,
            open: output::format_bool(window.is_open),
        }
    }
}

fn execute_windows(windows: &[Window], json: bool) {
    if json {
        let value = serde_json::to_value(windows).unwrap_or_default();
        output::print_highlighted_json(&value);
        return;
    }

    if windows.is_empty() {
        println!("{}", "No windows configured.".dimmed());
        return;
    }

    let rows: Vec<WindowRow> = windows.iter().map(WindowRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()))
        .with(Modify::new(Columns::last()).with(Alignment::center()))
        .to_string();

    println!("{}", format!("Windows ({})", windows.len()).bold());
    println!("{table}");
}
