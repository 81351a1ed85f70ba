#![allow(clippy::multiple_crate_versions)]

//! Ghost - an autonomous cursor that wanders, clicks and draws across a
//! simulated desktop.

fn main() {
    // A missing .env file is fine; the planner falls back to local plans.
    let _ = dotenvy::dotenv();

    if let Err(err) = ghost_lib::cli::run() {
        eprintln!("ghost: {err}");
        std::process::exit(1);
    }
}
