//! Ghost - an autonomous cursor for a simulated desktop.
//!
//! The library holds the autopilot core and the CLI built on top of it:
//!
//! - [`modules::motion`] interpolates cursor glides frame by frame.
//! - [`modules::autopilot`] owns the action queue and runs the dispatch
//!   tick, the wander controller and the plan refill loop.
//! - [`modules::planner`] produces action plans (hosted model, local
//!   improvisation or a replayed file).
//! - [`modules::desktop`] is the presentation collaborator, with an
//!   in-memory implementation.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod modules;
pub mod schema;
pub mod utils;
