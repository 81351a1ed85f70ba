//! Ghost feature modules.

pub mod autopilot;
pub mod desktop;
pub mod motion;
pub mod planner;
