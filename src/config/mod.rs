// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
pub mod logging;
pub mod twitch;

pub use config::*;
pub use logging::*;
pub use twitch::*;
