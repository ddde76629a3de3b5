//! Flowser bootstrap launcher
//!
//! Checks whether the Flowser desktop app is installed, installs the latest
//! GitHub release when it is not, and launches it against a project.

pub mod config;
pub mod detection;
pub mod download;
pub mod error;
pub mod launcher;
pub mod runner;

pub use config::LauncherConfig;
pub use detection::{InstallationState, check_installation_state};
pub use download::Platform;
pub use error::{LauncherError, Result};
pub use launcher::{InstallOutcome, InstalledApplication, Launcher};
