//! Installation state detection
//!
//! The application counts as installed when its bundle directory exists at
//! the platform install path. No version metadata is kept, so an outdated
//! install is indistinguishable from a current one.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{LauncherError, Result};

/// Installation state enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationState {
    /// Bundle directory present
    Installed,
    /// Nothing at the install path
    NotInstalled,
}

/// Check whether an application bundle exists at `path`
///
/// Returns:
/// - `Installed` if `path` is a directory
/// - `NotInstalled` if `path` does not exist
/// - `Err(InstallPathNotDirectory)` if something else occupies `path`
/// - `Err(InstallCheck)` for any other stat failure (permissions, I/O)
pub fn check_installation_state(path: &Path) -> Result<InstallationState> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(InstallationState::Installed),
        Ok(_) => Err(LauncherError::InstallPathNotDirectory(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(InstallationState::NotInstalled),
        Err(source) => Err(LauncherError::InstallCheck {
            path: path.to_path_buf(),
            source,
        }),
    }
}
