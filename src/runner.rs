//! Launch the installed application against a project

use std::ffi::OsString;
use std::path::Path;

use log::info;

use crate::error::{LauncherError, Result};

/// `--project-path=<project>`
pub fn project_path_arg(project: &Path) -> OsString {
    let mut arg = OsString::from("--project-path=");
    arg.push(project.as_os_str());
    arg
}

/// Start `executable` with the project flag and wait for it to exit.
///
/// No timeout is applied; the call returns when the application quits.
pub async fn run_application(executable: &Path, project: &Path) -> Result<()> {
    info!(
        "Launching {} for project {}",
        executable.display(),
        project.display()
    );

    let status = tokio::process::Command::new(executable)
        .arg(project_path_arg(project))
        .status()
        .await
        .map_err(|e| LauncherError::LaunchFailed {
            binary: executable.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(LauncherError::LaunchFailed {
            binary: executable.to_path_buf(),
            reason: format!("exited with {status}"),
        });
    }

    Ok(())
}
