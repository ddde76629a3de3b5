//! Launcher error taxonomy
//!
//! Every failure the launcher can hit maps to exactly one variant, so the
//! entry point can decide exit behaviour in one place.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = LauncherError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("unsupported platform: {os} ({arch})")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("failed to inspect install directory {}: {source}", .path.display())]
    InstallCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("install path {} exists but is not an application bundle", .0.display())]
    InstallPathNotDirectory(PathBuf),

    #[error("application is not installed: {} is missing", .0.display())]
    NotInstalled(PathBuf),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("release index request for {repo} failed: {source}")]
    ReleaseIndex {
        repo: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("release index returned malformed data for {repo}: {source}")]
    ReleaseDecode {
        repo: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("release index error for {repo}: HTTP {status}")]
    ReleaseIndexStatus {
        repo: String,
        status: reqwest::StatusCode,
    },

    #[error("no release asset named {expected} in release {tag}")]
    AssetNotFound { expected: String, tag: String },

    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("failed to extract {}: {reason}", .archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    /// Extraction finished but the bundle cannot launch, typically a missing
    /// framework binary (dyld "Library not loaded: @rpath/...").
    #[error(
        "installed bundle {} is broken: {} is missing or dangling",
        .bundle.display(),
        .missing.display()
    )]
    BrokenInstall { bundle: PathBuf, missing: PathBuf },

    #[error("failed to launch {}: {reason}", .binary.display())]
    LaunchFailed { binary: PathBuf, reason: String },

    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl LauncherError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::UnsupportedPlatform { .. } => 2,
            _ => 1,
        }
    }

    pub(crate) fn download(url: &str, reason: impl std::fmt::Display) -> Self {
        LauncherError::DownloadFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn extraction(archive: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        LauncherError::ExtractionFailed {
            archive: archive.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
