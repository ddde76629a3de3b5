//! GitHub release download and package extraction
//!
//! This module resolves the platform-specific release asset from the GitHub
//! release index, downloads it and unpacks the application bundle.
//!
//! ## Module Organization
//!
//! - `platform` - Platform detection and asset naming
//! - `github` - GitHub API interaction for release discovery
//! - `core` - Archive download with progress tracking and scoped cleanup
//! - `extract` - ZIP extraction and bundle verification

mod core;
mod extract;
mod github;
mod platform;

// Re-export public API
pub use self::core::{DownloadedArchive, download_archive};
pub use extract::{extract_zip, verify_bundle};
pub use github::{GitHubAsset, GitHubRelease, ReleaseAsset, ReleaseClient, release_version, select_asset};
pub use platform::{Platform, is_arm_arch};
