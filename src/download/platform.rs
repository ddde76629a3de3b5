//! Platform detection for release asset selection

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::error::{LauncherError, Result};

/// Platform the launcher is running on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// macOS, Apple Silicon when `arm` is set
    MacOs { arm: bool },
    /// Anything without an install branch
    Unsupported { os: String, arch: String },
}

/// Global cache for platform detection (initialized once, used everywhere)
static PLATFORM_CACHE: OnceCell<Platform> = OnceCell::new();

/// Root that macOS application bundles live under
const MACOS_APPLICATIONS: &str = "/Applications";

impl Platform {
    /// Detect current platform (cached after first call)
    pub fn detect() -> Self {
        PLATFORM_CACHE
            .get_or_init(|| Self::from_parts(std::env::consts::OS, std::env::consts::ARCH))
            .clone()
    }

    /// Map an OS/architecture pair onto a platform.
    ///
    /// Accepts both Rust (`macos`, `aarch64`) and Go-style (`darwin`, `arm64`)
    /// identifiers.
    pub fn from_parts(os: &str, arch: &str) -> Self {
        match os {
            "macos" | "darwin" => Platform::MacOs {
                arm: is_arm_arch(arch),
            },
            _ => Platform::Unsupported {
                os: os.to_string(),
                arch: arch.to_string(),
            },
        }
    }

    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Platform::MacOs { .. } => Ok(()),
            Platform::Unsupported { os, arch } => Err(unsupported(os, arch)),
        }
    }

    /// Suffix release assets carry for this OS
    fn os_suffix(&self) -> Result<&'static str> {
        match self {
            Platform::MacOs { .. } => Ok("mac"),
            Platform::Unsupported { os, arch } => Err(unsupported(os, arch)),
        }
    }

    /// Release asset file name for `app` at `version`,
    /// e.g. `Flowser-1.2.3-arm64-mac.zip`.
    pub fn asset_name(&self, app: &str, version: &str) -> Result<String> {
        let os_suffix = self.os_suffix()?;
        let arch_suffix = match self {
            Platform::MacOs { arm: true } => "arm64-",
            _ => "",
        };
        Ok(format!("{app}-{version}-{arch_suffix}{os_suffix}.zip"))
    }

    /// Directory application bundles are extracted into
    pub fn default_install_root(&self) -> Result<PathBuf> {
        self.ensure_supported()?;
        Ok(PathBuf::from(MACOS_APPLICATIONS))
    }

    /// `<root>/<app>.app`
    pub fn bundle_dir(&self, root: &Path, app: &str) -> PathBuf {
        root.join(format!("{app}.app"))
    }

    /// Native binary inside a bundle: `<bundle>/Contents/MacOS/<app>`
    pub fn executable(&self, bundle: &Path, app: &str) -> PathBuf {
        bundle.join("Contents").join("MacOS").join(app)
    }
}

fn unsupported(os: &str, arch: &str) -> LauncherError {
    LauncherError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    }
}

/// Any ARM variant: `arm`, `arm64`, `armv7`, and Rust's `aarch64`.
pub fn is_arm_arch(arch: &str) -> bool {
    arch.starts_with("arm") || arch.starts_with("aarch64")
}
