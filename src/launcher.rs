//! Install-then-run flow over the detected platform
//!
//! `Launcher` exposes the platform capability set (installation check,
//! installation, launch, asset naming). On an unsupported platform every
//! operation returns `UnsupportedPlatform` before touching the network or the
//! filesystem.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::LauncherConfig;
use crate::detection::{InstallationState, check_installation_state};
use crate::download::{
    Platform, ReleaseAsset, ReleaseClient, download_archive, extract_zip, release_version,
    select_asset, verify_bundle,
};
use crate::error::{LauncherError, Result};
use crate::runner::run_application;

/// A freshly installed application bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApplication {
    pub bundle: PathBuf,
    pub executable: PathBuf,
    pub version: String,
}

/// Result of [`Launcher::ensure_installed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled(PathBuf),
    Installed(InstalledApplication),
}

pub struct Launcher {
    config: LauncherConfig,
    platform: Platform,
    releases: ReleaseClient,
}

impl Launcher {
    pub fn new(config: LauncherConfig, platform: Platform) -> Result<Self> {
        let releases = ReleaseClient::new(
            &config.api_base_url,
            &config.user_agent,
            config.connect_timeout(),
        )?;
        Ok(Self {
            config,
            platform,
            releases,
        })
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Directory bundles are extracted into
    pub fn install_root(&self) -> Result<PathBuf> {
        self.platform.ensure_supported()?;
        match &self.config.install_root {
            Some(root) => Ok(root.clone()),
            None => self.platform.default_install_root(),
        }
    }

    /// Expected bundle location, e.g. `/Applications/Flowser.app`
    pub fn install_dir(&self) -> Result<PathBuf> {
        let root = self.install_root()?;
        Ok(self.platform.bundle_dir(&root, &self.config.app_name))
    }

    fn executable_in(&self, bundle: &Path) -> PathBuf {
        self.platform.executable(bundle, &self.config.app_name)
    }

    pub fn is_installed(&self) -> Result<bool> {
        let state = check_installation_state(&self.install_dir()?)?;
        Ok(state == InstallationState::Installed)
    }

    /// Release asset name for `version` on this platform
    pub fn asset_name(&self, version: &str) -> Result<String> {
        self.platform.asset_name(&self.config.app_name, version)
    }

    /// Resolve the latest release artifact for this platform
    pub async fn latest_release(&self) -> Result<ReleaseAsset> {
        self.platform.ensure_supported()?;

        let release = self
            .releases
            .get_latest_release(&self.config.owner, &self.config.repo)
            .await?;
        let expected = self.asset_name(release_version(&release.tag_name))?;
        select_asset(&release, &expected)
    }

    /// Download and unpack the latest release.
    ///
    /// The downloaded archive is removed on every exit path. A bundle created
    /// by a failed extraction or verification is removed as well, so the next
    /// run does not mistake it for an installation.
    pub async fn install(&self) -> Result<InstalledApplication> {
        let root = self.install_root()?;
        let bundle = self.platform.bundle_dir(&root, &self.config.app_name);
        let executable = self.executable_in(&bundle);

        let asset = self.latest_release().await?;
        info!(
            "Downloading latest {} release {}",
            self.config.app_name, asset.version
        );

        let archive = download_archive(
            self.releases.http(),
            &asset,
            &self.config.download_dir(),
            self.config.inactivity_timeout(),
        )
        .await?;

        info!("Extracting {} into {}", asset.name, root.display());
        let bundle_existed = std::fs::symlink_metadata(&bundle).is_ok();
        let unpacked = match extract_zip(archive.path(), &root).await {
            Ok(_) => verify_bundle(&bundle, &executable),
            Err(e) => Err(e),
        };
        drop(archive);

        if let Err(err) = &unpacked
            && matches!(err, LauncherError::BrokenInstall { .. })
        {
            warn!("Extraction finished but the bundle will not launch: {err}");
        }
        if unpacked.is_err() && !bundle_existed {
            discard_partial_bundle(&bundle);
        }
        unpacked?;

        Ok(InstalledApplication {
            bundle,
            executable,
            version: asset.version,
        })
    }

    /// Install unless the bundle is already present
    pub async fn ensure_installed(&self) -> Result<InstallOutcome> {
        let bundle = self.install_dir()?;
        if self.is_installed()? {
            return Ok(InstallOutcome::AlreadyInstalled(bundle));
        }
        info!("{} not found at {}", self.config.app_name, bundle.display());
        self.install().await.map(InstallOutcome::Installed)
    }

    /// Launch the installed application on `project` and wait for it to exit
    pub async fn run(&self, project: &Path) -> Result<()> {
        let bundle = self.install_dir()?;
        let executable = self.executable_in(&bundle);
        if !executable.is_file() {
            return Err(LauncherError::NotInstalled(executable));
        }
        run_application(&executable, project).await
    }
}

fn discard_partial_bundle(bundle: &Path) {
    match std::fs::remove_dir_all(bundle) {
        Ok(()) => info!("Removed incomplete bundle {}", bundle.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove incomplete bundle {}: {}",
            bundle.display(),
            e
        ),
    }
}
