use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, Result};

/// Overrides `api_base_url`, mainly for mirrors and tests
pub const API_URL_ENV: &str = "FLOWSER_LAUNCHER_API_URL";

/// Launcher configuration. Every field has a default, so an empty or absent
/// file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Application name, used for bundle, binary and asset names
    pub app_name: String,
    /// Release repository owner
    pub owner: String,
    /// Release repository name
    pub repo: String,
    pub api_base_url: String,
    pub user_agent: String,
    /// Replaces the platform application directory when set
    pub install_root: Option<PathBuf>,
    /// Where the archive is downloaded; current directory when unset
    pub download_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    /// Abort a download after this long without data
    pub inactivity_timeout_secs: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            app_name: "Flowser".to_string(),
            owner: "onflowser".to_string(),
            repo: "flowser".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            user_agent: format!("flowser-launcher/{}", env!("CARGO_PKG_VERSION")),
            install_root: None,
            download_dir: None,
            connect_timeout_secs: 30,
            inactivity_timeout_secs: 300,
        }
    }
}

/// `<config dir>/flowser-launcher/launcher.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flowser-launcher").join("launcher.toml"))
}

impl LauncherConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is read
    /// when present and built-in defaults are used otherwise. Nothing is ever
    /// written back.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("No launcher config found, using defaults");
                    Self::default()
                }
            },
        };

        Ok(config.with_api_override(std::env::var(API_URL_ENV).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LauncherError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&text).map_err(|reason| LauncherError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        info!("Using config from: {}", path.display());
        Ok(config)
    }

    fn from_toml(text: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(text).map_err(|e| e.to_string())?;
        if config.app_name.trim().is_empty() {
            return Err("app_name must not be empty".to_string());
        }
        if config.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be positive".to_string());
        }
        if config.inactivity_timeout_secs == 0 {
            return Err("inactivity_timeout_secs must be positive".to_string());
        }
        Ok(config)
    }

    fn with_api_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            debug!("{API_URL_ENV} overrides release index URL: {url}");
            self.api_base_url = url;
        }
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
