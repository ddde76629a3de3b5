//! Release archive download with progress tracking

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use super::github::ReleaseAsset;
use crate::error::{LauncherError, Result};

/// Downloaded archive on disk, removed when dropped.
///
/// The guard is taken as soon as the file has been created, so a partial
/// download is cleaned up as reliably as a complete one. A file already sitting
/// at the path is left alone when the request itself fails.
#[derive(Debug)]
pub struct DownloadedArchive {
    path: PathBuf,
}

impl DownloadedArchive {
    fn claim(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DownloadedArchive {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed downloaded archive {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove downloaded archive {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Stream `asset` into `dir/<asset.name>`.
///
/// Fails if no bytes arrive for `inactivity`.
pub async fn download_archive(
    client: &reqwest::Client,
    asset: &ReleaseAsset,
    dir: &Path,
    inactivity: Duration,
) -> Result<DownloadedArchive> {
    let url = asset.download_url.as_str();
    let path = dir.join(&asset.name);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LauncherError::download(url, e))?;
    let mut response = response
        .error_for_status()
        .map_err(|e| LauncherError::download(url, e))?;

    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| LauncherError::download(url, format!("cannot create {}: {e}", path.display())))?;
    let archive = DownloadedArchive::claim(path);

    let total_bytes = response.content_length().filter(|n| *n > 0).unwrap_or(asset.size);
    let bar = progress_bar(total_bytes, &asset.name);
    let mut downloaded: u64 = 0;

    loop {
        let chunk = match timeout(inactivity, response.chunk()).await {
            Ok(Ok(Some(chunk))) => chunk,
            Ok(Ok(None)) => break,
            Ok(Err(e)) => {
                bar.abandon();
                return Err(LauncherError::download(url, e));
            }
            Err(_) => {
                bar.abandon();
                return Err(LauncherError::download(
                    url,
                    format!(
                        "no data received for {} seconds after {} bytes",
                        inactivity.as_secs(),
                        downloaded
                    ),
                ));
            }
        };

        file.write_all(&chunk)
            .await
            .map_err(|e| LauncherError::download(url, format!("write failed: {e}")))?;
        downloaded += chunk.len() as u64;
        bar.inc(chunk.len() as u64);
    }

    file.flush()
        .await
        .map_err(|e| LauncherError::download(url, format!("flush failed: {e}")))?;
    bar.finish_and_clear();

    debug!("Downloaded {} bytes to {}", downloaded, archive.path().display());
    Ok(archive)
}

fn progress_bar(total_bytes: u64, name: &str) -> ProgressBar {
    if total_bytes == 0 {
        let bar = ProgressBar::new_spinner();
        bar.set_message(name.to_string());
        return bar;
    }

    let bar = ProgressBar::new(total_bytes);
    if let Ok(style) =
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(name.to_string());
    bar
}
