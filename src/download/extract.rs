//! Release archive extraction and bundle verification
//!
//! macOS `.app` bundles depend on symlinks inside their frameworks
//! (`Electron Framework.framework/Electron Framework -> Versions/Current/...`).
//! An extractor that writes those links as plain files produces a bundle that
//! dies at launch with dyld "Library not loaded", so links and permission bits
//! are restored here and the result is checked before reporting success.

use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::error::{LauncherError, Result};

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Extract every entry of `archive` into `dest`, creating `dest` if needed.
pub async fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    let archive_for_err = archive.clone();

    // CPU/disk-bound, keep it off the async executor
    tokio::task::spawn_blocking(move || extract_zip_blocking(&archive, &dest))
        .await
        .map_err(|e| LauncherError::extraction(&archive_for_err, e))?
}

fn extract_zip_blocking(archive_path: &Path, dest: &Path) -> Result<usize> {
    let zip_file = fs::File::open(archive_path)
        .map_err(|e| LauncherError::extraction(archive_path, format!("cannot open archive: {e}")))?;
    let mut archive = zip::ZipArchive::new(zip_file)
        .map_err(|e| LauncherError::extraction(archive_path, format!("not a zip archive: {e}")))?;

    fs::create_dir_all(dest).map_err(|e| {
        LauncherError::extraction(archive_path, format!("cannot create {}: {e}", dest.display()))
    })?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| LauncherError::extraction(archive_path, format!("entry {i}: {e}")))?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            LauncherError::extraction(archive_path, format!("unsafe entry path {:?}", entry.name()))
        })?;
        let out_path = dest.join(&relative);
        let io_err = |e: std::io::Error| {
            LauncherError::extraction(archive_path, format!("{}: {e}", out_path.display()))
        };

        // Links are only checked lexically, which holds while no ancestor is itself a link
        let ancestors = if entry.is_dir() {
            relative.as_path()
        } else {
            relative.parent().unwrap_or(Path::new(""))
        };
        if let Some(link) = linked_ancestor(dest, ancestors).map_err(io_err)? {
            return Err(LauncherError::extraction(
                archive_path,
                format!("entry {} passes through symlink {}", relative.display(), link.display()),
            ));
        }

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(io_err)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        remove_existing_link(&out_path).map_err(io_err)?;

        let mode = entry.unix_mode();
        if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            let mut target = String::new();
            entry.read_to_string(&mut target).map_err(io_err)?;
            if !link_stays_within(&relative, Path::new(&target)) {
                return Err(LauncherError::extraction(
                    archive_path,
                    format!("symlink {} points outside the archive: {target}", relative.display()),
                ));
            }
            create_symlink(Path::new(&target), &out_path).map_err(io_err)?;
        } else {
            let mut out = fs::File::create(&out_path).map_err(io_err)?;
            std::io::copy(&mut entry, &mut out).map_err(io_err)?;
            if let Some(mode) = mode {
                set_mode(&out_path, mode).map_err(io_err)?;
            }
        }
        written += 1;
    }

    debug!("Extracted {} files from {}", written, archive_path.display());
    Ok(written)
}

/// Check an extracted bundle can actually launch: the main executable is
/// present and every framework binary resolves.
pub fn verify_bundle(bundle: &Path, executable: &Path) -> Result<()> {
    if !executable.is_file() {
        return Err(LauncherError::BrokenInstall {
            bundle: bundle.to_path_buf(),
            missing: executable.to_path_buf(),
        });
    }

    let frameworks = bundle.join("Contents").join("Frameworks");
    let entries = match fs::read_dir(&frameworks) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(LauncherError::InstallCheck {
                path: frameworks,
                source,
            });
        }
    };

    for entry in entries {
        let path = entry
            .map_err(|source| LauncherError::InstallCheck {
                path: frameworks.clone(),
                source,
            })?
            .path();
        if path.extension().and_then(|s| s.to_str()) != Some("framework") {
            continue;
        }
        let Some(name) = path.file_stem() else {
            continue;
        };
        // exists() follows links, so a dangling Versions/Current chain fails here
        let binary = path.join(name);
        if !binary.exists() {
            return Err(LauncherError::BrokenInstall {
                bundle: bundle.to_path_buf(),
                missing: binary,
            });
        }
    }

    info!("Verified bundle {}", bundle.display());
    Ok(())
}

/// A link at `link` (relative to the extraction root) with `target` must not
/// resolve outside the root.
fn link_stays_within(link: &Path, target: &Path) -> bool {
    if target.is_absolute() {
        return false;
    }
    let mut depth: usize = link.parent().map_or(0, |p| p.components().count());
    for component in target.components() {
        match component {
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// First prefix of `relative` that already exists under `root` as a symlink.
fn linked_ancestor(root: &Path, relative: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut prefix = PathBuf::new();
    for component in relative.components() {
        prefix.push(component);
        match fs::symlink_metadata(root.join(&prefix)) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(Some(prefix)),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

fn remove_existing_link(path: &Path) -> std::io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::remove_file(path),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    // No portable symlinks; keep the link text so the entry is not lost
    fs::write(link, target.to_string_lossy().as_bytes())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let bits = mode & 0o7777;
    if bits == 0 {
        return Ok(());
    }
    fs::set_permissions(path, fs::Permissions::from_mode(bits))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
