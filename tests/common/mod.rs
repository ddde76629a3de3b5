//! Shared helpers: in-memory release archives and a mock release index

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use flowser_launcher::{Launcher, LauncherConfig, Platform};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

pub const VERSION: &str = "1.2.3";
pub const ASSET: &str = "Flowser-1.2.3-arm64-mac.zip";

pub enum Entry<'a> {
    File(&'a str, &'a [u8], u32),
    Link(&'a str, &'a str),
}

pub fn zip_bytes(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut zw = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let base = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for entry in entries {
        match entry {
            Entry::File(name, body, mode) => {
                zw.start_file(*name, base.unix_permissions(*mode)).unwrap();
                zw.write_all(body).unwrap();
            }
            Entry::Link(name, target) => zw.add_symlink(*name, *target, base).unwrap(),
        }
    }
    zw.finish().unwrap().into_inner()
}

/// Minimal launchable bundle whose binary is `script`
pub fn app_zip(script: &str) -> Vec<u8> {
    zip_bytes(&[
        Entry::File("Flowser.app/Contents/Info.plist", b"<plist/>", 0o644),
        Entry::File("Flowser.app/Contents/MacOS/Flowser", script.as_bytes(), 0o755),
    ])
}

/// Temp workspace: `<tmp>/Applications` install root and `<tmp>/downloads`
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("downloads")).unwrap();
        Self { dir }
    }

    pub fn install_root(&self) -> PathBuf {
        self.dir.path().join("Applications")
    }

    pub fn downloads(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }

    pub fn bundle(&self) -> PathBuf {
        self.install_root().join("Flowser.app")
    }

    pub fn download_count(&self) -> usize {
        std::fs::read_dir(self.downloads()).unwrap().count()
    }

    pub fn launcher(&self, server: &MockServer, platform: Platform) -> Launcher {
        let config = LauncherConfig {
            api_base_url: server.uri(),
            install_root: Some(self.install_root()),
            download_dir: Some(self.downloads()),
            inactivity_timeout_secs: 5,
            ..LauncherConfig::default()
        };
        Launcher::new(config, platform).unwrap()
    }
}

pub fn arm_mac() -> Platform {
    Platform::from_parts("darwin", "arm64")
}

/// Serve a `v1.2.3` release listing `assets`, each downloadable under `/download/`
pub async fn mount_release(server: &MockServer, assets: &[&str]) {
    let assets: Vec<_> = assets
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "browser_download_url": format!("{}/download/{}", server.uri(), name),
                "size": 0,
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/repos/onflowser/flowser/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": format!("v{VERSION}"),
            "assets": assets,
        })))
        .mount(server)
        .await;
}

pub async fn mount_download(server: &MockServer, name: &str, body: Vec<u8>, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
