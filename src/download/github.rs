//! GitHub release API interaction

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::error::{LauncherError, Result};

/// GitHub release metadata from API
#[derive(Deserialize, Debug, Clone)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

/// GitHub release asset metadata
#[derive(Deserialize, Debug, Clone)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Release artifact chosen for this platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
    pub version: String,
    /// Size reported by the index, 0 when unknown
    pub size: u64,
}

/// Anonymous client for the release index
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: reqwest::Client,
    api_base: String,
}

impl ReleaseClient {
    pub fn new(api_base: &str, user_agent: &str, connect_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(LauncherError::HttpClient)?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Underlying HTTP client, shared with the artifact download
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch latest release of `owner/repo`
    pub async fn get_latest_release(&self, owner: &str, repo: &str) -> Result<GitHubRelease> {
        let slug = format!("{owner}/{repo}");
        let url = format!("{}/repos/{slug}/releases/latest", self.api_base);
        debug!("Querying release index: {url}");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| LauncherError::ReleaseIndex {
                repo: slug.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(LauncherError::ReleaseIndexStatus {
                repo: slug,
                status: response.status(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| LauncherError::ReleaseIndex {
                repo: slug.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| LauncherError::ReleaseDecode { repo: slug, source })
    }
}

/// Version string of a release tag: one leading `v` removed.
pub fn release_version(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Pick the asset named exactly `expected`.
pub fn select_asset(release: &GitHubRelease, expected: &str) -> Result<ReleaseAsset> {
    release
        .assets
        .iter()
        .find(|a| a.name == expected)
        .map(|a| ReleaseAsset {
            name: a.name.clone(),
            download_url: a.browser_download_url.clone(),
            version: release_version(&release.tag_name).to_string(),
            size: a.size,
        })
        .ok_or_else(|| LauncherError::AssetNotFound {
            expected: expected.to_string(),
            tag: release.tag_name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn release(tag: &str, names: &[&str]) -> GitHubRelease {
        GitHubRelease {
            tag_name: tag.to_string(),
            assets: names
                .iter()
                .map(|n| GitHubAsset {
                    name: n.to_string(),
                    browser_download_url: format!("https://example.invalid/{n}"),
                    size: 42,
                })
                .collect(),
        }
    }

    #[test]
    fn leading_v_is_stripped_once() {
        assert_eq!(release_version("v2.0.0"), "2.0.0");
        assert_eq!(release_version("vv1.0"), "v1.0");
        assert_eq!(release_version("1.4.0"), "1.4.0");
    }

    #[test]
    fn selects_exact_match_only() {
        let rel = release(
            "v1.2.3",
            &[
                "Flowser-1.2.3-mac.zip.blockmap",
                "Flowser-1.2.3-arm64-mac.zip",
                "Flowser-1.2.3-mac.zip",
            ],
        );

        let asset = select_asset(&rel, "Flowser-1.2.3-mac.zip").unwrap();
        assert_eq!(
            asset,
            ReleaseAsset {
                name: "Flowser-1.2.3-mac.zip".into(),
                download_url: "https://example.invalid/Flowser-1.2.3-mac.zip".into(),
                version: "1.2.3".into(),
                size: 42,
            }
        );
    }

    #[test]
    fn missing_asset_is_an_error() {
        let rel = release("v1.2.3", &["Flowser-1.2.3.dmg", "Flowser-Setup-1.2.3.exe"]);
        match select_asset(&rel, "Flowser-1.2.3-arm64-mac.zip") {
            Err(LauncherError::AssetNotFound { expected, tag }) => {
                assert_eq!(expected, "Flowser-1.2.3-arm64-mac.zip");
                assert_eq!(tag, "v1.2.3");
            }
            other => panic!("expected AssetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn invalid_user_agent_is_a_client_error() {
        match ReleaseClient::new("https://api.github.com", "bad\nagent", Duration::from_secs(1)) {
            Err(err @ LauncherError::HttpClient(_)) => {
                assert!(!err.to_string().contains("api.github.com"));
            }
            other => panic!("expected HttpClient, got {other:?}"),
        }
    }

    #[test]
    fn decodes_api_payload_ignoring_extra_fields() {
        let json = r#"{
            "tag_name": "v0.9.1",
            "name": "Flowser 0.9.1",
            "draft": false,
            "assets": [
                {
                    "name": "Flowser-0.9.1-mac.zip",
                    "browser_download_url": "https://github.com/onflowser/flowser/releases/download/v0.9.1/Flowser-0.9.1-mac.zip",
                    "size": 123456,
                    "content_type": "application/zip"
                }
            ]
        }"#;
        let rel: GitHubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(rel.tag_name, "v0.9.1");
        assert_eq!(rel.assets.len(), 1);
        assert_eq!(rel.assets[0].size, 123456);
    }
}
