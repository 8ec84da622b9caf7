//! Marker recovered from the notes of the latest published release.
//!
//! Works with a fresh CI checkout: the identity is embedded in the notes the
//! caller publishes (`Upstream-Marker:` line), so nothing has to be committed
//! back. Saving is therefore a no-op.

use super::{LocalMarker, MarkerStore};
use crate::config::TransferConfig;
use crate::error::{MirrorError, Result};
use crate::release::marker_from_notes;
use serde::Deserialize;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Fields of a GitHub release we care about.
#[derive(Debug, Deserialize)]
struct ReleasePayload {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReleaseMarkerStore {
    api_base: String,
    repo: String,
    token: Option<String>,
    user_agent: String,
    transfer: TransferConfig,
}

impl ReleaseMarkerStore {
    /// `repo` is `owner/name`; `token` is sent as a bearer token when present.
    pub fn new(
        repo: impl Into<String>,
        token: Option<String>,
        user_agent: impl Into<String>,
        transfer: TransferConfig,
    ) -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            repo: repo.into(),
            token: token.filter(|t| !t.trim().is_empty()),
            user_agent: user_agent.into(),
            transfer,
        }
    }

    /// Point at another API root (GitHub Enterprise, or a local test server).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn latest_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repo)
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}", self.api_base, self.repo)
    }

    /// GET an API URL; returns the status code and body.
    fn api_get(&self, url: &str) -> Result<(u32, Vec<u8>)> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.transfer.connect_timeout())?;
        easy.timeout(self.transfer.probe_timeout())?;

        let mut list = curl::easy::List::new();
        list.append("Accept: application/vnd.github+json")?;
        list.append("X-GitHub-Api-Version: 2022-11-28")?;
        if let Some(token) = &self.token {
            list.append(&format!("Authorization: Bearer {}", token.trim()))?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        Ok((easy.response_code()?, body))
    }

    /// GET the latest release. `None` when the repo exists but has no release yet.
    ///
    /// `releases/latest` answers 404 both for a repo without releases and for a
    /// repo we cannot see, so a 404 is disambiguated with a repo lookup.
    fn fetch_latest(&self) -> Result<Option<Vec<u8>>> {
        let url = self.latest_url();
        match self.api_get(&url)? {
            (200..=299, body) => Ok(Some(body)),
            (404, _) => {
                let repo_url = self.repo_url();
                match self.api_get(&repo_url)? {
                    (200..=299, _) => Ok(None),
                    (404, _) => Err(MirrorError::Api(format!(
                        "repository {} not found or not accessible{}",
                        self.repo,
                        if self.token.is_none() { " (no token sent)" } else { "" }
                    ))),
                    (status, _) => Err(MirrorError::Http {
                        url: repo_url,
                        status,
                    }),
                }
            }
            (status, _) => Err(MirrorError::Http { url, status }),
        }
    }
}

/// Identity carried by a release JSON payload, if its notes have one.
fn marker_from_release_json(json: &[u8]) -> Result<Option<LocalMarker>> {
    let payload: ReleasePayload = serde_json::from_slice(json)
        .map_err(|e| MirrorError::Api(format!("decode latest release: {e}")))?;
    let identity = payload.body.as_deref().and_then(marker_from_notes);
    if identity.is_none() {
        tracing::warn!(
            tag = payload.tag_name.as_deref().unwrap_or("-"),
            "latest release notes carry no upstream marker"
        );
    }
    Ok(identity.map(LocalMarker::from_identity))
}

impl MarkerStore for ReleaseMarkerStore {
    fn load(&self) -> Result<Option<LocalMarker>> {
        match self.fetch_latest()? {
            Some(json) => marker_from_release_json(&json),
            None => {
                tracing::info!("{} has no releases yet", self.repo);
                Ok(None)
            }
        }
    }

    fn save(&self, marker: &LocalMarker) -> Result<()> {
        tracing::debug!(
            identity = %marker.identity,
            "marker travels in release notes; nothing to save"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("latest release of {}", self.repo)
    }
}
