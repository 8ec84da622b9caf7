//! Persistence of the previous run's upstream identity.
//!
//! The checker only talks to [`MarkerStore`]; where the marker lives (a file
//! committed or cached by CI, or the notes of the latest published release)
//! is a deployment choice.

mod file;
mod release;

pub use file::FileMarkerStore;
pub use release::{ReleaseMarkerStore, GITHUB_API_BASE};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Stored identity of the last mirrored archive plus what we knew about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalMarker {
    /// ETag or Last-Modified of the upstream archive (see `RemoteMetadata::identity`).
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// RFC 3339 time the marker was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl LocalMarker {
    /// Marker carrying only an identity (e.g. recovered from release notes).
    pub fn from_identity(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            etag: None,
            last_modified: None,
            size: None,
            md5: None,
            sha256: None,
            recorded_at: None,
        }
    }

    pub fn matches(&self, identity: &str) -> bool {
        self.identity == identity
    }
}

/// Where the previous marker is read from and the new one written to.
pub trait MarkerStore {
    /// Previous marker, or `None` on the first run.
    fn load(&self) -> Result<Option<LocalMarker>>;

    /// Persist the marker of a successful update.
    fn save(&self, marker: &LocalMarker) -> Result<()>;

    /// Short description for logs.
    fn describe(&self) -> String;
}
