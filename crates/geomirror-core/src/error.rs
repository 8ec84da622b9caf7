//! Error type shared by every step of an update run.
//!
//! Variants are grouped by [`ErrorKind`] so callers can report what class of
//! failure ended the run. All of them are fatal for the run.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MirrorError>;

/// Coarse classification of a [`MirrorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transfer or remote API failure.
    Network,
    /// Downloaded archive is truncated, corrupt, or has no usable data.
    Integrity,
    /// Local file could not be read or written.
    Filesystem,
    /// Invalid configuration or CLI input.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Network => "network",
            ErrorKind::Integrity => "integrity",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::Config => "config",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum MirrorError {
    /// libcurl reported an error (timeout, connection, aborted write, ...).
    #[error("transfer failed: {0}")]
    Curl(#[from] curl::Error),

    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    /// Transfer finished but fewer (or more) bytes arrived than advertised.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },

    /// Upstream response lacks what is needed to detect a change.
    #[error("upstream metadata: {0}")]
    Metadata(String),

    /// Release API returned something we cannot use.
    #[error("release API: {0}")]
    Api(String),

    #[error("downloaded archive is empty")]
    EmptyArchive,

    #[error("unreadable archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive contains no .txt data entry")]
    MissingDataEntry,

    #[error("statistics: {0}")]
    Stats(String),

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config: {0}")]
    Config(String),

    #[error("config parse: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("config encode: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl MirrorError {
    pub fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        MirrorError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MirrorError::Curl(_)
            | MirrorError::Http { .. }
            | MirrorError::PartialTransfer { .. }
            | MirrorError::Metadata(_)
            | MirrorError::Api(_) => ErrorKind::Network,
            MirrorError::EmptyArchive
            | MirrorError::Archive(_)
            | MirrorError::MissingDataEntry
            | MirrorError::Stats(_) => ErrorKind::Integrity,
            MirrorError::Io { .. } => ErrorKind::Filesystem,
            MirrorError::Config(_) | MirrorError::TomlDe(_) | MirrorError::TomlSer(_) => {
                ErrorKind::Config
            }
        }
    }
}
