//! Marker kept in a TOML file that the CI job commits or caches.

use super::{LocalMarker, MarkerStore};
use crate::error::{MirrorError, Result};
use crate::storage;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    path: PathBuf,
}

impl FileMarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarkerStore for FileMarkerStore {
    fn load(&self) -> Result<Option<LocalMarker>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MirrorError::io("read marker", &self.path, e)),
        };
        let marker: LocalMarker = toml::from_str(&data)?;
        Ok(Some(marker))
    }

    fn save(&self, marker: &LocalMarker) -> Result<()> {
        let toml = toml::to_string_pretty(marker)?;
        storage::write_atomic(&self.path, toml.as_bytes())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path().display())
    }
}
