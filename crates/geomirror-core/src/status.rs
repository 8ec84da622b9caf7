//! Status files read by the CI caller.
//!
//! `update_status.txt` holds a single token. `release_title.txt` and
//! `release_notes.txt` are only meaningful when the token is `update`.

use crate::error::{MirrorError, Result};
use crate::storage;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const STATUS_FILE: &str = "update_status.txt";
pub const TITLE_FILE: &str = "release_title.txt";
pub const NOTES_FILE: &str = "release_notes.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Update,
    NoUpdate,
}

impl UpdateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateStatus::Update => "update",
            UpdateStatus::NoUpdate => "no_update",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStatus {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "update" => Ok(UpdateStatus::Update),
            "no_update" => Ok(UpdateStatus::NoUpdate),
            other => Err(MirrorError::Config(format!("unknown update status {other:?}"))),
        }
    }
}

/// Locations of the three status files inside one output directory.
#[derive(Debug, Clone)]
pub struct StatusFiles {
    pub status: PathBuf,
    pub title: PathBuf,
    pub notes: PathBuf,
}

impl StatusFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            status: dir.join(STATUS_FILE),
            title: dir.join(TITLE_FILE),
            notes: dir.join(NOTES_FILE),
        }
    }

    /// Drop a status token left by an earlier run so a failing run never
    /// leaves `update` behind.
    pub fn clear_status(&self) -> Result<()> {
        storage::remove_if_exists(&self.status)
    }

    /// Remove title and notes from an earlier run.
    pub fn clear_release_text(&self) -> Result<()> {
        storage::remove_if_exists(&self.title)?;
        storage::remove_if_exists(&self.notes)
    }

    pub fn write_status(&self, status: UpdateStatus) -> Result<()> {
        storage::write_atomic(&self.status, format!("{status}\n").as_bytes())
    }

    pub fn write_release_text(&self, title: &str, notes: &str) -> Result<()> {
        storage::write_atomic(&self.title, format!("{}\n", title.trim_end()).as_bytes())?;
        storage::write_atomic(&self.notes, notes.as_bytes())
    }

    /// Current token, or `None` if no status file exists.
    pub fn read_status(&self) -> Result<Option<UpdateStatus>> {
        match fs::read_to_string(&self.status) {
            Ok(s) => s.parse().map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MirrorError::io("read", &self.status, e)),
        }
    }
}
