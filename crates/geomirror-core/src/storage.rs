//! Part-file lifecycle for the archive download.
//!
//! The archive is written to `<final>.part` and only renamed onto the final
//! name after verification, so a failed run leaves any previous archive intact.

use crate::error::{MirrorError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.zip` → `a.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Rename `part` onto `final_path`, replacing any existing file.
pub fn finalize(part: &Path, final_path: &Path) -> Result<()> {
    fs::rename(part, final_path).map_err(|e| MirrorError::io("rename into place", final_path, e))
}

/// Write `contents` to `path` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MirrorError::io("create", parent, e))?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, contents).map_err(|e| MirrorError::io("write", &tmp, e))?;
    finalize(&tmp, path)
}

/// Remove `path` if it exists. Missing files are not an error.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MirrorError::io("remove", path, e)),
    }
}
