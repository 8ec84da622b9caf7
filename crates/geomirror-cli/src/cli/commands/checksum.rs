//! Checksum command: compute MD5 and SHA-256 of a file.

use anyhow::Result;
use geomirror_core::checksum;
use std::path::Path;

/// Print both digests in `sha256sum`/`md5sum` style.
pub fn run_checksum(path: &Path) -> Result<()> {
    let d = checksum::digest_path(path)?;
    println!("MD5     {}  {}", d.md5, path.display());
    println!("SHA-256 {}  {}", d.sha256, path.display());
    Ok(())
}
