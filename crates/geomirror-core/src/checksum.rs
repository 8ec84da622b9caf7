//! Archive checksums for release notes.
//!
//! MD5 and SHA-256 are computed in one streaming pass so large archives are
//! read only once.

use crate::error::{MirrorError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Lowercase hex digests of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub md5: String,
    pub sha256: String,
    /// Bytes hashed.
    pub size: u64,
}

/// Compute MD5 and SHA-256 of a file in a single read pass.
pub fn digest_path(path: &Path) -> Result<FileDigests> {
    let mut f = File::open(path).map_err(|e| MirrorError::io("open", path, e))?;
    let mut md5_ctx = md5::Context::new();
    let mut sha = Sha256::new();
    let mut size = 0u64;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| MirrorError::io("read", path, e))?;
        if n == 0 {
            break;
        }
        md5_ctx.consume(&buf[..n]);
        sha.update(&buf[..n]);
        size += n as u64;
    }
    Ok(FileDigests {
        md5: format!("{:x}", md5_ctx.finalize()),
        sha256: hex::encode(sha.finalize()),
        size,
    })
}
