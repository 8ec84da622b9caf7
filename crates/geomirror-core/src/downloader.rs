//! Single-stream HTTP GET of the upstream archive.
//!
//! Writes the response body sequentially to a part file. No Range requests
//! and no retries: a failed transfer fails the run.

use crate::config::TransferConfig;
use crate::error::{MirrorError, Result};
use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Downloads `url` into `dest` (created or truncated). Returns bytes written.
///
/// When `expected_len` is `Some`, a body of any other length is a
/// `PartialTransfer` error.
pub fn download_to(
    url: &str,
    dest: &Path,
    expected_len: Option<u64>,
    user_agent: &str,
    transfer: &TransferConfig,
) -> Result<u64> {
    let file = File::create(dest).map_err(|e| MirrorError::io("create", dest, e))?;
    let mut out = BufWriter::new(file);
    let written = Cell::new(0u64);
    let write_err: Cell<Option<std::io::Error>> = Cell::new(None);

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(user_agent)?;
    easy.connect_timeout(transfer.connect_timeout())?;
    easy.low_speed_limit(transfer.low_speed_limit_bytes)?;
    easy.low_speed_time(transfer.low_speed_time())?;
    easy.timeout(transfer.download_timeout())?;

    let performed = {
        let mut t = easy.transfer();
        t.write_function(|data| match out.write_all(data) {
            Ok(()) => {
                written.set(written.get() + data.len() as u64);
                Ok(data.len())
            }
            Err(e) => {
                write_err.set(Some(e));
                Ok(0) // abort transfer
            }
        })?;
        t.perform()
    };

    if let Some(e) = write_err.take() {
        return Err(MirrorError::io("write", dest, e));
    }
    performed?;

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(MirrorError::Http {
            url: url.to_string(),
            status,
        });
    }

    out.flush().map_err(|e| MirrorError::io("flush", dest, e))?;
    out.get_ref()
        .sync_all()
        .map_err(|e| MirrorError::io("sync", dest, e))?;

    let received = written.get();
    if let Some(expected) = expected_len {
        if received != expected {
            return Err(MirrorError::PartialTransfer { expected, received });
        }
    }
    tracing::info!("downloaded {} bytes from {}", received, url);
    Ok(received)
}
