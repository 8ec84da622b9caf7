//! HTTP HEAD probing of the upstream archive.
//!
//! Uses the curl crate (libcurl) to fetch response headers and capture the
//! ETag/Last-Modified pair that identifies the current upstream file.

mod parse;

use crate::config::TransferConfig;
use crate::error::{MirrorError, Result};
use std::str;

pub(crate) use parse::parse_headers;

/// Upstream metadata from a HEAD request. Fetched fresh on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMetadata {
    /// `ETag` without quotes or weak prefix.
    pub etag: Option<String>,
    /// Raw `Last-Modified` value.
    pub last_modified: Option<String>,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
}

impl RemoteMetadata {
    /// Token compared against the stored marker: ETag when present,
    /// otherwise Last-Modified.
    pub fn identity(&self) -> Result<&str> {
        self.etag
            .as_deref()
            .or(self.last_modified.as_deref())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                MirrorError::Metadata("response has neither ETag nor Last-Modified".into())
            })
    }
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects; only the headers of the final response are kept.
pub fn probe(url: &str, user_agent: &str, transfer: &TransferConfig) -> Result<RemoteMetadata> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(user_agent)?;
    easy.connect_timeout(transfer.connect_timeout())?;
    easy.timeout(transfer.probe_timeout())?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let line = s.trim_end();
                // A status line starts a new response (redirect hop).
                if line.starts_with("HTTP/") {
                    headers.clear();
                }
                headers.push(line.to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(MirrorError::Http {
            url: url.to_string(),
            status,
        });
    }

    let meta = parse_headers(&headers);
    tracing::debug!(
        etag = ?meta.etag,
        last_modified = ?meta.last_modified,
        content_length = ?meta.content_length,
        "probed {}",
        url
    );
    Ok(meta)
}
