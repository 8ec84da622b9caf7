//! Parse HTTP response header lines into RemoteMetadata.

use super::RemoteMetadata;

/// Parse collected header lines into RemoteMetadata. Unknown or malformed
/// lines are ignored.
pub(crate) fn parse_headers(lines: &[String]) -> RemoteMetadata {
    let mut meta = RemoteMetadata::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    meta.content_length = Some(n);
                }
            } else if name.eq_ignore_ascii_case("etag") {
                let v = value.strip_prefix("W/").unwrap_or(value);
                let v = v.trim_matches('"');
                if !v.is_empty() {
                    meta.etag = Some(v.to_string());
                }
            } else if name.eq_ignore_ascii_case("last-modified") && !value.is_empty() {
                meta.last_modified = Some(value.to_string());
            }
        }
    }

    meta
}
