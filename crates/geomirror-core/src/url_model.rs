//! Upstream URL validation and local archive filename derivation.

use crate::error::{MirrorError, Result};
use url::Url;

/// Filename used when the URL path has no usable last segment.
pub const DEFAULT_ARCHIVE_NAME: &str = "allCountries.zip";

/// Parses `raw` and rejects anything that is not plain http(s).
pub fn parse_upstream_url(raw: &str) -> Result<Url> {
    let parsed =
        Url::parse(raw).map_err(|e| MirrorError::Config(format!("invalid URL {raw:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(MirrorError::Config(format!(
                "unsupported URL scheme {other:?} in {raw:?}"
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(MirrorError::Config(format!("URL has no host: {raw:?}")));
    }
    Ok(parsed)
}

/// Local filename for the archive: last path segment of `url`, sanitized.
///
/// `https://download.geonames.org/export/zip/allCountries.zip` → `allCountries.zip`
pub fn archive_file_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segs| segs.rfind(|s| !s.is_empty()))
        .map(sanitize_file_name)
        .unwrap_or_default();
    if segment.is_empty() || segment == "." || segment == ".." {
        DEFAULT_ARCHIVE_NAME.to_string()
    } else {
        segment
    }
}

/// Replaces path separators and control characters with `_` and trims
/// leading/trailing dots, spaces and underscores.
fn sanitize_file_name(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let c = if c == '/' || c == '\\' || c == ' ' || c.is_control() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geonames_url_yields_archive_name() {
        let url =
            parse_upstream_url("https://download.geonames.org/export/zip/allCountries.zip").unwrap();
        assert_eq!(archive_file_name(&url), "allCountries.zip");
    }

    #[test]
    fn query_and_trailing_slash_ignored() {
        let url = parse_upstream_url("http://127.0.0.1:8080/data/dump.zip?x=1").unwrap();
        assert_eq!(archive_file_name(&url), "dump.zip");
        let url = parse_upstream_url("http://127.0.0.1:8080/data/dump.zip/").unwrap();
        assert_eq!(archive_file_name(&url), "dump.zip");
    }

    #[test]
    fn root_path_falls_back_to_default() {
        let url = parse_upstream_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(archive_file_name(&url), DEFAULT_ARCHIVE_NAME);
    }

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_file_name("..a/b c.zip"), "a_b_c.zip");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(parse_upstream_url("ftp://example.com/a.zip").is_err());
        assert!(parse_upstream_url("file:///tmp/a.zip").is_err());
        assert!(parse_upstream_url("not a url").is_err());
    }
}
