//! Release title and notes generated for the CI caller.

use crate::archive::ArchiveStats;
use crate::checksum::FileDigests;
use chrono::{DateTime, NaiveDate, Utc};

/// Prefix of the notes line that carries the upstream identity.
pub const MARKER_LINE_PREFIX: &str = "Upstream-Marker:";

/// Everything the notes report about one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStats {
    pub total_entries: u64,
    pub country_count: usize,
    pub file_size: u64,
    pub md5: String,
    pub sha256: String,
}

impl ReleaseStats {
    pub fn new(archive: &ArchiveStats, digests: &FileDigests) -> Self {
        Self {
            total_entries: archive.total_entries,
            country_count: archive.country_count,
            file_size: digests.size,
            md5: digests.md5.clone(),
            sha256: digests.sha256.clone(),
        }
    }
}

/// Date shown in the title: upstream `Last-Modified` if it parses, else `now`.
pub fn release_date(last_modified: Option<&str>, now: DateTime<Utc>) -> NaiveDate {
    last_modified
        .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .unwrap_or_else(|| now.date_naive())
}

pub fn release_title(date: NaiveDate) -> String {
    format!("GeoNames allCountries {}", date.format("%Y-%m-%d"))
}

/// Multi-line notes body. The last line is `Upstream-Marker: <identity>`.
pub fn release_notes(stats: &ReleaseStats, last_modified: Option<&str>, identity: &str) -> String {
    let mut notes = String::from("GeoNames Database Update\n\n");
    notes.push_str(&format!(
        "- Total Entries: {}\n",
        group_thousands(stats.total_entries)
    ));
    notes.push_str(&format!("- Countries Covered: {}\n", stats.country_count));
    notes.push_str(&format!(
        "- File Size: {} ({} bytes)\n",
        format_file_size(stats.file_size),
        stats.file_size
    ));
    notes.push_str(&format!("- MD5 Checksum: {}\n", stats.md5));
    notes.push_str(&format!("- SHA-256 Checksum: {}\n", stats.sha256));
    if let Some(lm) = last_modified {
        notes.push_str(&format!("- Upstream Last-Modified: {lm}\n"));
    }
    notes.push_str("\nThis release contains the latest GeoNames database update.\n\n");
    notes.push_str(&format!("{MARKER_LINE_PREFIX} {identity}\n"));
    notes
}

/// Extract the identity from a notes body produced by [`release_notes`].
pub fn marker_from_notes(body: &str) -> Option<String> {
    body.lines()
        .rev()
        .find_map(|l| l.trim().strip_prefix(MARKER_LINE_PREFIX))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Bytes as megabytes with two decimals, e.g. `15.73 MB`.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// `1234567` → `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stats() -> ReleaseStats {
        ReleaseStats {
            total_entries: 1_553_127,
            country_count: 121,
            file_size: 16_493_271,
            md5: "d41d8cd98f00b204e9800998ecf8427e".into(),
            sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".into(),
        }
    }

    #[test]
    fn group_thousands_boundaries() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_553_127), "1,553,127");
    }

    #[test]
    fn file_size_in_megabytes() {
        assert_eq!(format_file_size(0), "0.00 MB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(16_493_271), "15.73 MB");
    }

    #[test]
    fn notes_contain_stats_and_marker() {
        let notes = release_notes(&stats(), Some("Fri, 16 Oct 2026 01:21:07 GMT"), "etag-B");
        assert!(notes.starts_with("GeoNames Database Update\n\n"));
        assert!(notes.contains("- Total Entries: 1,553,127\n"));
        assert!(notes.contains("- Countries Covered: 121\n"));
        assert!(notes.contains("- File Size: 15.73 MB (16493271 bytes)\n"));
        assert!(notes.contains("- MD5 Checksum: d41d8cd98f00b204e9800998ecf8427e\n"));
        assert!(notes.contains("- Upstream Last-Modified: Fri, 16 Oct 2026 01:21:07 GMT\n"));
        assert!(notes.ends_with("Upstream-Marker: etag-B\n"));
        assert_eq!(marker_from_notes(&notes).as_deref(), Some("etag-B"));
    }

    #[test]
    fn notes_without_last_modified() {
        let notes = release_notes(&stats(), None, "etag-A");
        assert!(!notes.contains("Last-Modified"));
    }

    #[test]
    fn marker_from_foreign_notes() {
        assert_eq!(marker_from_notes("hand-written release"), None);
        assert_eq!(marker_from_notes("Upstream-Marker:   \n"), None);
        assert_eq!(
            marker_from_notes("x\n  Upstream-Marker: Fri, 16 Oct 2026 01:21:07 GMT  \n").as_deref(),
            Some("Fri, 16 Oct 2026 01:21:07 GMT")
        );
    }

    #[test]
    fn title_uses_upstream_date_when_parseable() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 3, 0, 0).unwrap();
        let d = release_date(Some("Fri, 16 Oct 2026 01:21:07 GMT"), now);
        assert_eq!(release_title(d), "GeoNames allCountries 2026-10-16");
        let d = release_date(Some("yesterday-ish"), now);
        assert_eq!(release_title(d), "GeoNames allCountries 2026-10-17");
        let d = release_date(None, now);
        assert_eq!(release_title(d), "GeoNames allCountries 2026-10-17");
    }
}
