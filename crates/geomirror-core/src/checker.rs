//! Update check and release preparation for one scheduled run.
//!
//! probe → compare with marker → (download → verify → stats → release text
//! → status → marker) or `no_update`. Every failure is fatal for the run and
//! `update_status.txt` reads `update` only once the archive, title and notes
//! are in place.

use crate::archive::{self, ArchiveStats};
use crate::checksum::{self, FileDigests};
use crate::config::{MirrorConfig, TransferConfig};
use crate::downloader;
use crate::error::{MirrorError, Result};
use crate::fetch_head::{self, RemoteMetadata};
use crate::marker::{LocalMarker, MarkerStore};
use crate::release::{self, ReleaseStats};
use crate::status::{StatusFiles, UpdateStatus};
use crate::storage;
use crate::url_model;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Source of the archive. [`HttpUpstream`] is the real one.
pub trait Upstream {
    fn probe(&self) -> Result<RemoteMetadata>;

    /// Write the archive body to `dest`; returns bytes written.
    fn download(&self, dest: &Path, expected_len: Option<u64>) -> Result<u64>;

    /// Local filename for the archive.
    fn archive_name(&self) -> String;
}

/// Upstream reached over HTTP(S) with libcurl.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    url: Url,
    user_agent: String,
    transfer: TransferConfig,
}

impl HttpUpstream {
    pub fn new(url: &str, user_agent: impl Into<String>, transfer: TransferConfig) -> Result<Self> {
        Ok(Self {
            url: url_model::parse_upstream_url(url)?,
            user_agent: user_agent.into(),
            transfer,
        })
    }

    pub fn from_config(cfg: &MirrorConfig) -> Result<Self> {
        Self::new(&cfg.upstream_url, cfg.user_agent.clone(), cfg.transfer.clone())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Upstream for HttpUpstream {
    fn probe(&self) -> Result<RemoteMetadata> {
        fetch_head::probe(self.url.as_str(), &self.user_agent, &self.transfer)
    }

    fn download(&self, dest: &Path, expected_len: Option<u64>) -> Result<u64> {
        downloader::download_to(
            self.url.as_str(),
            dest,
            expected_len,
            &self.user_agent,
            &self.transfer,
        )
    }

    fn archive_name(&self) -> String {
        url_model::archive_file_name(&self.url)
    }
}

/// What an update run produced.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub identity: String,
    /// Identity from the previous marker, `None` on a first run.
    pub previous: Option<String>,
    pub archive_path: PathBuf,
    pub title: String,
    pub notes: String,
    pub stats: ReleaseStats,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    NoUpdate { identity: String },
    Updated(UpdateReport),
}

impl RunOutcome {
    pub fn status(&self) -> UpdateStatus {
        match self {
            RunOutcome::NoUpdate { .. } => UpdateStatus::NoUpdate,
            RunOutcome::Updated(_) => UpdateStatus::Update,
        }
    }
}

pub struct UpdateChecker<'a> {
    upstream: &'a dyn Upstream,
    markers: &'a dyn MarkerStore,
    output_dir: PathBuf,
    force: bool,
}

impl<'a> UpdateChecker<'a> {
    pub fn new(
        upstream: &'a dyn Upstream,
        markers: &'a dyn MarkerStore,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            upstream,
            markers,
            output_dir: output_dir.into(),
            force: false,
        }
    }

    /// Take the update branch even when the marker matches.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn status_files(&self) -> StatusFiles {
        StatusFiles::in_dir(&self.output_dir)
    }

    pub fn run(&self) -> Result<RunOutcome> {
        self.run_at(Utc::now())
    }

    /// Run with an explicit clock (used for the title fallback and marker timestamp).
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| MirrorError::io("create", &self.output_dir, e))?;
        let files = self.status_files();
        files.clear_status()?;

        let remote = self.upstream.probe()?;
        let identity = remote.identity()?.to_string();
        let previous = self.markers.load()?;
        tracing::info!(
            remote = %identity,
            previous = previous.as_ref().map(|m| m.identity.as_str()).unwrap_or("<none>"),
            store = %self.markers.describe(),
            "compared upstream with marker"
        );

        if !self.force && previous.as_ref().is_some_and(|m| m.matches(&identity)) {
            files.clear_release_text()?;
            files.write_status(UpdateStatus::NoUpdate)?;
            tracing::info!("GeoNames data is up to date");
            return Ok(RunOutcome::NoUpdate { identity });
        }

        tracing::info!("updating GeoNames data");
        let archive_path = self.output_dir.join(self.upstream.archive_name());
        let part = storage::temp_path(&archive_path);
        let (archive_stats, digests) = match self.fetch_and_verify(&part, &remote) {
            Ok(v) => v,
            Err(e) => {
                if let Err(cleanup) = storage::remove_if_exists(&part) {
                    tracing::warn!("could not remove {}: {}", part.display(), cleanup);
                }
                return Err(e);
            }
        };
        storage::finalize(&part, &archive_path)?;

        let stats = ReleaseStats::new(&archive_stats, &digests);
        let last_modified = remote.last_modified.as_deref();
        let title = release::release_title(release::release_date(last_modified, now));
        let notes = release::release_notes(&stats, last_modified, &identity);
        files.write_release_text(&title, &notes)?;
        files.write_status(UpdateStatus::Update)?;

        let marker = LocalMarker {
            identity: identity.clone(),
            etag: remote.etag.clone(),
            last_modified: remote.last_modified.clone(),
            size: Some(stats.file_size),
            md5: Some(stats.md5.clone()),
            sha256: Some(stats.sha256.clone()),
            recorded_at: Some(now.to_rfc3339_opts(SecondsFormat::Secs, false)),
        };
        if let Err(e) = self.markers.save(&marker) {
            // The caller must not publish a release the marker does not know about.
            if let Err(cleanup) = files.clear_status() {
                tracing::warn!("could not withdraw update status: {}", cleanup);
            }
            return Err(e);
        }

        tracing::info!(
            entries = stats.total_entries,
            countries = stats.country_count,
            bytes = stats.file_size,
            md5 = %stats.md5,
            "update complete: {}",
            title
        );
        Ok(RunOutcome::Updated(UpdateReport {
            identity,
            previous: previous.map(|m| m.identity),
            archive_path,
            title,
            notes,
            stats,
        }))
    }

    fn fetch_and_verify(
        &self,
        part: &Path,
        remote: &RemoteMetadata,
    ) -> Result<(ArchiveStats, FileDigests)> {
        let received = self.upstream.download(part, remote.content_length)?;
        if received == 0 {
            return Err(MirrorError::EmptyArchive);
        }
        let archive_stats = archive::verify_and_scan(part)?;
        let digests = checksum::digest_path(part)?;
        if digests.size != received {
            return Err(MirrorError::PartialTransfer {
                expected: received,
                received: digests.size,
            });
        }
        Ok((archive_stats, digests))
    }
}

/// Verify a local archive and compute what its release notes would report.
pub fn describe_archive(path: &Path) -> Result<ReleaseStats> {
    let archive_stats = archive::verify_and_scan(path)?;
    let digests = checksum::digest_path(path)?;
    Ok(ReleaseStats::new(&archive_stats, &digests))
}
