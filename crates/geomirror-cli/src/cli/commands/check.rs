//! `geomirror check` – one scheduled update run.
//!
//! Prints the status token (`update` / `no_update`) on stdout; the same
//! token is in `update_status.txt` for the release step.

use anyhow::{Context, Result};
use geomirror_core::config::MirrorConfig;
use geomirror_core::marker::{FileMarkerStore, MarkerStore, ReleaseMarkerStore};
use geomirror_core::{HttpUpstream, RunOutcome, UpdateChecker};
use std::path::PathBuf;

/// Flags that override the loaded config for this run.
#[derive(Debug, Default)]
pub struct CheckArgs {
    pub output_dir: Option<PathBuf>,
    pub url: Option<String>,
    pub marker_file: Option<PathBuf>,
    pub release_repo: Option<String>,
    pub force: bool,
}

/// Fold CLI overrides into the config and re-validate.
pub(crate) fn apply_overrides(mut cfg: MirrorConfig, args: &CheckArgs) -> Result<MirrorConfig> {
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(url) = &args.url {
        cfg.upstream_url = url.clone();
    }
    if let Some(marker) = &args.marker_file {
        cfg.marker_file = Some(marker.clone());
        cfg.release_repo = None;
    }
    if let Some(repo) = &args.release_repo {
        cfg.release_repo = Some(repo.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}

fn marker_store(cfg: &MirrorConfig) -> Box<dyn MarkerStore> {
    match &cfg.release_repo {
        Some(repo) => {
            let token = std::env::var(&cfg.token_env).ok();
            if token.is_none() {
                tracing::warn!(
                    "{} is not set; querying releases of {} unauthenticated",
                    cfg.token_env,
                    repo
                );
            }
            Box::new(ReleaseMarkerStore::new(
                repo.clone(),
                token,
                cfg.user_agent.clone(),
                cfg.transfer.clone(),
            ))
        }
        None => Box::new(FileMarkerStore::new(cfg.marker_path())),
    }
}

pub fn run_check(cfg: MirrorConfig, args: CheckArgs) -> Result<()> {
    let cfg = apply_overrides(cfg, &args)?;
    let upstream = HttpUpstream::from_config(&cfg)?;
    let markers = marker_store(&cfg);

    let checker = UpdateChecker::new(&upstream, markers.as_ref(), &cfg.output_dir).force(args.force);
    let outcome = checker
        .run()
        .with_context(|| format!("update run for {}", cfg.upstream_url))?;

    match &outcome {
        RunOutcome::NoUpdate { identity } => {
            tracing::info!("no update (upstream {})", identity);
        }
        RunOutcome::Updated(report) => {
            tracing::info!(
                "mirrored {} ({} -> {})",
                report.archive_path.display(),
                report.previous.as_deref().unwrap_or("<none>"),
                report.identity
            );
        }
    }
    println!("{}", outcome.status());
    Ok(())
}
