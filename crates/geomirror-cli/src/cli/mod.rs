//! CLI for the GeoNames allCountries mirror.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geomirror_core::config::{self, MirrorConfig};
use geomirror_core::MirrorError;
use std::path::PathBuf;

use commands::{run_check, run_checksum, run_probe, run_stats, CheckArgs};

/// Top-level CLI for the GeoNames mirror.
#[derive(Debug, Parser)]
#[command(name = "geomirror")]
#[command(about = "Mirror GeoNames allCountries.zip and prepare release files", long_about = None)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/geomirror/config.toml, created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check upstream, download on change, write the status files.
    Check {
        /// Directory for the archive and status files.
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Upstream archive URL.
        #[arg(long)]
        url: Option<String>,
        /// Marker file (default: <output-dir>/.geonames-marker.toml).
        #[arg(long, value_name = "PATH", conflicts_with = "release_repo")]
        marker_file: Option<PathBuf>,
        /// Read the marker from the latest release of OWNER/REPO instead of a file.
        #[arg(long, value_name = "OWNER/REPO")]
        release_repo: Option<String>,
        /// Download even if the marker matches upstream.
        #[arg(long)]
        force: bool,
    },

    /// Show upstream ETag, Last-Modified and size without downloading.
    Probe {
        /// Upstream archive URL.
        #[arg(long)]
        url: Option<String>,
    },

    /// Verify a local archive and print the release notes it would get.
    Stats {
        /// Path to the zip archive.
        path: PathBuf,
    },

    /// Compute MD5 and SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl Cli {
    fn load_config(&self) -> Result<MirrorConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => config::load_or_init().context("loading default config")?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    pub fn run(self) -> Result<()> {
        match &self.command {
            CliCommand::Check {
                output_dir,
                url,
                marker_file,
                release_repo,
                force,
            } => {
                let cfg = self.load_config()?;
                let args = CheckArgs {
                    output_dir: output_dir.clone(),
                    url: url.clone(),
                    marker_file: marker_file.clone(),
                    release_repo: release_repo.clone(),
                    force: *force,
                };
                run_check(cfg, args)?;
            }
            CliCommand::Probe { url } => {
                let cfg = self.load_config()?;
                run_probe(&cfg, url.as_deref())?;
            }
            CliCommand::Stats { path } => run_stats(path)?,
            CliCommand::Checksum { path } => run_checksum(path)?,
        }
        Ok(())
    }
}

/// Final error line on stderr, tagged with the failure kind when the chain
/// carries a `MirrorError`.
pub fn error_line(err: &anyhow::Error) -> String {
    match err.chain().find_map(|e| e.downcast_ref::<MirrorError>()) {
        Some(mirror) => format!("geomirror error ({}): {:#}", mirror.kind(), err),
        None => format!("geomirror error: {:#}", err),
    }
}

#[cfg(test)]
mod tests;
