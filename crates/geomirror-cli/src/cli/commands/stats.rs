//! `geomirror stats <archive>` – verify a local archive and print its notes.

use anyhow::{Context, Result};
use geomirror_core::checker::describe_archive;
use geomirror_core::release;
use std::path::Path;

pub fn run_stats(path: &Path) -> Result<()> {
    let stats =
        describe_archive(path).with_context(|| format!("verifying {}", path.display()))?;
    let body = release::release_notes(&stats, None, "-");
    // The marker line is meaningless for a local file.
    for line in body.lines() {
        if !line.starts_with(release::MARKER_LINE_PREFIX) {
            println!("{line}");
        }
    }
    Ok(())
}
