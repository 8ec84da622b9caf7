//! `geomirror probe` – show what the upstream currently advertises.

use anyhow::Result;
use geomirror_core::config::MirrorConfig;
use geomirror_core::{HttpUpstream, Upstream};

pub fn run_probe(cfg: &MirrorConfig, url: Option<&str>) -> Result<()> {
    let url = url.unwrap_or(&cfg.upstream_url);
    let upstream = HttpUpstream::new(url, cfg.user_agent.clone(), cfg.transfer.clone())?;
    let meta = upstream.probe()?;
    let dash = || "-".to_string();
    println!("URL            {}", upstream.url());
    println!("ETag           {}", meta.etag.clone().unwrap_or_else(dash));
    println!("Last-Modified  {}", meta.last_modified.clone().unwrap_or_else(dash));
    println!(
        "Content-Length {}",
        meta.content_length.map(|n| n.to_string()).unwrap_or_else(dash)
    );
    match meta.identity() {
        Ok(id) => println!("Identity       {id}"),
        Err(e) => println!("Identity       - ({e})"),
    }
    Ok(())
}
