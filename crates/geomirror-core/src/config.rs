use crate::error::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upstream location of the GeoNames postal-code dump.
pub const DEFAULT_UPSTREAM_URL: &str = "https://download.geonames.org/export/zip/allCountries.zip";

/// Marker filename used when `marker_file` is not set.
pub const DEFAULT_MARKER_FILE: &str = ".geonames-marker.toml";

/// libcurl timeouts (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    pub connect_timeout_secs: u64,
    /// Whole-request limit for the HEAD probe and release API calls.
    pub probe_timeout_secs: u64,
    /// Whole-request limit for the archive GET.
    pub download_timeout_secs: u64,
    /// Abort the download if throughput stays below this many bytes/s ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            probe_timeout_secs: 30,
            download_timeout_secs: 3600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

impl TransferConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }
}

/// Global configuration loaded from `~/.config/geomirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Archive to mirror.
    pub upstream_url: String,
    /// Directory receiving the archive and the status files.
    pub output_dir: PathBuf,
    /// Marker file; defaults to `<output_dir>/.geonames-marker.toml`.
    #[serde(default)]
    pub marker_file: Option<PathBuf>,
    /// `owner/repo` whose latest release carries the marker. When set, the
    /// marker is read from the release instead of `marker_file`.
    #[serde(default)]
    pub release_repo: Option<String>,
    /// Environment variable holding the release API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub transfer: TransferConfig,
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_user_agent() -> String {
    format!("geomirror/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            output_dir: PathBuf::from("."),
            marker_file: None,
            release_repo: None,
            token_env: default_token_env(),
            user_agent: default_user_agent(),
            transfer: TransferConfig::default(),
        }
    }
}

impl MirrorConfig {
    /// Effective marker path.
    pub fn marker_path(&self) -> PathBuf {
        self.marker_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(DEFAULT_MARKER_FILE))
    }

    /// Checks fields that serde cannot: URL shape and `owner/repo` form.
    pub fn validate(&self) -> Result<()> {
        crate::url_model::parse_upstream_url(&self.upstream_url)?;
        if let Some(repo) = &self.release_repo {
            match repo.split_once('/') {
                Some((owner, name))
                    if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
                _ => {
                    return Err(MirrorError::Config(format!(
                        "release_repo must be owner/repo, got {repo:?}"
                    )))
                }
            }
        }
        if self.token_env.trim().is_empty() {
            return Err(MirrorError::Config("token_env must not be empty".into()));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("geomirror")
        .map_err(|e| MirrorError::Config(format!("XDG base directories: {e}")))?;
    xdg_dirs
        .place_config_file("config.toml")
        .map_err(|e| MirrorError::io("create config dir for", Path::new("config.toml"), e))
}

/// Load configuration from the XDG location, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MirrorError::io("create", parent, e))?;
        }
        fs::write(&path, toml).map_err(|e| MirrorError::io("write", &path, e))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path, which must exist.
pub fn load_from(path: &Path) -> Result<MirrorConfig> {
    let data = fs::read_to_string(path).map_err(|e| MirrorError::io("read", path, e))?;
    let cfg: MirrorConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
