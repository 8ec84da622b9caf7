pub mod config;
pub mod error;
pub mod logging;

pub mod archive;
pub mod checker;
pub mod checksum;
pub mod downloader;
pub mod fetch_head;
pub mod marker;
pub mod release;
pub mod status;
pub mod storage;
pub mod url_model;

pub use checker::{HttpUpstream, RunOutcome, UpdateChecker, UpdateReport, Upstream};
pub use error::{ErrorKind, MirrorError, Result};
