//! CLI command handlers. Each command is in its own file.

mod check;
mod checksum;
mod probe;
mod stats;

pub use check::{run_check, CheckArgs};
pub use checksum::run_checksum;
pub use probe::run_probe;
pub use stats::run_stats;
