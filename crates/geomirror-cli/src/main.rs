use geomirror_core::logging;

mod cli;

use crate::cli::{error_line, Cli};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    match cli.log_file.as_deref() {
        Some(path) => {
            if let Err(err) = logging::init_logging_file(path) {
                logging::init_logging_stderr();
                tracing::warn!("file logging unavailable, using stderr: {:#}", err);
            }
        }
        None => logging::init_logging_stderr(),
    }

    if let Err(err) = cli.run() {
        eprintln!("{}", error_line(&err));
        std::process::exit(1);
    }
}
