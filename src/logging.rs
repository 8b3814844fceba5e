//! Log subscriber setup for the CLI.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::error::CardError;

/// Install the fmt subscriber on stderr, plus `log_file` when given.
///
/// `verbose` lowers the level from `info` to `debug`. Fails if the log file
/// cannot be opened or a global subscriber is already installed.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), CardError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_max_level(level);

    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| CardError::Config(format!("Failed to install logger: {}", e)))
}
