//! File logging bootstrap.
//!
//! Logs go to `<data_dir>/logs/todue*.log` and never to the terminal, so the
//! TUI stays intact. Initialization happens at most once per process.

use std::sync::OnceLock;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::config::Config;

const LOG_FILE_BASENAME: &str = "todue";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Starts the rotating file logger described by `config`.
///
/// Calling it again after a successful start is a no-op.
pub fn init_logging(config: &Config) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let dir = config.log_dir();
    std::fs::create_dir_all(&dir)
        .map_err(|err| format!("failed to create log directory `{}`: {err}", dir.display()))?;

    let handle = Logger::try_with_str(&config.log_level)
        .map_err(|err| format!("invalid log level `{}`: {err}", config.log_level))?
        .log_to_file(FileSpec::default().directory(&dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    let _ = LOGGER.set(handle);
    info!(
        "todue {} started, level={} data_dir={}",
        env!("CARGO_PKG_VERSION"),
        config.log_level,
        config.data_dir.display()
    );
    Ok(())
}
