use std::path::PathBuf;

use crate::error::{Result, TodoError};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TODUE_DATA_DIR";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "TODUE_LOG";

/// Runtime settings resolved from flags, environment and platform defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `task.json` and the `logs/` folder.
    pub data_dir: PathBuf,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
}

impl Config {
    /// Resolves the configuration.
    ///
    /// The data directory is determined in the following order:
    /// 1. `data_dir` argument (the `--data-dir` flag).
    /// 2. `TODUE_DATA_DIR` environment variable.
    /// 3. `~/.local/share/todue` (on Linux).
    /// 4. `./` (fallback).
    ///
    /// The log level follows the same flag, then `TODUE_LOG`, then build mode default.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> Result<Config> {
        let data_dir = data_dir
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        let level = log_level
            .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
            .unwrap_or_else(|| default_log_level().to_string());
        Ok(Config {
            data_dir,
            log_level: normalize_level(&level)?.to_string(),
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn default_data_dir() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("todue");
    p
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(TodoError::Validation(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        let cfg = Config::resolve(Some(PathBuf::from("/tmp/todue-x")), Some("WARNING".into())).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/todue-x"));
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.log_dir(), PathBuf::from("/tmp/todue-x/logs"));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = Config::resolve(Some(PathBuf::from("/tmp")), Some("loud".into())).unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }
}
