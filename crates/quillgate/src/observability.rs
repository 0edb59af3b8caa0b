//! Logging setup: human-readable stderr plus optional JSONL file output.
//!
//! File logging is off unless `QUILLGATE_LOG_PATH`, `QUILLGATE_LOG_DIR` or the
//! config's `log_dir` names a destination. Stdout is never written to, so
//! `serve` can use it for the MCP transport.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "QUILLGATE_LOG_PATH";
const LOG_DIR_ENV: &str = "QUILLGATE_LOG_DIR";
const LOG_FILE_PREFIX: &str = "quillgate.jsonl";

/// Where, if anywhere, to write the JSONL log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Single file, never rotated.
    pub log_path: Option<PathBuf>,
    /// Directory of daily-rotated files.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment; `config_log_dir` applies when neither variable is set.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        match env_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => Self {
                log_path: Some(path),
                log_dir: None,
            },
            None => Self {
                log_path: None,
                log_dir: env_dir
                    .filter(|p| !p.as_os_str().is_empty())
                    .or(config_dir),
            },
        }
    }

    /// Whether any file output is configured.
    pub const fn file_logging_enabled(&self) -> bool {
        self.log_path.is_some() || self.log_dir.is_some()
    }
}

/// Default directive for the CLI flags when `RUST_LOG` is unset.
fn level_directive(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Build the filter: `RUST_LOG` wins, then `-q`/`-v`, then the configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(quiet, verbose, default_level)))
}

fn file_appender(config: &ObservabilityConfig) -> anyhow::Result<Option<RollingFileAppender>> {
    if let Some(path) = &config.log_path {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file = path
            .file_name()
            .with_context(|| format!("log path {} has no file name", path.display()))?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        return Ok(Some(tracing_appender::rolling::never(dir, file)));
    }
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        return Ok(Some(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)));
    }
    Ok(None)
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background file writer.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_beats_directories() {
        let cfg = ObservabilityConfig::resolve(
            Some(PathBuf::from("/tmp/q.jsonl")),
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/tmp/cfg")),
        );
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/q.jsonl")));
        assert!(cfg.log_dir.is_none());
    }

    #[test]
    fn env_dir_beats_config_dir() {
        let cfg = ObservabilityConfig::resolve(
            None,
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/tmp/cfg")),
        );
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/tmp/env")));
    }

    #[test]
    fn nothing_configured_disables_file_logging() {
        let cfg = ObservabilityConfig::resolve(Some(PathBuf::new()), None, None);
        assert!(!cfg.file_logging_enabled());
    }

    #[test]
    fn flags_pick_level() {
        assert_eq!(level_directive(true, 2, "info"), "error");
        assert_eq!(level_directive(false, 0, "warn"), "warn");
        assert_eq!(level_directive(false, 1, "info"), "debug");
        assert_eq!(level_directive(false, 3, "info"), "trace");
    }

    #[test]
    fn file_appender_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let cfg = ObservabilityConfig {
            log_path: None,
            log_dir: Some(dir.clone()),
        };
        assert!(file_appender(&cfg).unwrap().is_some());
        assert!(dir.is_dir());
    }
}
