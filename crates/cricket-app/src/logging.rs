use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the background writer alive; logs flush when it drops.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: Option<PathBuf>,
}

pub fn init_logging(logging: &LoggingConfig) -> Result<Option<LoggingGuard>> {
    if !logging.enabled {
        return Ok(None);
    }

    let (writer, guard) = match logging.file.as_deref() {
        Some(path) => file_writer(path)?,
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let level = logging.level().unwrap_or(Level::WARN);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer);

    // A subscriber may already be installed (tests, embedding).
    if logging.json {
        let _ = tracing::subscriber::set_global_default(
            builder.json().with_current_span(false).finish(),
        );
    } else {
        let _ = tracing::subscriber::set_global_default(builder.with_ansi(false).finish());
    }

    Ok(Some(LoggingGuard {
        _guard: guard,
        log_path: logging.file.clone(),
    }))
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating log file at {}", path.display()))?;
    Ok(non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_installs_nothing() {
        let config = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging(&config).expect("init").is_none());
    }

    #[test]
    fn file_logging_creates_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs").join("session.jsonl");
        let config = LoggingConfig {
            json: true,
            file: Some(path.clone()),
            ..LoggingConfig::default()
        };
        let guard = init_logging(&config).expect("init").expect("guard");
        assert_eq!(guard.log_path.as_deref(), Some(path.as_path()));
        assert!(path.exists());
    }
}
