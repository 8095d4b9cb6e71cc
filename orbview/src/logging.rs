use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tokio::task;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Keeps the non-blocking file writer flushing; drop it last.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

fn effective_level(level: &str) -> &str {
    if KNOWN_LEVELS.contains(&level) {
        level
    } else {
        eprintln!("Invalid log level '{}', defaulting to 'info'", level);
        "info"
    }
}

pub fn init_logging(
    log_dir: impl AsRef<Path>,
    prefix: &str,
    level: &str,
) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let level = effective_level(level);

    let builder = EnvFilter::builder().with_default_directive(level.parse()?);
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {:?}", log_dir))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    start_log_cleanup_task(log_dir, prefix.to_string());

    Ok(LoggerGuard(guard))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String) {
    task::spawn(async move {
        loop {
            match cleanup_old_logs(&log_dir, &prefix, MAX_LOG_AGE) {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Old log files deleted"),
                Err(e) => tracing::warn!("Failed to delete old log file: {}", e),
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Delete `<prefix>*.log` files older than `max_age`; returns how many were removed.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(file_name.starts_with(prefix) && file_name.ends_with(".log")) {
            continue;
        }

        if let Ok(modified) = fs::metadata(&path)?.modified() {
            if now.duration_since(modified).unwrap_or_default() > max_age {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("debug"), "debug");
        assert_eq!(effective_level("verbose"), "info");
    }

    #[test]
    fn test_cleanup_only_touches_matching_stale_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orbview.2026-01-01.log"), "old").unwrap();
        fs::write(dir.path().join("other.2026-01-01.log"), "keep").unwrap();
        fs::write(dir.path().join("orbview.notes"), "keep").unwrap();

        // Everything is older than a zero max age
        std::thread::sleep(Duration::from_millis(20));
        let removed = cleanup_old_logs(dir.path(), "orbview", Duration::ZERO).unwrap();

        assert_eq!(removed, 1);
        assert!(!dir.path().join("orbview.2026-01-01.log").exists());
        assert!(dir.path().join("other.2026-01-01.log").exists());
        assert!(dir.path().join("orbview.notes").exists());
    }

    #[test]
    fn test_cleanup_keeps_fresh_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orbview.today.log"), "fresh").unwrap();

        let removed = cleanup_old_logs(dir.path(), "orbview", MAX_LOG_AGE).unwrap();
        assert_eq!(removed, 0);
    }
}
