//! Logging setup: stderr plus append-mode info and error log files.
//!
//! `<logfile>` receives info and debug events, `<logfile>_err` receives
//! warnings and errors. If either file cannot be opened, only stderr is
//! used for the run.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{LevelFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Log file base path used when none is given.
pub const DEFAULT_LOG_PATH: &str = "default_log";

const ERROR_LOG_SUFFIX: &str = "_err";

/// Flush guards for the non-blocking writers; logs are flushed on drop.
#[must_use = "dropping the guards stops log output"]
pub struct LogGuards(#[allow(dead_code)] Vec<WorkerGuard>);

/// `<path>_err`
pub fn error_log_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(ERROR_LOG_SUFFIX);
    PathBuf::from(name)
}

/// Open both log files for appending, or neither.
pub fn open_log_files(path: &Path) -> Option<(File, File)> {
    let error = open_append(&error_log_path(path)).ok()?;
    let info = open_append(path).ok()?;
    Some((info, error))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
pub fn init(logfile: &Path) -> LogGuards {
    let (stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let mut guards = vec![stderr_guard];

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![
        fmt::layer()
            .with_writer(stderr)
            .with_filter(EnvFilter::from_default_env())
            .boxed(),
    ];

    if let Some((info, error)) = open_log_files(logfile) {
        let (info, info_guard) = tracing_appender::non_blocking(info);
        let (error, error_guard) = tracing_appender::non_blocking(error);
        guards.extend([info_guard, error_guard]);

        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(info)
                .with_filter(filter_fn(|meta| {
                    matches!(*meta.level(), Level::INFO | Level::DEBUG)
                }))
                .boxed(),
        );
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(error)
                .with_filter(LevelFilter::WARN)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).init();

    LogGuards(guards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_error_suffix() {
        assert_eq!(error_log_path(Path::new("default_log")), Path::new("default_log_err"));
        assert_eq!(error_log_path(Path::new("logs/run.log")), Path::new("logs/run.log_err"));
    }

    #[test]
    fn opens_both_files_for_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yasp_log");
        std::fs::write(&path, "earlier\n").unwrap();

        let (mut info, _error) = open_log_files(&path).unwrap();
        io::Write::write_all(&mut info, b"later\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
        assert!(error_log_path(&path).exists());
    }

    #[test]
    fn unopenable_files_disable_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("yasp_log");

        assert!(open_log_files(&path).is_none());
    }
}
