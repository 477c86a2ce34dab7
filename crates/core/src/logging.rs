use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directives read before `RUST_LOG`.
pub const LOG_ENV: &str = "QUARKBOARD_LOG";
const DEFAULT_FILTER: &str = "info";
/// Daily files kept per component.
const MAX_LOG_FILES: usize = 7;

/// Directory holding the rolling log files, `~/.quarkboard/logs`.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quarkboard")
        .join("logs")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `{component}.YYYY-MM-DD.log` in [`log_dir`], oldest files pruned.
fn file_appender(component: &str) -> std::io::Result<RollingFileAppender> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(component)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&dir)
        .map_err(std::io::Error::other)
}

/// Install the global subscriber. Keep the returned guard alive until exit,
/// or buffered file output is lost.
///
/// If the log directory is unusable, file output is dropped and a note goes to
/// stderr; the process keeps running.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let (writer, guard) = match file_appender(component) {
        Ok(appender) => tracing_appender::non_blocking(appender),
        Err(e) => {
            eprintln!("quarkboard: not writing logs to {}: {}", log_dir().display(), e);
            tracing_appender::non_blocking(std::io::sink())
        }
    };

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_under_product_home() {
        assert!(log_dir().ends_with(".quarkboard/logs"));
    }
}
