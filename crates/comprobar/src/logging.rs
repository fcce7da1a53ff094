//! Structured logging setup: console stream plus a per-run log file.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::result::ComprobarResult;

/// Name of the log file inside the log directory
pub const LOG_FILE_NAME: &str = "comprobar.log";

/// Install a console layer and an appending file layer under `log_dir`.
///
/// Idempotent: a second call (e.g. from another test in the same process)
/// leaves the first subscriber in place.
pub fn init_logging(log_dir: &Path) -> ComprobarResult<()> {
    fs::create_dir_all(log_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        init_logging(dir.path()).unwrap();
        init_logging(dir.path()).unwrap();
        assert!(dir.path().join(LOG_FILE_NAME).exists());
    }
}
