//! Per-run artifact directories: screenshots and log files.
//!
//! Artifacts are write-only diagnostics; nothing in the suite reads them
//! back.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::result::ComprobarResult;

/// Timestamped artifact directory for one test run
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    run_dir: PathBuf,
    screenshots_dir: PathBuf,
}

impl RunArtifacts {
    /// Create `<root>/<YYYYmmdd_HHMMSS>/screenshots` for this run
    pub fn create(root: &Path) -> ComprobarResult<Self> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::create_named(root, &stamp)
    }

    /// Create a run directory with an explicit name (tests use fixed names)
    pub fn create_named(root: &Path, name: &str) -> ComprobarResult<Self> {
        let run_dir = root.join(name);
        let screenshots_dir = run_dir.join("screenshots");
        fs::create_dir_all(&screenshots_dir)?;
        info!(dir = %run_dir.display(), "created run artifact directory");
        Ok(Self {
            run_dir,
            screenshots_dir,
        })
    }

    /// The run's root directory
    #[must_use]
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// The run's screenshot directory
    #[must_use]
    pub fn screenshots_dir(&self) -> &Path {
        &self.screenshots_dir
    }

    /// Save PNG bytes as `<screenshots>/<name>.png`, returning the path
    pub fn save_screenshot(&self, name: &str, png: &[u8]) -> ComprobarResult<PathBuf> {
        let path = self.screenshots_dir.join(format!("{name}.png"));
        fs::write(&path, png)?;
        info!(path = %path.display(), "saved screenshot");
        Ok(path)
    }
}
