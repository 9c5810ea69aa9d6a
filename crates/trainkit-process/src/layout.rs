use chrono::{DateTime, Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// strftime pattern shared by summary directories and config snapshots.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Format a wall-clock instant as `YYYYMMDD-HHMMSS`.
#[must_use]
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Timestamp for the current local time.
#[must_use]
pub fn now_timestamp() -> String {
    timestamp(&Local::now())
}

/// Returns true when `s` is exactly a `YYYYMMDD-HHMMSS` stamp.
#[must_use]
pub fn is_timestamp(s: &str) -> bool {
    s.len() == 15 && NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).is_ok()
}

/// Filesystem layout for a single training process.
///
/// Everything a process writes is derived from its resolved training folder,
/// its optional log directory and the owning job's name.
#[derive(Debug, Clone)]
pub struct ProcessLayout {
    training_folder: PathBuf,
    log_dir: Option<PathBuf>,
    job_name: String,
}

impl ProcessLayout {
    #[must_use]
    pub fn new(training_folder: PathBuf, log_dir: Option<PathBuf>, job_name: impl Into<String>) -> Self {
        // An empty log dir is treated the same as none.
        let log_dir = log_dir.filter(|dir| !dir.as_os_str().is_empty());
        Self { training_folder, log_dir, job_name: job_name.into() }
    }

    #[must_use]
    pub fn training_folder(&self) -> &Path {
        &self.training_folder
    }

    #[must_use]
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// `<training_folder>/<job_name>`
    #[must_use]
    pub fn save_root(&self) -> PathBuf {
        self.training_folder.join(&self.job_name)
    }

    /// `<log_dir>/<process_name>_<stamp>`, or `None` when logging is disabled.
    #[must_use]
    pub fn summary_dir(&self, process_name: &str, stamp: &str) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| dir.join(format!("{process_name}_{stamp}")))
    }

    /// `<training_folder>/process_config_<stamp>.yaml`
    #[must_use]
    pub fn config_snapshot_path(&self, stamp: &str) -> PathBuf {
        self.training_folder.join(format!("process_config_{stamp}.yaml"))
    }
}
