//! Persisting the raw process config next to the training output.

use crate::config::ProcessConfig;
use crate::error::ProcessResult;
use crate::layout::ProcessLayout;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Write `config` to `<training_folder>/process_config_<stamp>.yaml`.
///
/// The training folder is created if needed. The file is written in place,
/// so an interrupted write can leave a truncated snapshot behind.
pub fn save_process_config(layout: &ProcessLayout, config: &ProcessConfig, stamp: &str) -> ProcessResult<PathBuf> {
    fs::create_dir_all(layout.training_folder())?;

    let path = layout.config_snapshot_path(stamp);
    let yaml = serde_yaml::to_string(config)?;
    fs::write(&path, yaml)?;

    info!(path = %path.display(), keys = config.len(), "Saved process config snapshot");
    Ok(path)
}
