use crate::error::{ProcessError, ProcessResult};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::PathBuf;

/// Defaults the owning job hands to each of its processes.
///
/// Processes never reach back into the job; whatever they may fall back on is
/// passed in here explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDefaults {
    pub name: String,
    #[serde(default = "default_training_folder")]
    pub training_folder: PathBuf,
    /// Root for metric summaries; `None` disables metrics logging.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Free-form metadata copied onto every process.
    #[serde(default)]
    pub meta: Mapping,
}

fn default_training_folder() -> PathBuf {
    PathBuf::from("output")
}

impl JobDefaults {
    #[must_use]
    pub fn new(name: impl Into<String>, training_folder: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            training_folder: training_folder.into(),
            log_dir: None,
            meta: Mapping::new(),
        }
    }

    #[must_use]
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Mapping) -> Self {
        self.meta = meta;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> ProcessResult<Self> {
        let job: Self = serde_yaml::from_str(yaml)?;
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> ProcessResult<()> {
        if self.name.trim().is_empty() {
            return Err(ProcessError::InvalidJob("name is required".to_string()));
        }
        if self.training_folder.as_os_str().is_empty() {
            return Err(ProcessError::InvalidJob("training_folder must not be empty".to_string()));
        }
        Ok(())
    }
}
