//! Base training process.
//!
//! [`BaseTrainProcess`] resolves a process's settings against its job's
//! defaults, opens the optional metrics writer, and snapshots the raw config
//! before any training work starts. Concrete processes embed it and implement
//! [`TrainProcess`].

use crate::config::ProcessConfig;
use crate::error::{ProcessError, ProcessResult};
use crate::job::JobDefaults;
use crate::layout::{now_timestamp, ProcessLayout};
use crate::metrics::{JsonlMetricsFactory, MetricsSink, MetricsSinkFactory};
use crate::progress::ProgressLine;
use crate::snapshot::save_process_config;
use serde::de::DeserializeOwned;
use serde_yaml::Mapping;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct BaseTrainProcess {
    process_id: usize,
    name: String,
    job_name: String,
    config: ProcessConfig,
    meta: Mapping,
    layout: ProcessLayout,
    writer: Option<Box<dyn MetricsSink>>,
    progress_bar: Option<Box<dyn ProgressLine>>,
    config_snapshot: PathBuf,
    stdout: Box<dyn Write + Send>,
    pub step: u64,
    pub first_step: u64,
}

impl BaseTrainProcess {
    /// Build a process from its raw config and the owning job's defaults.
    ///
    /// `name`, `training_folder` and `log_dir` fall back to the job's values
    /// when the config does not set them. Opens a metrics writer through
    /// `metrics` when a log dir is configured, then writes the config
    /// snapshot.
    pub fn new(
        process_id: usize,
        job: &JobDefaults,
        config: ProcessConfig,
        metrics: &dyn MetricsSinkFactory,
    ) -> ProcessResult<Self> {
        job.validate()?;

        let name = config.get_text("name")?.unwrap_or_else(|| job.name.clone());
        let training_folder: PathBuf = config.get_or("training_folder", job.training_folder.clone())?;
        if training_folder.as_os_str().is_empty() {
            return Err(ProcessError::RejectedValue {
                key: "training_folder".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        let log_dir: Option<PathBuf> = config.get_or("log_dir", job.log_dir.clone())?;
        let layout = ProcessLayout::new(training_folder, log_dir, job.name.clone());

        debug!(
            process_id,
            name = %name,
            training_folder = %layout.training_folder().display(),
            log_dir = ?layout.log_dir(),
            "Resolved process settings"
        );

        let writer = open_metrics_writer(&layout, &name, metrics)?;
        let config_snapshot = save_process_config(&layout, &config, &now_timestamp())?;

        Ok(Self {
            process_id,
            name,
            job_name: job.name.clone(),
            config,
            meta: job.meta.clone(),
            layout,
            writer,
            progress_bar: None,
            config_snapshot,
            stdout: Box::new(std::io::stdout()),
            step: 0,
            first_step: 0,
        })
    }

    /// [`Self::new`] with the JSON-lines metrics writer.
    pub fn with_defaults(process_id: usize, job: &JobDefaults, config: ProcessConfig) -> ProcessResult<Self> {
        Self::new(process_id, job, config, &JsonlMetricsFactory)
    }

    /// Redirect the fallback output of [`Self::print`].
    #[must_use]
    pub fn with_stdout(mut self, out: impl Write + Send + 'static) -> Self {
        self.stdout = Box::new(out);
        self
    }

    #[must_use]
    pub fn process_id(&self) -> usize {
        self.process_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// The raw config, exactly as supplied.
    #[must_use]
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    #[must_use]
    pub fn meta(&self) -> &Mapping {
        &self.meta
    }

    #[must_use]
    pub fn training_folder(&self) -> &Path {
        self.layout.training_folder()
    }

    #[must_use]
    pub fn save_root(&self) -> PathBuf {
        self.layout.save_root()
    }

    #[must_use]
    pub fn log_dir(&self) -> Option<&Path> {
        self.layout.log_dir()
    }

    #[must_use]
    pub fn config_snapshot(&self) -> &Path {
        &self.config_snapshot
    }

    #[must_use]
    pub fn writer(&self) -> Option<&dyn MetricsSink> {
        self.writer.as_deref()
    }

    pub fn get_conf<T: DeserializeOwned>(&self, key: &str, default: T) -> ProcessResult<T> {
        self.config.get_or(key, default)
    }

    pub fn require_conf<T: DeserializeOwned>(&self, key: &str) -> ProcessResult<T> {
        self.config.require(key, self.process_id)
    }

    /// Record a scalar at the current step. A no-op without a writer.
    pub fn log_scalar(&mut self, tag: &str, value: f64) -> ProcessResult<()> {
        let step = self.step;
        match self.writer.as_mut() {
            Some(writer) => writer.add_scalar(tag, value, step),
            None => Ok(()),
        }
    }

    pub fn flush_metrics(&mut self) -> ProcessResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    pub fn set_progress_bar(&mut self, bar: impl ProgressLine + 'static) {
        self.progress_bar = Some(Box::new(bar));
    }

    /// Detach the progress indicator; later prints go to stdout again.
    pub fn clear_progress_bar(&mut self) -> Option<Box<dyn ProgressLine>> {
        self.progress_bar.take()
    }

    #[must_use]
    pub fn has_progress_bar(&self) -> bool {
        self.progress_bar.is_some()
    }

    /// Print space-separated `values`.
    ///
    /// With a progress indicator attached the line goes through it and the
    /// indicator moves one unit; otherwise it is written to stdout.
    pub fn print<I, T>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let line = values.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");

        if let Some(bar) = &self.progress_bar {
            bar.write_line(&line);
            bar.advance();
        } else if let Err(e) = writeln!(self.stdout, "{line}") {
            warn!(process_id = self.process_id, error = %e, "Failed to write to stdout");
        }
    }
}

fn open_metrics_writer(
    layout: &ProcessLayout,
    name: &str,
    metrics: &dyn MetricsSinkFactory,
) -> ProcessResult<Option<Box<dyn MetricsSink>>> {
    let Some(summary_dir) = layout.summary_dir(name, &now_timestamp()) else {
        return Ok(None);
    };
    let writer = metrics.create(&summary_dir)?;
    info!(path = %summary_dir.display(), "Opened metrics writer");
    Ok(Some(writer))
}

/// A unit of work in a training job.
///
/// Implementors embed a [`BaseTrainProcess`] and override [`TrainProcess::run`].
pub trait TrainProcess {
    fn base(&self) -> &BaseTrainProcess;

    fn base_mut(&mut self) -> &mut BaseTrainProcess;

    fn run(&mut self) -> ProcessResult<()> {
        Ok(())
    }
}

impl TrainProcess for BaseTrainProcess {
    fn base(&self) -> &BaseTrainProcess {
        self
    }

    fn base_mut(&mut self) -> &mut BaseTrainProcess {
        self
    }
}
