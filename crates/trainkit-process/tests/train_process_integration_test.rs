//! Integration tests for a concrete training process built on `BaseTrainProcess`.
//!
//! Covers the full construction path with the default JSON-lines metrics
//! writer, a real `indicatif` progress bar, and an overridden run hook.

use indicatif::ProgressBar;
use std::path::PathBuf;
use tempfile::TempDir;
use trainkit_process::{
    is_timestamp, read_scalars, BaseTrainProcess, JobDefaults, ProcessConfig, ProcessResult, TrainProcess,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("trainkit_process=debug"))
        .with_test_writer()
        .try_init();
}

/// Helper process that "trains" for a configured number of steps.
struct CountingProcess {
    base: BaseTrainProcess,
    steps: u64,
}

impl CountingProcess {
    fn new(process_id: usize, job: &JobDefaults, config: ProcessConfig) -> ProcessResult<Self> {
        let base = BaseTrainProcess::with_defaults(process_id, job, config)?;
        let steps = base.require_conf("steps")?;
        Ok(Self { base, steps })
    }
}

impl TrainProcess for CountingProcess {
    fn base(&self) -> &BaseTrainProcess {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseTrainProcess {
        &mut self.base
    }

    fn run(&mut self) -> ProcessResult<()> {
        let steps = self.steps;
        let bar = ProgressBar::hidden();
        bar.set_length(steps);

        let base = self.base_mut();
        base.set_progress_bar(bar.clone());

        while base.step < steps {
            let step = base.step;
            base.log_scalar("loss", 1.0 / (step as f64 + 1.0))?;
            base.print(["step".to_string(), step.to_string()]);
            base.step += 1;
        }

        base.flush_metrics()?;
        base.clear_progress_bar();
        assert_eq!(bar.position(), steps);
        Ok(())
    }
}

fn job(temp: &TempDir) -> JobDefaults {
    JobDefaults::new("counting_job", temp.path().join("output")).with_log_dir(temp.path().join("logs"))
}

#[test]
fn test_counting_process_end_to_end() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let job = job(&temp);
    let config = ProcessConfig::from_yaml_str("name: counter\nsteps: 3\n").unwrap();

    let mut process = CountingProcess::new(0, &job, config).unwrap();
    process.run().unwrap();

    let summary_dir = process.base().writer().unwrap().dir().to_path_buf();
    let leaf = summary_dir.file_name().unwrap().to_str().unwrap().to_string();
    assert!(is_timestamp(leaf.strip_prefix("counter_").unwrap()));

    let records = read_scalars(&summary_dir).unwrap();
    let steps: Vec<u64> = records.iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![0, 1, 2]);
    assert!(records.iter().all(|r| r.tag == "loss"));
}

#[test]
fn test_missing_required_key_fails_after_snapshot() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let job = job(&temp);

    let err = CountingProcess::new(7, &job, ProcessConfig::default()).err().unwrap();
    assert_eq!(err.to_string(), "config file error. Missing \"config.process[7].steps\" key");

    // The base already ran, so its snapshot is on disk.
    assert_eq!(std::fs::read_dir(&job.training_folder).unwrap().count(), 1);
}

#[test]
fn test_job_loaded_from_yaml_drives_defaults() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let yaml = format!(
        "name: yaml_job\ntraining_folder: {}\nmeta:\n  name: yaml_job\n  version: '1.0'\n",
        temp.path().join("runs").display()
    );
    let job = JobDefaults::from_yaml_str(&yaml).unwrap();

    let process = BaseTrainProcess::with_defaults(0, &job, ProcessConfig::default()).unwrap();

    assert_eq!(process.save_root(), temp.path().join("runs").join("yaml_job"));
    assert!(process.writer().is_none());
    assert_eq!(process.meta().get("version").and_then(|v| v.as_str()), Some("1.0"));
    assert!(process.config_snapshot().starts_with(temp.path().join("runs")));
}

#[test]
fn test_each_process_snapshots_its_own_raw_config() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let job = JobDefaults::new("multi", temp.path().join("shared"));

    let first_folder: PathBuf = temp.path().join("first");
    let second_folder: PathBuf = temp.path().join("second");
    let first = ProcessConfig::from_yaml_str(&format!("training_folder: {}\nsteps: 1\n", first_folder.display())).unwrap();
    let second = ProcessConfig::from_yaml_str(&format!("training_folder: {}\nsteps: 2\n", second_folder.display())).unwrap();

    let a = BaseTrainProcess::with_defaults(0, &job, first.clone()).unwrap();
    let b = BaseTrainProcess::with_defaults(1, &job, second.clone()).unwrap();

    assert_eq!(ProcessConfig::from_path(a.config_snapshot()).unwrap(), first);
    assert_eq!(ProcessConfig::from_path(b.config_snapshot()).unwrap(), second);
    assert_eq!(a.save_root(), first_folder.join("multi"));
    assert_eq!(b.save_root(), second_folder.join("multi"));
    assert!(!job.training_folder.exists());
}
