//! Metrics writer capability.
//!
//! A process only knows that "something" records scalars into a summary
//! directory. The default implementation appends JSON lines; a dashboard
//! backed writer can be plugged in through [`MetricsSinkFactory`].

use crate::error::ProcessResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait MetricsSink: Send {
    /// Directory this sink writes into.
    fn dir(&self) -> &Path;

    fn add_scalar(&mut self, tag: &str, value: f64, step: u64) -> ProcessResult<()>;

    fn flush(&mut self) -> ProcessResult<()> {
        Ok(())
    }
}

/// Opens a [`MetricsSink`] for a summary directory.
pub trait MetricsSinkFactory {
    fn create(&self, dir: &Path) -> ProcessResult<Box<dyn MetricsSink>>;
}

/// One line of `metrics.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord {
    pub tag: String,
    pub value: f64,
    pub step: u64,
    pub wall_time: DateTime<Utc>,
}

/// Appends [`ScalarRecord`]s to `<dir>/metrics.jsonl`.
pub struct JsonlMetricsWriter {
    dir: PathBuf,
    out: BufWriter<File>,
}

impl JsonlMetricsWriter {
    pub const FILE_NAME: &'static str = "metrics.jsonl";

    /// Create `dir` (and parents) and open the metrics file for appending.
    pub fn open(dir: &Path) -> ProcessResult<Self> {
        std::fs::create_dir_all(dir)?;
        let file = OpenOptions::new().create(true).append(true).open(dir.join(Self::FILE_NAME))?;
        Ok(Self { dir: dir.to_path_buf(), out: BufWriter::new(file) })
    }
}

impl MetricsSink for JsonlMetricsWriter {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn add_scalar(&mut self, tag: &str, value: f64, step: u64) -> ProcessResult<()> {
        let record = ScalarRecord { tag: tag.to_string(), value, step, wall_time: Utc::now() };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> ProcessResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Factory for [`JsonlMetricsWriter`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonlMetricsFactory;

impl MetricsSinkFactory for JsonlMetricsFactory {
    fn create(&self, dir: &Path) -> ProcessResult<Box<dyn MetricsSink>> {
        Ok(Box::new(JsonlMetricsWriter::open(dir)?))
    }
}

/// Read back every record from a summary directory written by [`JsonlMetricsWriter`].
pub fn read_scalars(dir: &Path) -> ProcessResult<Vec<ScalarRecord>> {
    let content = std::fs::read_to_string(dir.join(JsonlMetricsWriter::FILE_NAME))?;
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        out.push(serde_json::from_str(line)?);
    }
    Ok(out)
}
