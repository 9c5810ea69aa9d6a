//! Trainkit Process
//!
//! Building blocks for one step of a training job:
//! - Resolving a process config against job defaults (`ProcessConfig`, `JobDefaults`)
//! - Deriving save/log paths (`ProcessLayout`)
//! - Snapshotting the raw config next to the outputs
//! - Pluggable metrics writers and progress indicators
//! - The `TrainProcess` run hook

pub mod config;
pub mod error;
pub mod job;
pub mod layout;
pub mod metrics;
pub mod process;
pub mod progress;
pub mod snapshot;

pub use config::ProcessConfig;
pub use error::{ProcessError, ProcessResult};
pub use job::JobDefaults;
pub use layout::{is_timestamp, now_timestamp, timestamp, ProcessLayout, TIMESTAMP_FORMAT};
pub use metrics::{read_scalars, JsonlMetricsFactory, JsonlMetricsWriter, MetricsSink, MetricsSinkFactory, ScalarRecord};
pub use process::{BaseTrainProcess, TrainProcess};
pub use progress::ProgressLine;
pub use snapshot::save_process_config;
