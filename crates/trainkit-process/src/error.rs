use thiserror::Error;

pub type ProcessResult<T> = std::result::Result<T, ProcessError>;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("config file error. Missing \"config.process[{process_id}].{key}\" key")]
    MissingKey { process_id: usize, key: String },

    #[error("invalid value for config key `{key}`: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config key `{key}` rejected: {reason}")]
    RejectedValue { key: String, reason: String },

    #[error("invalid job defaults: {0}")]
    InvalidJob(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
