//! Per-process configuration.
//!
//! A process is configured by an ordered YAML mapping. The mapping is kept
//! exactly as it was supplied so it can be persisted verbatim; typed values are
//! pulled out of it on demand, with the caller providing the fallback.

use crate::error::{ProcessError, ProcessResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Raw, ordered configuration of a single process.
///
/// Keys keep insertion order and are unique. There is no mutable access once
/// constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessConfig(Mapping);

impl ProcessConfig {
    #[must_use]
    pub fn new(mapping: Mapping) -> Self {
        Self(mapping)
    }

    /// Parse a YAML document whose root is a mapping.
    ///
    /// An empty document yields an empty config.
    pub fn from_yaml_str(yaml: &str) -> ProcessResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Mapping>(yaml)
            .map(Self)
            .map_err(|source| ProcessError::InvalidValue { key: "<root>".to_string(), source })
    }

    pub fn from_path(path: &Path) -> ProcessResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    #[must_use]
    pub fn raw(&self) -> &Mapping {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up `key` and deserialize it into `T`.
    ///
    /// `Ok(None)` when the key is absent. A present `null` is handed to `T`
    /// as-is, so `Option<_>` targets see it as `None` and others reject it.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ProcessResult<Option<T>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => decode(key, value).map(Some),
        }
    }

    /// Look up `key`, falling back to `default` when it is absent.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> ProcessResult<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Look up `key` as display text. Strings, numbers and booleans are all
    /// accepted; `null`, sequences, mappings and tagged values are rejected.
    pub fn get_text(&self, key: &str) -> ProcessResult<Option<String>> {
        let Some(value) = self.0.get(key) else {
            return Ok(None);
        };
        match value {
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
                Err(ProcessError::RejectedValue { key: key.to_string(), reason: "expected a scalar".to_string() })
            }
        }
    }

    /// Look up a key that must be present.
    pub fn require<T: DeserializeOwned>(&self, key: &str, process_id: usize) -> ProcessResult<T> {
        self.get(key)?
            .ok_or_else(|| ProcessError::MissingKey { process_id, key: key.to_string() })
    }
}

impl From<Mapping> for ProcessConfig {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> ProcessResult<T> {
    serde_yaml::from_value(value.clone())
        .map_err(|source| ProcessError::InvalidValue { key: key.to_string(), source })
}
