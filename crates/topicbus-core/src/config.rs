use crate::error::BusResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BusConfig {
    pub failure_policy: FailurePolicy,
    pub empty_topic: EmptyTopicPolicy,
}

/// What publish does when a subscriber returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing subscriber and return its error.
    #[default]
    FailFast,
    /// Run every subscriber, then report all failures together.
    Isolate,
}

/// Whether `""` is accepted as a topic name by subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTopicPolicy {
    #[default]
    Reject,
    Allow,
}

impl BusConfig {
    pub fn load(path: &Path) -> BusResult<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> BusResult<Self> {
        Ok(serde_json::from_str(data)?)
    }
}
