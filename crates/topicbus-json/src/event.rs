use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A topic plus its JSON payload, as carried by scripts and [`crate::EventSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    pub topic: String,
    #[serde(default)]
    pub payload: Value,
}

impl BusEvent {
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}
