use crate::event::BusEvent;
use crate::sink::EventSink;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use topicbus_core::BusResult;

/// Events to publish in file order, read from
/// `{ "events": [ { "topic": ..., "payload": ... } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    pub events: Vec<BusEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayReport {
    pub delivered: usize,
    /// Topics of events nobody was subscribed to, in play order.
    pub undelivered: Vec<String>,
}

impl EventScript {
    pub fn load(path: &Path) -> BusResult<Self> {
        let data = fs::read_to_string(path)?;
        let script: EventScript = serde_json::from_str(&data)?;
        tracing::info!(path = %path.display(), events = script.events.len(), "event script loaded");
        Ok(script)
    }

    /// Emits every event in order. The first subscriber error aborts the run.
    pub fn play(&self, sink: &dyn EventSink) -> BusResult<PlayReport> {
        let mut report = PlayReport::default();
        for event in &self.events {
            if sink.emit(event)? {
                report.delivered += 1;
            } else {
                tracing::info!(topic = %event.topic, "no subscribers for scripted event");
                report.undelivered.push(event.topic.clone());
            }
        }
        Ok(report)
    }
}
