//! Event chains as served by an evidence feed.

use serde_json::Value;

use crate::event::ChainEvent;
use crate::value::scalar_text;

/// The events recorded for one artifact, in publication order.
///
/// Publication order carries no meaning; verifiers derive canonical order
/// from the events themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChain {
    /// Artifact the chain describes, when the document names it.
    pub artifact_url: Option<String>,
    /// Events in the order they were published.
    pub events: Vec<ChainEvent>,
}

impl EventChain {
    /// Builds a chain from events.
    pub fn new(events: Vec<ChainEvent>) -> Self {
        Self {
            artifact_url: None,
            events,
        }
    }

    /// Decodes a feed document.
    ///
    /// Accepts either a bare array of events or an object with an `events`
    /// array. Anything else decodes to an empty chain, which verification
    /// rejects.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::new(items.into_iter().map(ChainEvent::new).collect()),
            Value::Object(mut map) => {
                let artifact_url = map.get("artifact_url").and_then(scalar_text);
                let events = match map.remove("events") {
                    Some(Value::Array(items)) => items.into_iter().map(ChainEvent::new).collect(),
                    _ => Vec::new(),
                };
                Self {
                    artifact_url,
                    events,
                }
            }
            _ => Self::default(),
        }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when the chain holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
