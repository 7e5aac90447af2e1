use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Well-known `event` identifiers emitted by the firmware stub.
pub const HEARTBEAT: &str = "heartbeat";
pub const SHUTDOWN: &str = "shutdown";

/// Tick counter exactly as it appeared on the wire.
///
/// Usually an integer, but any non-null JSON value is kept. Integers render
/// as `42` (never `42.0`) and strings render without quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(Value);

impl Tick {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.as_u64()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<u64> for Tick {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value_text(&self.0))
    }
}

/// Text form of a decoded JSON value: string contents as-is, anything else
/// as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A structured firmware event decoded from exactly one output line.
///
/// Built once by the classifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: String,
    pub tick: Option<Tick>,
    pub status: Option<String>,
}

impl EventRecord {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            tick: None,
            status: None,
        }
    }

    pub fn with_tick(mut self, tick: impl Into<Tick>) -> Self {
        self.tick = Some(tick.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn is_heartbeat(&self) -> bool {
        self.event == HEARTBEAT
    }

    pub fn is_shutdown(&self) -> bool {
        self.event == SHUTDOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tick_display_keeps_wire_form() {
        assert_eq!(Tick::from(42).to_string(), "42");
        assert_eq!(Tick::new(json!(1.5)).to_string(), "1.5");
        assert_eq!(Tick::new(json!("5")).to_string(), "5");
        assert_eq!(Tick::new(json!([1, 2])).to_string(), "[1,2]");
    }

    #[test]
    fn test_tick_serializes_unchanged() {
        assert_eq!(serde_json::to_string(&Tick::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Tick::new(json!("7"))).unwrap(), "\"7\"");
        assert_eq!(Tick::new(json!("7")).as_u64(), None);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("ok")), "ok");
        assert_eq!(value_text(&json!(200)), "200");
        assert_eq!(value_text(&json!(true)), "true");
    }

    #[test]
    fn test_event_record_builders() {
        let record = EventRecord::new("heartbeat").with_tick(3).with_status("ok");

        assert!(record.is_heartbeat());
        assert!(!record.is_shutdown());
        assert_eq!(record.tick.as_ref().and_then(Tick::as_u64), Some(3));
        assert_eq!(record.status.as_deref(), Some("ok"));
    }
}
