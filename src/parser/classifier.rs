use crate::domain::event::value_text;
use crate::domain::{EventRecord, Tick};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid event format")]
    InvalidFormat,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err.to_string())
    }
}

impl ParseError {
    /// True when the text itself failed to decode, as opposed to decoding
    /// into something that is not a usable event.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, ParseError::Json(_))
    }
}

/// Outcome of classifying one stripped, non-empty line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Brace-framed line that decoded into an event record.
    Event { line: String, record: EventRecord },
    /// Brace-framed line that could not be turned into an event record.
    Malformed { line: String, error: ParseError },
    /// Free-form log text, passed through unchanged.
    Log(String),
}

impl Classification {
    pub fn kind(&self) -> &'static str {
        match self {
            Classification::Event { .. } => "event",
            Classification::Malformed { .. } => "malformed",
            Classification::Log(_) => "log",
        }
    }

    /// The stripped line this classification was made from.
    pub fn line(&self) -> &str {
        match self {
            Classification::Event { line, .. }
            | Classification::Malformed { line, .. }
            | Classification::Log(line) => line,
        }
    }
}

/// Line Event Classifier.
///
/// Stateless: the same line always yields the same classification.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineClassifier;

impl LineClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Strip surrounding whitespace and classify. Blank lines yield `None`.
    pub fn classify_raw(&self, raw: &str) -> Option<Classification> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }
        Some(self.classify(line))
    }

    /// Classify an already stripped, non-empty line.
    pub fn classify(&self, line: &str) -> Classification {
        if !Self::is_framed(line) {
            return Classification::Log(line.to_string());
        }

        match self.parse_event(line) {
            Ok(record) => Classification::Event {
                line: line.to_string(),
                record,
            },
            Err(error) => Classification::Malformed {
                line: line.to_string(),
                error,
            },
        }
    }

    /// Decode a brace-framed line into an event record.
    ///
    /// Field values are taken as they come: a numeric `event` names the
    /// event by its text, and `tick` keeps whatever JSON value it carried.
    /// A missing or null `event` is the only rejected shape.
    pub fn parse_event(&self, line: &str) -> Result<EventRecord, ParseError> {
        let json: Value = serde_json::from_str(line)?;
        let obj = json.as_object().ok_or(ParseError::InvalidFormat)?;

        let event = optional_field(obj, "event")
            .map(value_text)
            .ok_or_else(|| ParseError::MissingField("event".to_string()))?;
        let tick = optional_field(obj, "tick").cloned().map(Tick::new);
        let status = optional_field(obj, "status").map(value_text);

        Ok(EventRecord {
            event,
            tick,
            status,
        })
    }

    fn is_framed(line: &str) -> bool {
        line.starts_with('{') && line.ends_with('}')
    }
}

// `null` counts as absent
fn optional_field<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_parsing() {
        let classifier = LineClassifier::new();

        let line = r#"{"event":"heartbeat","tick":3,"status":"ok"}"#;

        match classifier.classify(line) {
            Classification::Event { line: raw, record } => {
                assert_eq!(raw, line);
                assert_eq!(record.event, "heartbeat");
                assert_eq!(record.tick, Some(Tick::from(3)));
                assert_eq!(record.status.as_deref(), Some("ok"));
            }
            other => panic!("Expected event, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let classifier = LineClassifier::new();

        let record = classifier.parse_event(r#"{"event":"boot"}"#).unwrap();
        assert_eq!(record.event, "boot");
        assert!(record.tick.is_none());
        assert!(record.status.is_none());

        let record = classifier
            .parse_event(r#"{"event":"boot","tick":null,"status":null}"#)
            .unwrap();
        assert!(record.tick.is_none());
        assert!(record.status.is_none());
    }

    #[test]
    fn test_missing_event_is_checked() {
        let classifier = LineClassifier::new();

        let result = classifier.parse_event(r#"{"tick":1}"#);
        assert_eq!(
            result.unwrap_err(),
            ParseError::MissingField("event".to_string())
        );
    }

    #[test]
    fn test_unusual_field_types_are_kept() {
        let classifier = LineClassifier::new();

        let record = classifier.parse_event(r#"{"event":5,"tick":1}"#).unwrap();
        assert_eq!(record.event, "5");
        assert!(!record.is_heartbeat());

        let record = classifier
            .parse_event(r#"{"event":"heartbeat","tick":"5"}"#)
            .unwrap();
        assert!(record.is_heartbeat());
        assert_eq!(record.tick.as_ref().map(ToString::to_string).as_deref(), Some("5"));
        assert_eq!(record.tick.as_ref().and_then(Tick::as_u64), None);

        let record = classifier
            .parse_event(r#"{"event":"heartbeat","tick":1,"status":200}"#)
            .unwrap();
        assert_eq!(record.status.as_deref(), Some("200"));

        let record = classifier
            .parse_event(r#"{"event":"heartbeat","status":true}"#)
            .unwrap();
        assert_eq!(record.status.as_deref(), Some("true"));
    }

    #[test]
    fn test_null_event_is_missing() {
        let classifier = LineClassifier::new();

        assert_eq!(
            classifier.parse_event(r#"{"event":null,"tick":1}"#).unwrap_err(),
            ParseError::MissingField("event".to_string())
        );
        assert_eq!(
            classifier.parse_event("[1,2]").unwrap_err(),
            ParseError::InvalidFormat
        );
    }

    #[test]
    fn test_malformed_braces() {
        let classifier = LineClassifier::new();

        match classifier.classify("{not valid json}") {
            Classification::Malformed { line, error } => {
                assert_eq!(line, "{not valid json}");
                assert!(error.is_decode_failure());
            }
            other => panic!("Expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_unframed_line_is_log() {
        let classifier = LineClassifier::new();

        // Starts with a brace but does not end with one: never decoded
        assert_eq!(
            classifier.classify(r#"{"event":"heartbeat"} trailing"#),
            Classification::Log(r#"{"event":"heartbeat"} trailing"#.to_string())
        );
        assert_eq!(
            classifier.classify("[BOOT] starting"),
            Classification::Log("[BOOT] starting".to_string())
        );
    }

    #[test]
    fn test_classify_raw_strips_and_skips_blank() {
        let classifier = LineClassifier::new();

        assert!(classifier.classify_raw("").is_none());
        assert!(classifier.classify_raw("   \t  ").is_none());
        assert_eq!(
            classifier.classify_raw("  hello \r\n"),
            Some(Classification::Log("hello".to_string()))
        );
    }

    #[test]
    fn test_kind_labels() {
        let classifier = LineClassifier::new();
        assert_eq!(classifier.classify("x").kind(), "log");
        assert_eq!(classifier.classify("{x}").kind(), "malformed");
        assert_eq!(classifier.classify(r#"{"event":"e"}"#).kind(), "event");
    }

    #[test]
    fn test_every_classification_keeps_its_line() {
        let classifier = LineClassifier::new();
        for line in [r#"{"event":"e"}"#, "{x}", "plain text"] {
            assert_eq!(classifier.classify(line).line(), line);
        }
    }
}
