use crate::domain::Tick;
use crate::parser::Classification;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reporting policy, chosen once at start-up and passed into the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPolicy {
    /// Print every line verbatim, no classification
    #[default]
    Plain,
    /// Report every decoded event with all fields, tag everything else
    Verbose,
    /// Report only heartbeat and shutdown events, tag everything else
    #[value(name = "validator")]
    #[serde(rename = "validator")]
    Restrictive,
}

impl ReportingPolicy {
    /// Whether lines go through the classifier at all.
    pub fn classifies(&self) -> bool {
        !matches!(self, ReportingPolicy::Plain)
    }

    /// Build the report for one classified line.
    ///
    /// `None` means the line produces no output under this policy.
    pub fn report(&self, classification: &Classification) -> Option<Report> {
        match (self, classification) {
            (ReportingPolicy::Plain, classification) => Some(Report::Verbatim {
                line: classification.line().to_string(),
            }),

            (ReportingPolicy::Verbose, Classification::Event { record, .. }) => Some(Report::Event {
                event: record.event.clone(),
                tick: record.tick.clone(),
                status: record.status.clone(),
            }),
            (ReportingPolicy::Restrictive, Classification::Event { record, .. }) => {
                if record.is_heartbeat() {
                    Some(Report::NodeAlive {
                        tick: record.tick.clone(),
                    })
                } else if record.is_shutdown() {
                    Some(Report::NodeShutdown {
                        tick: record.tick.clone(),
                    })
                } else {
                    None
                }
            }

            (_, Classification::Malformed { line, error }) => {
                if error.is_decode_failure() {
                    Some(Report::NonJson { line: line.clone() })
                } else {
                    Some(Report::InvalidRecord {
                        line: line.clone(),
                        reason: error.to_string(),
                    })
                }
            }
            (_, Classification::Log(line)) => Some(Report::Passthrough { line: line.clone() }),
        }
    }

    /// Label prefix used by the text renderer.
    pub fn label(&self) -> &'static str {
        match self {
            ReportingPolicy::Plain => "",
            ReportingPolicy::Verbose => "[Validator]",
            ReportingPolicy::Restrictive => "[ValidatorEmu]",
        }
    }
}

/// One printable outcome for one input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Verbatim {
        line: String,
    },
    Event {
        event: String,
        tick: Option<Tick>,
        status: Option<String>,
    },
    NodeAlive {
        tick: Option<Tick>,
    },
    NodeShutdown {
        tick: Option<Tick>,
    },
    NonJson {
        line: String,
    },
    InvalidRecord {
        line: String,
        reason: String,
    },
    Passthrough {
        line: String,
    },
}
