use super::policy::{Report, ReportingPolicy};
use crate::domain::Tick;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How reports are written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable labelled lines (default)
    #[default]
    Text,
    /// One JSON object per report
    Ndjson,
}

#[derive(Serialize)]
struct NdjsonReport<'a> {
    timestamp: String,
    #[serde(flatten)]
    report: &'a Report,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    policy: ReportingPolicy,
    format: OutputFormat,
}

impl ReportRenderer {
    pub fn new(policy: ReportingPolicy, format: OutputFormat) -> Self {
        Self { policy, format }
    }

    pub fn render(&self, report: &Report) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Text => Ok(self.render_text(report)),
            OutputFormat::Ndjson => serde_json::to_string(&NdjsonReport {
                timestamp: chrono::Utc::now().to_rfc3339(),
                report,
            }),
        }
    }

    pub fn render_text(&self, report: &Report) -> String {
        let label = self.policy.label();
        match report {
            Report::Verbatim { line } => line.clone(),
            Report::Event {
                event,
                tick,
                status,
            } => format!(
                "{label} Event: {event} | Tick: {} | Status: {}",
                display_tick(tick.as_ref()),
                status.as_deref().unwrap_or("null")
            ),
            Report::NodeAlive { tick } => {
                format!("{label} Node alive | Tick: {}", display_tick(tick.as_ref()))
            }
            Report::NodeShutdown { tick } => format!(
                "{label} Node shutdown | Final Tick: {}",
                display_tick(tick.as_ref())
            ),
            Report::NonJson { line } => match self.policy {
                ReportingPolicy::Restrictive => format!("{label} (non-JSON passthrough): {line}"),
                _ => format!("{label} Non-JSON line: {line}"),
            },
            Report::InvalidRecord { line, reason } => match self.policy {
                ReportingPolicy::Restrictive => {
                    format!("{label} (invalid event record: {reason}): {line}")
                }
                _ => format!("{label} Invalid event record ({reason}): {line}"),
            },
            Report::Passthrough { line } => match self.policy {
                ReportingPolicy::Restrictive => format!("{label} (log): {line}"),
                _ => format!("[LOG passthrough] {line}"),
            },
        }
    }
}

fn display_tick(tick: Option<&Tick>) -> String {
    tick.map_or_else(|| "null".to_string(), ToString::to_string)
}
