use crate::collector::LineSource;
use crate::domain::RelayError;
use crate::parser::{Classification, LineClassifier};
use crate::report::{OutputFormat, Report, ReportRenderer, ReportSink, ReportingPolicy};
use serde::Serialize;
use std::future::Future;
use tracing::{debug, info, warn};

use super::Config;

/// Counters for one relay run. Nothing about individual lines is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub lines_read: u64,
    pub blank_skipped: u64,
    pub events: u64,
    pub malformed: u64,
    pub logs: u64,
    pub reports: u64,
    /// Well-formed events the policy has no report for.
    pub dropped: u64,
    pub interrupted: bool,
    pub exit_code: Option<i32>,
}

impl RunSummary {
    fn record(&mut self, classification: &Classification) {
        match classification {
            Classification::Event { .. } => self.events += 1,
            Classification::Malformed { .. } => self.malformed += 1,
            Classification::Log(_) => self.logs += 1,
        }
    }
}

/// Drives one subordinate's output through classification and reporting.
#[derive(Debug, Clone, Copy)]
pub struct Relay {
    policy: ReportingPolicy,
    classifier: LineClassifier,
    renderer: ReportRenderer,
}

impl Relay {
    pub fn new(policy: ReportingPolicy, format: OutputFormat) -> Self {
        Self {
            policy,
            classifier: LineClassifier::new(),
            renderer: ReportRenderer::new(policy, format),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.effective_policy(), config.output_format)
    }

    pub fn policy(&self) -> ReportingPolicy {
        self.policy
    }

    /// Relay every line until the source is exhausted, then wait for it to finish.
    pub async fn run<S, K>(&self, source: S, sink: &mut K) -> Result<RunSummary, RelayError>
    where
        S: LineSource,
        K: ReportSink,
    {
        self.run_until_shutdown(source, sink, std::future::pending::<()>())
            .await
    }

    /// Like [`Relay::run`], but `shutdown` resolving stops the source early.
    pub async fn run_until_shutdown<S, K, F>(
        &self,
        mut source: S,
        sink: &mut K,
        shutdown: F,
    ) -> Result<RunSummary, RelayError>
    where
        S: LineSource,
        K: ReportSink,
        F: Future<Output = ()>,
    {
        info!(
            "Relaying {} with policy {:?}",
            source.describe(),
            self.policy
        );

        let mut summary = RunSummary::default();
        tokio::pin!(shutdown);

        loop {
            let next = tokio::select! {
                line = source.next_line() => Some(line?),
                () = &mut shutdown => None,
            };

            match next {
                Some(Some(raw)) => self.process_line(&raw, sink, &mut summary)?,
                Some(None) => break,
                None => {
                    warn!("Shutdown requested, terminating {}", source.describe());
                    source.terminate().await?;
                    summary.interrupted = true;
                    break;
                }
            }
        }

        let exit = source.finish().await?;
        summary.exit_code = exit.code;

        info!(
            "Relay finished: {} lines, {} events, {} malformed, {} logs, {} reports, {} dropped, exit code {:?}",
            summary.lines_read,
            summary.events,
            summary.malformed,
            summary.logs,
            summary.reports,
            summary.dropped,
            summary.exit_code
        );

        Ok(summary)
    }

    /// Handle one raw line: strip, skip blanks, classify, report.
    pub fn process_line<K: ReportSink>(
        &self,
        raw: &str,
        sink: &mut K,
        summary: &mut RunSummary,
    ) -> Result<(), RelayError> {
        summary.lines_read += 1;

        let line = raw.trim();
        if line.is_empty() {
            summary.blank_skipped += 1;
            return Ok(());
        }

        let report = if self.policy.classifies() {
            let classification = self.classifier.classify(line);
            summary.record(&classification);

            let report = self.policy.report(&classification);
            if report.is_none()
                && let Classification::Event { record, .. } = &classification
            {
                debug!("No report for event '{}' under {:?}", record.event, self.policy);
                summary.dropped += 1;
            }
            report
        } else {
            Some(Report::Verbatim {
                line: line.to_string(),
            })
        };

        if let Some(report) = report {
            let rendered = self.renderer.render(&report).map_err(std::io::Error::from)?;
            sink.emit(&rendered)?;
            summary.reports += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::WriterSink;

    fn process(policy: ReportingPolicy, lines: &[&str]) -> (Vec<String>, RunSummary) {
        let relay = Relay::new(policy, OutputFormat::Text);
        let mut sink = WriterSink::new(Vec::new());
        let mut summary = RunSummary::default();

        for line in lines {
            relay.process_line(line, &mut sink, &mut summary).unwrap();
        }

        let output = String::from_utf8(sink.into_inner()).unwrap();
        (output.lines().map(str::to_string).collect(), summary)
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (output, summary) = process(ReportingPolicy::Verbose, &["", "   ", "\t\r\n"]);

        assert!(output.is_empty());
        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.blank_skipped, 3);
        assert_eq!(summary.reports, 0);
    }

    #[test]
    fn test_plain_prints_verbatim_without_classifying() {
        let (output, summary) = process(
            ReportingPolicy::Plain,
            &["  [BOOT] up  ", r#"{"event":"heartbeat","tick":1}"#],
        );

        assert_eq!(output, vec!["[BOOT] up", r#"{"event":"heartbeat","tick":1}"#]);
        assert_eq!(summary.events, 0);
        assert_eq!(summary.reports, 2);
    }

    #[test]
    fn test_restrictive_counts_dropped_events() {
        let (output, summary) = process(
            ReportingPolicy::Restrictive,
            &[r#"{"event":"calibrate","tick":3}"#],
        );

        assert!(output.is_empty());
        assert_eq!(summary.events, 1);
        assert_eq!(summary.dropped, 1);
    }

    #[test]
    fn test_missing_event_does_not_abort() {
        let (output, summary) = process(
            ReportingPolicy::Restrictive,
            &[r#"{"tick":3}"#, r#"{"event":"heartbeat","tick":4}"#],
        );

        assert_eq!(output.len(), 2);
        assert!(output[0].starts_with("[ValidatorEmu] (invalid event record"));
        assert_eq!(output[1], "[ValidatorEmu] Node alive | Tick: 4");
        assert_eq!(summary.malformed, 1);
    }

    #[test]
    fn test_loosely_typed_records_are_reported() {
        let (restrictive, _) = process(
            ReportingPolicy::Restrictive,
            &[r#"{"event":"heartbeat","tick":"5"}"#, r#"{"event":5,"tick":1}"#],
        );
        assert_eq!(restrictive, vec!["[ValidatorEmu] Node alive | Tick: 5"]);

        let (verbose, summary) = process(
            ReportingPolicy::Verbose,
            &[
                r#"{"event":"heartbeat","tick":1,"status":200}"#,
                r#"{"event":5,"tick":1}"#,
            ],
        );
        assert_eq!(
            verbose,
            vec![
                "[Validator] Event: heartbeat | Tick: 1 | Status: 200",
                "[Validator] Event: 5 | Tick: 1 | Status: null",
            ]
        );
        assert_eq!(summary.events, 2);
        assert_eq!(summary.malformed, 0);
    }
}
