//! Reporting layer: turns classified lines into printable reports.
//!
//! - `ReportingPolicy`: which classifications produce output (plain, verbose, validator)
//! - `Report`: one printable outcome, serializable for NDJSON output
//! - `ReportRenderer`: text or NDJSON rendering
//! - `ReportSink`: line-buffered destination for rendered reports

pub mod policy;
pub mod render;
pub mod sink;

pub use policy::{Report, ReportingPolicy};
pub use render::{OutputFormat, ReportRenderer};
pub use sink::{ReportSink, WriterSink};
