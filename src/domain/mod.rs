//! Domain layer for qsafp-relay.
//!
//! Contains the canonical types shared across all modules:
//! - `EventRecord`: one structured firmware event decoded from a single line
//! - `Tick`: the counter carried by events, kept in its wire form
//! - `RelayError`: Top-level error type

pub mod error;
pub mod event;

pub use error::RelayError;
pub use event::{EventRecord, Tick};
