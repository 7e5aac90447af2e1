pub mod process;
pub mod reader;
pub mod simulated;

use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

pub use process::FirmwareProcess;
pub use reader::ReaderSource;
pub use simulated::{SimulatedFirmware, SimulationProfile};

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Failed to launch firmware '{}': {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Firmware stdout was not captured")]
    MissingStdout,
    #[error("Read error: {0}")]
    Read(#[source] std::io::Error),
    #[error("Wait error: {0}")]
    Wait(#[source] std::io::Error),
    #[error("Kill error: {0}")]
    Kill(#[source] std::io::Error),
}

/// How the subordinate ended, once its stream is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceExit {
    /// Exit code when the source is a process that exited normally.
    pub code: Option<i32>,
}

/// A stream of raw output lines from a subordinate.
///
/// `next_line` yields lines in the order received until the stream is closed,
/// then `None`. `finish` releases the source and reports how it ended.
pub trait LineSource {
    fn next_line(
        &mut self,
    ) -> impl Future<Output = Result<Option<String>, CollectorError>> + Send;

    fn finish(self) -> impl Future<Output = Result<SourceExit, CollectorError>> + Send;

    /// Stop the subordinate early. Sources without a process have nothing to stop.
    fn terminate(&mut self) -> impl Future<Output = Result<(), CollectorError>> + Send {
        async { Ok(()) }
    }

    fn describe(&self) -> String;
}
