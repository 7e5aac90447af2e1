use super::reader::ReaderSource;
use super::{CollectorError, LineSource, SourceExit};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info};

/// The firmware executable running as a subprocess, read line by line from stdout.
///
/// Stderr is piped and drained in the background so a chatty firmware cannot
/// block on a full pipe; its contents are never inspected.
#[derive(Debug)]
pub struct FirmwareProcess {
    path: PathBuf,
    child: Child,
    stdout: ReaderSource<BufReader<ChildStdout>>,
}

impl FirmwareProcess {
    /// Launch the executable with no arguments.
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self, CollectorError> {
        let path = path.as_ref().to_path_buf();

        let mut child = Command::new(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CollectorError::Spawn {
                path: path.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(CollectorError::MissingStdout)?;

        if let Some(mut stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut discard = tokio::io::sink();
                if let Ok(bytes) = tokio::io::copy(&mut stderr, &mut discard).await {
                    debug!("Discarded {} bytes of firmware stderr", bytes);
                }
            });
        }

        info!("Launched firmware '{}' (pid {:?})", path.display(), child.id());

        let name = path.display().to_string();
        Ok(Self {
            path,
            child,
            stdout: ReaderSource::new(BufReader::new(stdout), name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

impl LineSource for FirmwareProcess {
    async fn next_line(&mut self) -> Result<Option<String>, CollectorError> {
        self.stdout.read_line().await
    }

    async fn finish(mut self) -> Result<SourceExit, CollectorError> {
        let status = self.child.wait().await.map_err(CollectorError::Wait)?;
        info!("Firmware '{}' exited with {}", self.path.display(), status);
        Ok(SourceExit {
            code: status.code(),
        })
    }

    async fn terminate(&mut self) -> Result<(), CollectorError> {
        self.child.kill().await.map_err(CollectorError::Kill)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
