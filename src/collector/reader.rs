use super::{CollectorError, LineSource, SourceExit};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Line source over any buffered async reader (stdin, pipes, in-memory input).
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the stream.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
    name: String,
}

impl<R> ReaderSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
            name: name.into(),
        }
    }

    pub async fn read_line(&mut self) -> Result<Option<String>, CollectorError> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(CollectorError::Read)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

impl ReaderSource<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()), "stdin")
    }
}

impl<R> LineSource for ReaderSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> Result<Option<String>, CollectorError> {
        self.read_line().await
    }

    async fn finish(self) -> Result<SourceExit, CollectorError> {
        Ok(SourceExit::default())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let input: &[u8] = b"first\r\n\nsecond\nlast-without-newline";
        let mut source = ReaderSource::new(input, "memory");

        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("first\r\n"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("\n"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("second\n"));
        assert_eq!(
            source.next_line().await.unwrap().as_deref(),
            Some("last-without-newline")
        );
        assert_eq!(source.next_line().await.unwrap(), None);
        assert_eq!(source.finish().await.unwrap(), SourceExit { code: None });
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let input: &[u8] = &[b'o', b'k', 0xFF, b'\n'];
        let mut source = ReaderSource::new(input, "memory");

        let line = source.next_line().await.unwrap().unwrap();
        assert!(line.starts_with("ok"));
        assert!(line.contains('\u{FFFD}'));
    }
}
