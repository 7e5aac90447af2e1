use std::io::{self, Write};

/// Destination for rendered report lines.
pub trait ReportSink {
    fn emit(&mut self, rendered: &str) -> io::Result<()>;
}

/// Line-buffered sink over any writer: every report is flushed as it is emitted.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    emitted: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, emitted: 0 }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn emit(&mut self, rendered: &str) -> io::Result<()> {
        writeln!(self.writer, "{rendered}")?;
        self.writer.flush()?;
        self.emitted += 1;
        Ok(())
    }
}
