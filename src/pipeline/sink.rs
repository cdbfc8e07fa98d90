use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Shared, line-oriented writer. Each call writes one complete line under the
/// lock, so concurrent workers never interleave partial lines.
#[derive(Clone)]
pub struct LineSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl LineSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "line sink lock poisoned"))?;
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        writer.write_all(&buf)?;
        writer.flush()
    }
}

/// Where workers send enriched records and per-line diagnostics
#[derive(Clone)]
pub struct Sinks {
    pub output: LineSink,
    pub diagnostics: LineSink,
}

impl Sinks {
    pub fn new(output: LineSink, diagnostics: LineSink) -> Self {
        Self { output, diagnostics }
    }

    /// Records on stdout, diagnostics on stderr
    pub fn stdio() -> Self {
        Self::new(LineSink::stdout(), LineSink::stderr())
    }
}
