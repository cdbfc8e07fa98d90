use crate::constants::STDIN_PATH;
use crate::error::{EnrichError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Counts reported by the line source once the input is exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Every line read, skipped ones included
    pub rows_read: usize,
    /// Lines handed to the workers
    pub offered: usize,
}

/// Opens the input named on the command line; "-" is standard input.
pub fn open_input(path: &str) -> Result<Box<dyn BufRead + Send>> {
    if path == STDIN_PATH {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|source| EnrichError::Open {
        path: path.to_string(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Reads `reader` line by line and hands every line after the first
/// `skip_rows` to the workers. Blocks on each send, so it must run on a
/// blocking thread. Dropping `sender` on return closes the channel.
///
/// Lines are decoded lossily: bytes that are not UTF-8 (Latin-1 exports)
/// become U+FFFD instead of failing the run. Only I/O errors are fatal.
pub fn feed_lines<R: BufRead>(
    mut reader: R,
    skip_rows: usize,
    sender: mpsc::Sender<String>,
) -> Result<SourceStats> {
    let mut stats = SourceStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(EnrichError::Read)?;
        if n == 0 {
            break;
        }
        stats.rows_read += 1;
        if stats.rows_read <= skip_rows {
            trace!("skipping row {}", stats.rows_read);
            continue;
        }

        let line = decode_line(&buf);
        if sender.blocking_send(line).is_err() {
            debug!("all workers gone, stopping line source at row {}", stats.rows_read);
            break;
        }
        stats.offered += 1;
    }

    debug!(
        "line source finished: rows_read={} offered={}",
        stats.rows_read, stats.offered
    );
    Ok(stats)
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
