// Enrichment pipeline: line source -> handoff channel -> worker pool -> sinks

pub mod sink;
pub mod source;
pub mod workers;

pub use sink::{LineSink, Sinks};
pub use source::{feed_lines, open_input, SourceStats};
pub use workers::{spawn_workers, WorkerContext, WorkerStats};

use crate::app::ports::AddressLookup;
use crate::config::RunOptions;
use crate::constants::HANDOFF_CAPACITY;
use crate::error::Result;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, instrument};

/// Result of a complete pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_read: usize,
    pub offered: usize,
    pub emitted: usize,
    pub failed: usize,
}

/// Runs the pipeline over `reader` until the input is exhausted.
///
/// The reader is drained on a blocking thread while `options.concurrency`
/// workers look up addresses. Lookup failures are reported on the diagnostic
/// sink and counted; a read error or a failed sink write ends the run.
#[instrument(skip(reader, lookup, sinks), fields(concurrency = options.concurrency))]
pub async fn run<R>(
    reader: R,
    options: &RunOptions,
    lookup: Arc<dyn AddressLookup>,
    sinks: Sinks,
) -> Result<RunSummary>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<String>(HANDOFF_CAPACITY);

    let skip_rows = options.skip_rows;
    let source = tokio::task::spawn_blocking(move || feed_lines(reader, skip_rows, tx));

    let ctx = WorkerContext::new(lookup, sinks, options);
    let mut pool = spawn_workers(rx, options.concurrency, ctx);

    let source_stats = match source.await {
        Ok(Ok(stats)) => stats,
        Ok(Err(e)) => {
            error!("line source failed: {}", e);
            pool.abort_all();
            return Err(e);
        }
        Err(e) => {
            pool.abort_all();
            return Err(e.into());
        }
    };

    let worker_stats = workers::join_workers(pool).await?;

    let summary = RunSummary {
        rows_read: source_stats.rows_read,
        offered: source_stats.offered,
        emitted: worker_stats.emitted,
        failed: worker_stats.failed,
    };
    debug!(
        "pipeline finished: rows_read={} offered={} emitted={} failed={}",
        summary.rows_read, summary.offered, summary.emitted, summary.failed
    );
    Ok(summary)
}
