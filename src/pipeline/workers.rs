use crate::app::ports::AddressLookup;
use crate::config::RunOptions;
use crate::error::{EnrichError, Result};
use crate::pipeline::sink::Sinks;
use crate::types::{output_record, split_record, AddressQuery};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Per-worker tally, summed when the pool is joined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub emitted: usize,
    pub failed: usize,
}

impl WorkerStats {
    pub fn merge(&mut self, other: WorkerStats) {
        self.emitted += other.emitted;
        self.failed += other.failed;
    }
}

#[derive(Debug)]
enum LineOutcome {
    Emitted,
    Failed,
}

/// Everything a worker needs besides the receiver
#[derive(Clone)]
pub struct WorkerContext {
    pub lookup: Arc<dyn AddressLookup>,
    pub sinks: Sinks,
    pub start_column: usize,
    pub verbose: bool,
}

impl WorkerContext {
    pub fn new(lookup: Arc<dyn AddressLookup>, sinks: Sinks, options: &RunOptions) -> Self {
        Self {
            lookup,
            sinks,
            start_column: options.start_column,
            verbose: options.verbose,
        }
    }
}

/// Spawns `worker_count` workers that compete for lines on `receiver`.
pub fn spawn_workers(
    receiver: mpsc::Receiver<String>,
    worker_count: usize,
    ctx: WorkerContext,
) -> JoinSet<Result<WorkerStats>> {
    let shared_receiver = Arc::new(Mutex::new(receiver));

    let mut join_set = JoinSet::new();
    for worker_idx in 0..worker_count.max(1) {
        let rx = Arc::clone(&shared_receiver);
        let ctx = ctx.clone();
        join_set.spawn(async move { run_worker(worker_idx, rx, ctx).await });
    }
    join_set
}

/// Waits for every worker and sums their stats. The first worker error wins.
pub async fn join_workers(mut workers: JoinSet<Result<WorkerStats>>) -> Result<WorkerStats> {
    let mut total = WorkerStats::default();
    let mut first_err = None;
    while let Some(joined) = workers.join_next().await {
        match joined.map_err(EnrichError::from).and_then(|r| r) {
            Ok(stats) => total.merge(stats),
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(total),
    }
}

async fn run_worker(
    worker_idx: usize,
    receiver: Arc<Mutex<mpsc::Receiver<String>>>,
    ctx: WorkerContext,
) -> Result<WorkerStats> {
    let mut stats = WorkerStats::default();
    loop {
        let Some(line) = receive_line(&receiver).await else {
            debug!(worker = worker_idx, "worker terminating (channel closed)");
            break;
        };

        match process_line(&ctx, &line).await? {
            LineOutcome::Emitted => stats.emitted += 1,
            LineOutcome::Failed => stats.failed += 1,
        }
    }
    Ok(stats)
}

async fn receive_line(receiver: &Arc<Mutex<mpsc::Receiver<String>>>) -> Option<String> {
    let mut guard = receiver.lock().await;
    guard.recv().await
}

/// Looks up one line and writes its output record. Lookup failures are
/// reported on the diagnostic sink; only sink write errors propagate.
async fn process_line(ctx: &WorkerContext, line: &str) -> Result<LineOutcome> {
    let fields = split_record(line);
    let query = AddressQuery::from_record(&fields, ctx.start_column);

    let resp = match ctx.lookup.zip_by_address(&query).await {
        Ok(resp) => resp,
        Err(e) => {
            debug!(street = %query.address1, "lookup failed: {}", e);
            ctx.sinks
                .diagnostics
                .write_line(&format!("{} {}", e, query.address1))
                .map_err(EnrichError::Output)?;
            return Ok(LineOutcome::Failed);
        }
    };

    let address = resp.first_address();
    if ctx.verbose {
        match serde_json::to_string(&address) {
            Ok(dump) => ctx
                .sinks
                .diagnostics
                .write_line(&dump)
                .map_err(EnrichError::Output)?,
            Err(e) => warn!("failed to serialize address for verbose output: {}", e),
        }
    }

    ctx.sinks
        .output
        .write_line(&output_record(line, &address.address_line1))
        .map_err(EnrichError::Output)?;
    Ok(LineOutcome::Emitted)
}
