//! Run a download plan on a bounded pool of workers.
//!
//! Keeps up to `workers` fetches in flight; when one finishes, the next
//! planned file is started until the plan is exhausted. Each fetch runs on
//! tokio's blocking pool. A failed file is reported and counted but never
//! stops the others.

use std::sync::Arc;

use crate::config::FuelConfig;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::plan::DownloadPlan;

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl FetchSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Pool size for this machine: one less than the available parallelism, at least 1.
pub fn default_workers() -> usize {
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    workers_for(parallelism)
}

pub fn workers_for(parallelism: usize) -> usize {
    parallelism.saturating_sub(1).max(1)
}

/// Fetches every file in `plan` with at most `workers` concurrent fetches.
///
/// Prints one console line per file and returns once every file has been attempted.
pub async fn run_plan(
    cfg: &FuelConfig,
    plan: DownloadPlan,
    fetcher: Arc<dyn Fetcher>,
    workers: usize,
) -> FetchSummary {
    let workers = workers.max(1);
    tracing::info!(files = plan.len(), workers, "starting downloads");

    let mut pending = plan.into_iter();
    let mut summary = FetchSummary::default();
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < workers {
            let Some(file) = pending.next() else {
                break;
            };
            let url = cfg.url_for(&file);
            let dest = cfg.destination_for(&file);
            let fetcher = Arc::clone(&fetcher);
            join_set.spawn(async move {
                let result = tokio::task::spawn_blocking(move || fetcher.fetch(&url, &dest))
                    .await
                    .map_err(|e| anyhow::anyhow!("fetch task join: {}", e))
                    .and_then(|r| r);
                (file, result)
            });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        match joined {
            Ok((file, Ok(FetchOutcome::Downloaded { bytes }))) => {
                summary.succeeded += 1;
                tracing::info!(file = %file, bytes, "downloaded");
                println!("Successfully downloaded {}", file);
            }
            Ok((file, Ok(FetchOutcome::HttpStatus(code)))) => {
                summary.failed += 1;
                tracing::warn!(file = %file, status = code, "server returned non-success status");
                println!("Failed to download {}", file);
            }
            Ok((file, Err(e))) => {
                summary.failed += 1;
                tracing::warn!(file = %file, "download failed: {:#}", e);
                println!("Failed to download {}", file);
            }
            Err(e) => {
                // Filename is lost with the task; still counts against the run.
                summary.failed += 1;
                tracing::error!("download task join: {}", e);
            }
        }
    }

    tracing::info!(
        attempted = summary.attempted(),
        succeeded = summary.succeeded,
        failed = summary.failed,
        "downloads finished"
    );
    summary
}
