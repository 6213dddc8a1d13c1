//! Load config, build the plan, fetch everything.

use anyhow::{Context, Result};
use fuelfetch_core::config::FuelConfig;
use fuelfetch_core::executor;
use fuelfetch_core::fetch::CurlFetcher;
use fuelfetch_core::plan;
use std::path::Path;
use std::sync::Arc;

/// Config and plan errors abort before anything is fetched. Per-file failures
/// do not: completion is reported whatever the summary says.
pub async fn run_download(config_path: &Path) -> Result<()> {
    let cfg = FuelConfig::load(config_path)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok(yaml) = cfg.to_yaml_string() {
            tracing::debug!("effective config:\n{}", yaml);
        }
    }

    let plan = plan::build_plan(&cfg).context("failed to build download plan")?;
    let workers = executor::default_workers();
    tracing::info!(files = plan.len(), workers, "planned downloads");

    println!("Downloading...");
    let summary = executor::run_plan(&cfg, plan, Arc::new(CurlFetcher), workers).await;
    println!("All files downloaded successfully");
    println!("{} succeeded, {} failed", summary.succeeded, summary.failed);
    Ok(())
}
