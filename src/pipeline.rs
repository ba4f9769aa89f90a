//! End-to-end vote counting: snapshots in, [Tally] out

use crate::{
    base::time_window::TimeWindow,
    canonicity::reconcile,
    observer::PipelineObserver,
    snapshot::{ChainQuery, Snapshot, SnapshotSource},
    tally::{tally, Tally},
    utility::functions::pretty_print_duration,
};
use anyhow::Context;
use log::info;
use std::time::Instant;

/// Parameters of one counting run
#[derive(Debug, Clone)]
pub struct CountOptions {
    pub window: TimeWindow,

    /// Number of most recent canonical blocks withheld from tallying
    pub reorg_margin: u32,
    pub burn_address: String,
}

/// Fetch the best chain once & persist it
pub fn fetch_and_store(
    query: &dyn ChainQuery,
    store: &dyn SnapshotSource,
    max_length: u32,
) -> anyhow::Result<Snapshot> {
    let snapshot = query.fetch_best_chain(max_length)?;
    store
        .store_snapshot(&snapshot)
        .with_context(|| format!("Failed to store snapshot of {}", snapshot.source_id))?;
    Ok(snapshot)
}

/// Reconcile & tally `snapshots`
pub fn count_snapshots(
    snapshots: &[Snapshot],
    options: &CountOptions,
    observer: &dyn PipelineObserver,
) -> anyhow::Result<Tally> {
    let start = Instant::now();
    let transactions = reconcile(snapshots, &options.window, options.reorg_margin, observer)?;
    let tally = tally(
        &transactions,
        &options.window,
        &options.burn_address,
        observer,
    );

    info!(
        "Counted votes on {} projects in {}",
        tally.len(),
        pretty_print_duration(start.elapsed())
    );
    Ok(tally)
}

/// Count votes over every stored snapshot of `source_id` overlapping the
/// window
pub fn count_from_store(
    store: &dyn SnapshotSource,
    source_id: &str,
    options: &CountOptions,
    observer: &dyn PipelineObserver,
) -> anyhow::Result<Tally> {
    let snapshots = store.list_snapshots_in_window(source_id, &options.window)?;
    info!(
        "Counting votes in {} over {} stored snapshots of {source_id}",
        options.window,
        snapshots.len()
    );
    count_snapshots(&snapshots, options, observer)
}

/// Count votes over a single fresh best chain retrieval, bypassing the store
pub fn count_live(
    query: &dyn ChainQuery,
    max_length: u32,
    options: &CountOptions,
    observer: &dyn PipelineObserver,
) -> anyhow::Result<Tally> {
    let snapshot = query.fetch_best_chain(max_length)?;
    count_snapshots(&[snapshot], options, observer)
}
