//! Reconciliation of overlapping best chain snapshots into one canonical,
//! height-contiguous block sequence

use crate::{
    base::time_window::TimeWindow,
    block::Block,
    command::Transaction,
    observer::{PipelineEvent, PipelineObserver},
    snapshot::Snapshot,
};
use log::trace;
use std::{cmp::Reverse, collections::BTreeMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Block height discontinuity detected: {previous} to {current}")]
pub struct BlockDiscontinuityError {
    pub previous: u32,
    pub current: u32,
}

/// Merge snapshots into one block per height, ascending by height.
///
/// A height present in several snapshots is taken from the most recently
/// retrieved one, regardless of content. Snapshots retrieved at the same
/// instant rank by position, later ones first.
pub fn merge_snapshots<'a>(
    snapshots: &'a [Snapshot],
    observer: &dyn PipelineObserver,
) -> Vec<&'a Block> {
    let mut by_recency: Vec<(usize, &Snapshot)> = snapshots.iter().enumerate().collect();
    by_recency.sort_by_key(|(idx, snapshot)| Reverse((snapshot.retrieved_at, *idx)));

    let mut num_superseded = 0;
    let mut blocks: BTreeMap<u32, &Block> = BTreeMap::new();
    for (_, snapshot) in by_recency {
        trace!(
            "Merging snapshot retrieved at {} from {} ({} blocks)",
            snapshot.retrieved_at,
            snapshot.source_id,
            snapshot.blocks.len()
        );
        for block in &snapshot.blocks {
            if blocks.contains_key(&block.height) {
                num_superseded += 1;
            } else {
                blocks.insert(block.height, block);
            }
        }
    }

    observer.observe(PipelineEvent::SnapshotsMerged {
        num_snapshots: snapshots.len(),
        num_blocks: blocks.len(),
        num_superseded,
    });
    blocks.into_values().collect()
}

/// Check that consecutive heights differ by exactly one
pub fn check_contiguity(blocks: &[&Block]) -> Result<(), BlockDiscontinuityError> {
    for pair in blocks.windows(2) {
        let (previous, current) = (pair[0].height, pair[1].height);
        if previous.checked_add(1) != Some(current) {
            return Err(BlockDiscontinuityError { previous, current });
        }
    }
    Ok(())
}

/// The merged, contiguity-checked canonical block sequence, ascending by
/// height
pub fn canonical_blocks<'a>(
    snapshots: &'a [Snapshot],
    observer: &dyn PipelineObserver,
) -> Result<Vec<&'a Block>, BlockDiscontinuityError> {
    let blocks = merge_snapshots(snapshots, observer);
    check_contiguity(&blocks)?;

    if let (Some(oldest), Some(newest)) = (blocks.first(), blocks.last()) {
        for block in &blocks {
            observer.observe(PipelineEvent::CanonicalBlock(block.summary()));
        }
        observer.observe(PipelineEvent::CanonicalChain {
            oldest: oldest.summary(),
            newest: newest.summary(),
            length: blocks.len(),
        });
    }
    Ok(blocks)
}

/// Split off the `reorg_margin` most recent blocks, which are never tallied.
/// A margin of zero keeps everything.
pub fn apply_reorg_margin<'a, 'b>(
    blocks: &'b [&'a Block],
    reorg_margin: u32,
) -> (&'b [&'a Block], &'b [&'a Block]) {
    let excluded = (reorg_margin as usize).min(blocks.len());
    blocks.split_at(blocks.len() - excluded)
}

/// Reconcile `snapshots` into the transactions of canonical blocks within
/// `window`, each annotated with its block's timestamp.
///
/// The trailing `reorg_margin` blocks take part in the contiguity check but
/// contribute no transactions. Commands missing a required field are dropped
/// & reported to `observer`.
pub fn reconcile(
    snapshots: &[Snapshot],
    window: &TimeWindow,
    reorg_margin: u32,
    observer: &dyn PipelineObserver,
) -> Result<Vec<Transaction>, BlockDiscontinuityError> {
    let blocks = canonical_blocks(snapshots, observer)?;
    let (considered, excluded) = apply_reorg_margin(&blocks, reorg_margin);

    if reorg_margin > 0 {
        observer.observe(PipelineEvent::ReorgMarginApplied {
            margin: reorg_margin,
            excluded: excluded.len(),
        });
    }

    let mut transactions = vec![];
    let mut oldest_block_timestamp = None;
    let mut newest_block_timestamp = None;

    for block in considered.iter().filter(|b| window.contains(b.timestamp)) {
        let (txns, malformed) = block.transactions();
        for e in malformed {
            observer.observe(PipelineEvent::TransactionDropped(e));
        }

        if !txns.is_empty() {
            oldest_block_timestamp = oldest_block_timestamp
                .map(|ts: i64| ts.min(block.timestamp))
                .or(Some(block.timestamp));
            newest_block_timestamp = newest_block_timestamp
                .map(|ts: i64| ts.max(block.timestamp))
                .or(Some(block.timestamp));
        }
        transactions.extend(txns);
    }

    observer.observe(PipelineEvent::TransactionsCollected {
        count: transactions.len(),
        oldest_block_timestamp,
        newest_block_timestamp,
    });
    Ok(transactions)
}
