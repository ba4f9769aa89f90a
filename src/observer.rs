//! Diagnostic events emitted by the reconciler & tally engine

use crate::{block::BlockSummary, command::MalformedTransaction, constants::millis_to_iso_date_string};
use log::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Snapshots were merged into a height-deduplicated block set
    SnapshotsMerged {
        num_snapshots: usize,
        num_blocks: usize,
        num_superseded: usize,
    },

    /// One block of the validated canonical sequence
    CanonicalBlock(BlockSummary),

    /// The canonical sequence passed the contiguity check
    CanonicalChain {
        oldest: BlockSummary,
        newest: BlockSummary,
        length: usize,
    },

    /// Trailing blocks withheld from tallying
    ReorgMarginApplied { margin: u32, excluded: usize },

    /// A user command lacking a required field was dropped
    TransactionDropped(MalformedTransaction),

    /// Transactions emitted from in-window canonical blocks
    TransactionsCollected {
        count: usize,
        oldest_block_timestamp: Option<i64>,
        newest_block_timestamp: Option<i64>,
    },

    /// Transactions that are valid votes
    VotesFiltered {
        kept: usize,
        total: usize,
        oldest_block_timestamp: Option<i64>,
        newest_block_timestamp: Option<i64>,
    },

    /// Votes ordered per sender by nonce
    VotesSequenced { count: usize, senders: usize },

    /// Final per-project tally computed
    VotesTallied { projects: usize },
}

pub trait PipelineObserver {
    fn observe(&self, event: PipelineEvent);
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn observe(&self, _event: PipelineEvent) {}
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn observe(&self, event: PipelineEvent) {
        use PipelineEvent::*;
        match event {
            SnapshotsMerged {
                num_snapshots,
                num_blocks,
                num_superseded,
            } => info!(
                "Merged {num_snapshots} snapshots into {num_blocks} distinct blocks ({num_superseded} superseded)"
            ),
            CanonicalBlock(block) => debug!("Block {block}"),
            CanonicalChain {
                oldest,
                newest,
                length,
            } => {
                info!("Canonical chain of {length} contiguous blocks");
                info!("Oldest block {oldest}");
                info!("Newest block {newest}");
            }
            ReorgMarginApplied { margin, excluded } => {
                info!("Ignoring the {excluded} most recent blocks (reorg margin {margin})")
            }
            TransactionDropped(malformed) => warn!("Dropping transaction: {malformed}"),
            TransactionsCollected {
                count,
                oldest_block_timestamp,
                newest_block_timestamp,
            } => info!(
                "Retrieved {count} transactions. {}",
                date_info(oldest_block_timestamp, newest_block_timestamp)
            ),
            VotesFiltered {
                kept,
                total,
                oldest_block_timestamp,
                newest_block_timestamp,
            } => info!(
                "Filtered {total} transactions down to {kept} valid vote transactions. {}",
                date_info(oldest_block_timestamp, newest_block_timestamp)
            ),
            VotesSequenced { count, senders } => {
                info!("Sequenced {count} transactions from {senders} senders")
            }
            VotesTallied { projects } => info!("Counted votes for {projects} projects"),
        }
    }
}

fn date_info(oldest: Option<i64>, newest: Option<i64>) -> String {
    match (oldest, newest) {
        (Some(oldest), Some(newest)) => format!(
            "Oldest block date: {oldest} ({}), most recent block date: {newest} ({})",
            millis_to_iso_date_string(oldest),
            millis_to_iso_date_string(newest)
        ),
        _ => "No transactions found".to_string(),
    }
}
