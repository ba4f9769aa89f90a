//! Stored results of `bestChain` retrievals

use crate::{base::time_window::TimeWindow, block::Block};
use serde::{Deserialize, Serialize};

/// One retrieval of the best chain from a source. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Retrieval time (millis)
    pub retrieved_at: i64,

    /// Endpoint URL or file path the blocks came from
    pub source_id: String,

    /// Blocks in the order the source returned them
    #[serde(rename = "bestChain")]
    pub blocks: Vec<Block>,
}

impl Snapshot {
    pub fn new(source_id: impl Into<String>, retrieved_at: i64, blocks: Vec<Block>) -> Self {
        Self {
            retrieved_at,
            source_id: source_id.into(),
            blocks,
        }
    }

    /// Earliest block timestamp, `None` if there are no blocks
    pub fn min_block_timestamp(&self) -> Option<i64> {
        self.blocks.iter().map(|block| block.timestamp).min()
    }

    /// Latest block timestamp, `None` if there are no blocks
    pub fn max_block_timestamp(&self) -> Option<i64> {
        self.blocks.iter().map(|block| block.timestamp).max()
    }

    /// Whether any block of the snapshot falls within `window`
    pub fn overlaps(&self, window: &TimeWindow) -> bool {
        match (self.min_block_timestamp(), self.max_block_timestamp()) {
            (Some(min), Some(max)) => window.overlaps(min, max),
            _ => false,
        }
    }
}

/// Persistence of snapshots, keyed by source
pub trait SnapshotSource {
    /// All snapshots of `source_id`, oldest retrieval first
    fn list_snapshots(&self, source_id: &str) -> anyhow::Result<Vec<Snapshot>>;

    /// Snapshots of `source_id` with at least one block in `window`, oldest
    /// retrieval first
    fn list_snapshots_in_window(
        &self,
        source_id: &str,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<Snapshot>> {
        Ok(self
            .list_snapshots(source_id)?
            .into_iter()
            .filter(|snapshot| snapshot.overlaps(window))
            .collect())
    }

    fn store_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}

/// Remote source of the best chain
pub trait ChainQuery {
    /// Retrieve up to `max_length` of the most recent best chain blocks
    fn fetch_best_chain(&self, max_length: u32) -> anyhow::Result<Snapshot>;
}
