use super::{
    block_range_from_value, block_range_value, column_families::ColumnFamilyHelpers,
    snapshot_key, source_prefix, SnapshotStore,
};
use crate::{
    base::time_window::TimeWindow,
    snapshot::{Snapshot, SnapshotSource},
};
use anyhow::Context;
use log::{debug, trace, warn};
use speedb::{ColumnFamily, Direction, IteratorMode, WriteBatch};

impl SnapshotSource for SnapshotStore {
    fn list_snapshots(&self, source_id: &str) -> anyhow::Result<Vec<Snapshot>> {
        trace!("Listing snapshots of {source_id}");
        let mut snapshots = vec![];

        for (_, value) in self.prefix_entries(self.snapshots_cf(), source_id)? {
            snapshots.push(serde_json::from_slice(&value).context("invalid snapshot json")?);
        }

        debug!("Found {} snapshots of {source_id}", snapshots.len());
        Ok(snapshots)
    }

    /// Uses the block range CF so only overlapping snapshots get deserialized
    fn list_snapshots_in_window(
        &self,
        source_id: &str,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<Snapshot>> {
        trace!("Listing snapshots of {source_id} overlapping {window}");
        let mut snapshots = vec![];

        for (key, value) in self.prefix_entries(self.snapshot_block_range_cf(), source_id)? {
            let (min, max) = block_range_from_value(&value)?;
            if !window.overlaps(min, max) {
                continue;
            }

            let bytes = self
                .database
                .get_cf(self.snapshots_cf(), &key)?
                .context("snapshot missing for block range entry")?;
            snapshots.push(serde_json::from_slice(&bytes).context("invalid snapshot json")?);
        }

        debug!(
            "Found {} snapshots of {source_id} overlapping {window}",
            snapshots.len()
        );
        Ok(snapshots)
    }

    fn store_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let key = snapshot_key(&snapshot.source_id, snapshot.retrieved_at);
        if self.database.get_cf(self.snapshots_cf(), &key)?.is_some() {
            warn!(
                "Snapshot of {} retrieved at {} already stored",
                snapshot.source_id, snapshot.retrieved_at
            );
            return Ok(());
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(self.snapshots_cf(), &key, serde_json::to_vec(snapshot)?);

        // empty snapshots never overlap a window
        if let (Some(min), Some(max)) = (
            snapshot.min_block_timestamp(),
            snapshot.max_block_timestamp(),
        ) {
            batch.put_cf(
                self.snapshot_block_range_cf(),
                &key,
                block_range_value(min, max),
            );
        }
        self.database.write(batch)?;

        debug!(
            "Stored snapshot of {} with {} blocks retrieved at {}",
            snapshot.source_id,
            snapshot.blocks.len(),
            snapshot.retrieved_at
        );
        Ok(())
    }
}

impl SnapshotStore {
    /// All `(key, value)` pairs of `cf` under the `source_id` prefix, in key
    /// order
    fn prefix_entries(
        &self,
        cf: &ColumnFamily,
        source_id: &str,
    ) -> anyhow::Result<Vec<(Box<[u8]>, Box<[u8]>)>> {
        let prefix = source_prefix(source_id);
        let mut entries = vec![];

        for entry in self
            .database
            .iterator_cf(cf, IteratorMode::From(prefix.as_slice(), Direction::Forward))
        {
            let (key, value) = entry?;
            if !key.starts_with(&prefix) {
                break;
            }
            entries.push((key, value));
        }
        Ok(entries)
    }
}
