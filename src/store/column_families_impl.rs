use crate::store::{column_families::ColumnFamilyHelpers, SnapshotStore};
use speedb::ColumnFamily;

impl ColumnFamilyHelpers for SnapshotStore {
    /// CF for storing snapshots:
    /// `{source_id}\0{retrieved_at} -> snapshot json`
    fn snapshots_cf(&self) -> &ColumnFamily {
        self.database
            .cf_handle("snapshots")
            .expect("snapshots column family exists")
    }

    /// CF for pre-filtering snapshots by time window:
    /// `{source_id}\0{retrieved_at} -> {min_block_ts}{max_block_ts}`
    ///
    /// - both timestamps: 8 BE bytes
    fn snapshot_block_range_cf(&self) -> &ColumnFamily {
        self.database
            .cf_handle("snapshot-block-range")
            .expect("snapshot-block-range column family exists")
    }
}
